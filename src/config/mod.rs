// Configuration module entry point
// Loads process-start configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{LoggingConfig, ServeConfig};

/// Config file looked up in the working directory (any format `config` supports)
pub const CONFIG_FILE: &str = "gm-serve";

/// Environment variable prefix, e.g. `GMSERVE_SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "GMSERVE";

impl ServeConfig {
    /// Load configuration from the default file name and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// A missing file is fine: every key has a default, and the default
    /// port is 0 (OS-assigned).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would only fail later, and less clearly
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server.workers == Some(0) {
            return Err(config::ConfigError::Message(
                "server.workers must be at least 1".to_string(),
            ));
        }
        if self.performance.connection_timeout == 0 {
            return Err(config::ConfigError::Message(
                "performance.connection_timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let cfg = ServeConfig::load_from(missing.to_str().unwrap()).unwrap();

        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 0);
        assert_eq!(cfg.http.entry_page, "gm.html");
        assert_eq!(cfg.http.index_files, vec!["index.html", "index.htm"]);
        assert!(cfg.http.directory_listing);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "common");
        assert_eq!(cfg.performance.shutdown_grace_ms, 500);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("serve.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[server]\nport = 8123\n\n[http]\ndirectory_listing = false").unwrap();

        let base = dir.path().join("serve");
        let cfg = ServeConfig::load_from(base.to_str().unwrap()).unwrap();

        assert_eq!(cfg.server.port, 8123);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert!(!cfg.http.directory_listing);
        assert_eq!(cfg.http.entry_page, "gm.html");
    }

    #[test]
    fn test_zero_workers_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("serve.toml");
        std::fs::write(&path, "[server]\nworkers = 0\n").unwrap();

        let base = dir.path().join("serve");
        let err = ServeConfig::load_from(base.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("server.workers"), "{err}");

        std::fs::write(&path, "[server]\nworkers = 2\n").unwrap();
        let cfg = ServeConfig::load_from(base.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.workers, Some(2));
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServeConfig::default();
        let addr = cfg.get_socket_addr().unwrap();
        assert!(addr.ip().is_unspecified());
        assert_eq!(addr.port(), 0);

        let mut bad = ServeConfig::default();
        bad.server.host = "not a host".to_string();
        assert!(bad.get_socket_addr().is_err());
    }
}
