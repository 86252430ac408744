// Application state module
// Read-only state shared by every connection

use std::path::{Path, PathBuf};

use super::types::ServeConfig;

/// Application state
pub struct AppState {
    pub config: ServeConfig,
    /// Canonical serving root, fixed at startup
    pub root: PathBuf,
}

impl AppState {
    /// Create `AppState` serving files from `root`
    ///
    /// The root is canonicalized once so later containment checks compare
    /// like with like.
    pub fn new(config: ServeConfig, root: &Path) -> std::io::Result<Self> {
        Ok(Self {
            config,
            root: root.canonicalize()?,
        })
    }
}
