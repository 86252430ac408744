use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

mod config;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::ServeConfig::load()?;
    logger::init(&cfg.logging)?;

    let root = std::env::current_dir()?;

    // Create the Tokio runtime, sized by the workers setting when present
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    let grace = Duration::from_millis(cfg.performance.shutdown_grace_ms);
    let result = runtime.block_on(async_main(cfg, root));

    // Connections that outlived the drain are dropped here
    runtime.shutdown_timeout(grace);
    result
}

async fn async_main(cfg: config::ServeConfig, root: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr).map_err(|e| format!("Failed to bind {addr}: {e}"))?;
    let port = listener.local_addr()?.port();

    let entry_page = cfg.http.entry_page.clone();
    let state = Arc::new(config::AppState::new(cfg, &root)?);

    let shutdown = server::ShutdownSignal::new();
    server::listen_for_signals(shutdown.clone())?;

    logger::log_server_start(port, &root, &entry_page);

    server::start_server_loop(listener, state, shutdown).await;

    logger::log_server_stopped();
    Ok(())
}
