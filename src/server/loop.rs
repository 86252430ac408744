// Server loop module
// Accepts connections until shutdown is requested, then drains them

use std::sync::Arc;
use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::drain::drain_connections;
use super::signal::ShutdownSignal;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop on `listener` until `shutdown` fires.
///
/// On shutdown the listener is closed first, so no new connection is
/// accepted, then open connections get up to `shutdown_grace_ms` to finish.
/// Accept errors are logged and the loop keeps going.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>, shutdown: ShutdownSignal) {
    let graceful = GracefulShutdown::new();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &graceful);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.wait() => break,
        }
    }

    drop(listener);

    let grace = Duration::from_millis(state.config.performance.shutdown_grace_ms);
    drain_connections(graceful, grace).await;
}
