// Connection handling module
// Serves a single accepted TCP connection

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve an accepted connection in its own task.
///
/// The connection is registered with `graceful` so stop can ask it to
/// finish its current response and close.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Configures HTTP/1.1 connection settings (keep-alive, header case)
/// 3. Bounds how long the client may take to send each request head
/// 4. Serves the connection with the request handler
///
/// The bound restarts with every request, so a keep-alive connection that
/// keeps loading assets lives as long as it stays busy.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address, for the access log
/// * `state` - Shared application state
/// * `graceful` - Shutdown watcher owned by the accept loop
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    graceful: &GracefulShutdown,
) {
    let io = TokioIo::new(stream);
    let perf = &state.config.performance;
    let idle_timeout = Duration::from_secs(perf.connection_timeout);

    let mut builder = http1::Builder::new();
    builder.keep_alive(perf.keep_alive);
    builder.timer(TokioTimer::new());
    builder.header_read_timeout(idle_timeout);
    // Emit `Access-Control-Allow-Origin`, not `access-control-allow-origin`
    builder.title_case_headers(true);

    let service_state = Arc::clone(state);
    let conn = builder.serve_connection(
        io,
        service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state), peer_addr)),
    );
    let conn = graceful.watch(conn);

    tokio::spawn(async move {
        if let Err(err) = conn.await {
            if err.is_timeout() {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} idle for {} seconds, closed",
                    idle_timeout.as_secs()
                ));
            } else if !err.is_incomplete_message() {
                // Clients hanging up mid-response are routine
                logger::log_connection_error(&err);
            }
        }
    });
}
