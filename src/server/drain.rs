// Shutdown drain module
// Bounded wait for in-flight connections once the listener is closed

use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;

use crate::logger;

/// Ask every watched connection to finish, waiting at most `grace`.
///
/// Idle keep-alive connections close at once; connections mid-response
/// finish that response first. Whatever is still open when the grace period
/// ends is abandoned to runtime shutdown.
///
/// Returns true if every connection closed in time.
pub async fn drain_connections(graceful: GracefulShutdown, grace: Duration) -> bool {
    tokio::select! {
        () = graceful.shutdown() => true,
        () = tokio::time::sleep(grace) => {
            logger::log_warning(&format!(
                "Connections still open after {}ms, abandoning them",
                grace.as_millis()
            ));
            false
        }
    }
}
