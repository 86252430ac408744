// Signal handling module
//
// Supported signals:
// - SIGINT:  Stop (Ctrl+C)
// - SIGTERM: Stop
// Non-Unix platforms only get Ctrl+C.

use std::sync::Arc;
use tokio::sync::Notify;

/// Cancellation handle shared by the signal task and the accept loop
#[derive(Clone, Default)]
pub struct ShutdownSignal {
    notify: Arc<Notify>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown
    ///
    /// Uses a stored permit, so a request made before anyone waits is kept.
    pub fn trigger(&self) {
        self.notify.notify_one();
    }

    /// Wait until shutdown is requested
    pub async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Start signal handlers (Unix)
///
/// Handlers are registered before this returns, so a registration failure
/// is reported to the caller instead of inside the background task.
#[cfg(unix)]
pub fn listen_for_signals(shutdown: ShutdownSignal) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::spawn(async move {
        tokio::select! {
            _ = sigint.recv() => {}
            _ = sigterm.recv() => {}
        }
        shutdown.trigger();
    });
    Ok(())
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn listen_for_signals(shutdown: ShutdownSignal) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            shutdown.trigger();
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_before_wait_is_kept() {
        let shutdown = ShutdownSignal::new();
        shutdown.clone().trigger();
        tokio::time::timeout(Duration::from_secs(1), shutdown.wait())
            .await
            .expect("stored trigger should wake the waiter");
    }

    #[cfg(unix)]
    fn raise(signal: &str) {
        let status = std::process::Command::new("kill")
            .args([signal, &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_os_signals_request_shutdown() {
        // Handlers are installed before the signal is sent, so the default
        // action (terminating this test binary) never runs
        for signal in ["-INT", "-TERM"] {
            let shutdown = ShutdownSignal::new();
            listen_for_signals(shutdown.clone()).unwrap();
            raise(signal);
            tokio::time::timeout(Duration::from_secs(5), shutdown.wait())
                .await
                .unwrap_or_else(|_| panic!("kill {signal} did not request shutdown"));
        }
    }

    #[tokio::test]
    async fn test_trigger_wakes_waiter() {
        let shutdown = ShutdownSignal::new();
        let waiter = shutdown.clone();
        let task = tokio::spawn(async move { waiter.wait().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("waiter should wake")
            .unwrap();
    }
}
