// Signal handling module
//
// Supported signals:
// - SIGINT:  Graceful stop (Ctrl+C)
// - SIGTERM: Graceful stop
//
// Either signal fires the shutdown Notify; the serve loop observes it at
// the accept boundary and returns, letting the process exit 0.

use std::sync::Arc;
use tokio::sync::Notify;

/// Start the interrupt handler (Unix).
///
/// Spawns a background task that waits for SIGINT or SIGTERM and fires the
/// shutdown token once.
#[cfg(unix)]
pub fn start_signal_handler(shutdown: Arc<Notify>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let Ok(mut sigint) = signal(SignalKind::interrupt()) else {
            crate::logger::log_error("Failed to register SIGINT handler");
            return;
        };
        let Ok(mut sigterm) = signal(SignalKind::terminate()) else {
            crate::logger::log_error("Failed to register SIGTERM handler");
            return;
        };

        tokio::select! {
            _ = sigint.recv() => {}
            _ = sigterm.recv() => {}
        }
        shutdown.notify_one();
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            shutdown.notify_one();
        }
    });
}
