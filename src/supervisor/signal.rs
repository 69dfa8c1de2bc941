//! OS signal handling.
//!
//! The only effect of a signal is to stop the shared [`RunState`]; the poll
//! loop notices between cycles and shuts down cleanly.

use tokio::signal;
use tokio::task::JoinHandle;

use crate::watcher::RunState;

/// Spawn a task that stops `state` on SIGINT (Ctrl+C) or SIGTERM (Unix).
pub fn spawn_signal_handler(state: RunState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let name = shutdown_signal().await;
        tracing::warn!(signal = name, "Received OS signal: {name}");
        state.stop();
    })
}

/// Wait for a shutdown signal and return its name.
///
/// If a handler cannot be installed, that source is logged and never fires.
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    }
}
