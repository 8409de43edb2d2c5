use tokio::signal;
use tracing::{info, warn};

/// Wait for Ctrl+C. Resolves even when the signal handler cannot be
/// installed so callers never hang on a broken terminal.
pub async fn listen_for_shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, stopping...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }
}
