//! Signal handling for graceful shutdown

use futures::stream::StreamExt;
use signal_hook_tokio::Signals;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Wait for SIGTERM or SIGINT, then cancel `shutdown`.
///
/// Falls back to Ctrl-C when the signal handler cannot be installed. Returns
/// early if `shutdown` is cancelled by someone else.
pub async fn shutdown_signal(shutdown: CancellationToken) {
    match Signals::new([signal_hook::consts::SIGTERM, signal_hook::consts::SIGINT]) {
        Ok(mut signals) => {
            tokio::select! {
                Some(signal) = signals.next() => info!("Received signal: {}", signal),
                _ = shutdown.cancelled() => return,
            }
        }
        Err(e) => {
            warn!("Failed to install signal handler, falling back to Ctrl-C: {}", e);
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        warn!("Failed to listen for Ctrl-C: {}", e);
                        return;
                    }
                    info!("Received Ctrl-C");
                }
                _ = shutdown.cancelled() => return,
            }
        }
    }

    shutdown.cancel();
}
