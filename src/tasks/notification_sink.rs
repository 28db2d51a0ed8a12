//! Notification sink background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::state::AppState;

/// Background task that surfaces notifications as log lines
pub async fn notification_sink_task(state: Arc<AppState>, shutdown: CancellationToken) {
    info!("Starting notification sink task");

    let mut notification_rx = state.subscribe_notifications();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            received = notification_rx.recv() => match received {
                Ok(notification) if notification.is_error() => {
                    warn!(kind = "notification", "{}", notification.message());
                }
                Ok(notification) => {
                    info!(kind = "notification", "{}", notification.message());
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Dropped {} notifications", skipped);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
}
