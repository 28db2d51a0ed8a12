//! Startup and ordered shutdown of the background tasks

use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::{notification_sink_task, persistence_writer_task, tick_driver_task};
use crate::state::AppState;

/// Handles to the tick driver, persistence writer and notification sink
#[derive(Debug)]
pub struct BackgroundTasks {
    driver_shutdown: CancellationToken,
    driver: JoinHandle<()>,
    shutdown: CancellationToken,
    writer: JoinHandle<()>,
    sink: JoinHandle<()>,
}

impl BackgroundTasks {
    /// Spawn all background tasks for `state`, ticking every `period`
    pub fn spawn(state: &Arc<AppState>, period: Duration) -> Self {
        let driver_shutdown = CancellationToken::new();
        let shutdown = CancellationToken::new();

        Self {
            driver: tokio::spawn(tick_driver_task(Arc::clone(state), period, driver_shutdown.clone())),
            writer: tokio::spawn(persistence_writer_task(Arc::clone(state), shutdown.clone())),
            sink: tokio::spawn(notification_sink_task(Arc::clone(state), shutdown.clone())),
            driver_shutdown,
            shutdown,
        }
    }

    /// Stop the tick driver first so the writer's final flush sees its last batch
    pub async fn shutdown(self) {
        self.driver_shutdown.cancel();
        if let Err(e) = self.driver.await {
            error!("Tick driver failed: {}", e);
        }

        self.shutdown.cancel();
        for task in [self.writer, self.sink] {
            if let Err(e) = task.await {
                error!("Background task failed: {}", e);
            }
        }
        info!("Background tasks stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{persistence::StatePersistence, services::NewTimer};

    #[tokio::test]
    async fn final_flush_includes_last_tick() {
        let persistence = StatePersistence::in_memory();
        let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), persistence.clone()));
        let created = state.create_timer(&NewTimer::new("Focus", "Work", 3600)).unwrap();
        state.start(created.timers[0].id.clone()).unwrap();

        let tasks = BackgroundTasks::spawn(&state, Duration::from_millis(5));
        let mut rx = state.subscribe();
        let ticked = tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|s| s.timers[0].remaining <= 3595),
        )
        .await
        .is_ok_and(|waited| waited.is_ok());
        assert!(ticked);

        tokio::time::timeout(Duration::from_secs(5), tasks.shutdown())
            .await
            .unwrap();

        let last = state.snapshot().unwrap();
        assert!(last.timers[0].remaining < 3600);
        assert_eq!(persistence.load(), Some(last));
    }
}
