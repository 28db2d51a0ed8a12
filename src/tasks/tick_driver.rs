//! Tick driver background task
//!
//! Once per period, every running timer with time left is decremented by one
//! second. Halfway and completion notifications are decided from the values
//! before the decrement. Precision drift beyond one period is not corrected.

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    error::CommandError,
    services::Notification,
    state::{AppState, Command, TimersState},
};

/// Real-time cadence of the tick driver
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Work planned for one firing of the driver
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TickBatch {
    pub notifications: Vec<Notification>,
    pub commands: Vec<Command>,
}

/// Plan the notifications and tick commands for the given snapshot
pub fn plan_tick_batch(snapshot: &TimersState) -> TickBatch {
    let mut batch = TickBatch::default();

    for timer in snapshot.running().filter(|timer| timer.remaining > 0) {
        if timer.remaining == timer.halfway_mark() {
            batch.notifications.push(Notification::HalfwayReached {
                id: timer.id.clone(),
                name: timer.name.clone(),
            });
        }
        if timer.remaining == 1 {
            batch.notifications.push(Notification::TimerCompleted {
                id: timer.id.clone(),
                name: timer.name.clone(),
            });
        }
        batch.commands.push(Command::Tick(timer.id.clone()));
    }

    batch
}

/// Run one firing against the latest state, returning how many timers ticked
pub fn run_tick_batch(state: &AppState) -> Result<usize, CommandError> {
    let batch = plan_tick_batch(&state.snapshot()?);
    let ticked = batch.commands.len();
    if ticked == 0 {
        return Ok(0);
    }

    for notification in batch.notifications {
        state.notify(notification);
    }
    state.dispatch_all(batch.commands)?;
    Ok(ticked)
}

/// Background task driving all running timers until `shutdown` is cancelled
pub async fn tick_driver_task(state: Arc<AppState>, period: Duration, shutdown: CancellationToken) {
    info!("Starting tick driver task");

    let mut interval = interval_at(Instant::now() + period, period);
    // A late firing is dropped rather than followed by a catch-up burst
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Tick driver stopped");
                break;
            }
            _ = interval.tick() => {
                match run_tick_batch(&state) {
                    Ok(0) => {}
                    Ok(ticked) => debug!("Ticked {} running timers", ticked),
                    Err(e) => error!("Failed to run tick batch: {}", e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        persistence::StatePersistence,
        services::NewTimer,
        state::{Timer, TimerId},
    };

    fn running(id: &str, duration: u64, remaining: u64) -> Timer {
        let mut timer = Timer::with_id(TimerId::from(id), id, "Work", duration, "2024-06-10T06:13:20Z");
        timer.remaining = remaining;
        timer.status = crate::state::TimerStatus::Running;
        timer
    }

    fn names(batch: &TickBatch) -> Vec<String> {
        batch.notifications.iter().map(Notification::message).collect()
    }

    #[test]
    fn plans_one_tick_per_running_timer() {
        let mut paused = running("paused", 10, 10);
        paused.status = crate::state::TimerStatus::Paused;
        let snapshot = TimersState {
            timers: vec![running("a", 10, 9), paused, running("b", 10, 3)],
            history: Vec::new(),
        };

        let batch = plan_tick_batch(&snapshot);
        assert_eq!(
            batch.commands,
            vec![
                Command::Tick(TimerId::from("a")),
                Command::Tick(TimerId::from("b")),
            ]
        );
        assert!(batch.notifications.is_empty());
    }

    #[test]
    fn halfway_notice_uses_pre_tick_value() {
        let snapshot = TimersState {
            timers: vec![running("a", 10, 5), running("b", 11, 6)],
            history: Vec::new(),
        };
        assert_eq!(names(&plan_tick_batch(&snapshot)), ["a is halfway done!"]);
    }

    #[test]
    fn completion_notice_on_last_second() {
        let snapshot = TimersState {
            timers: vec![running("a", 10, 1), running("b", 2, 1)],
            history: Vec::new(),
        };
        assert_eq!(
            names(&plan_tick_batch(&snapshot)),
            ["a is completed!", "b is halfway done!", "b is completed!"]
        );
    }

    #[test]
    fn idle_state_plans_nothing() {
        assert_eq!(plan_tick_batch(&TimersState::new()), TickBatch::default());
    }

    #[test]
    fn run_batch_applies_ticks_and_emits_notifications() {
        let state = AppState::new(0, "127.0.0.1".to_string(), StatePersistence::in_memory());
        let id = state
            .create_timer(&NewTimer::new("Plank", "Exercise", 2))
            .unwrap()
            .timers[0]
            .id
            .clone();
        let mut notifications = state.subscribe_notifications();

        assert_eq!(run_tick_batch(&state).unwrap(), 0);
        state.start(id).unwrap();

        assert_eq!(run_tick_batch(&state).unwrap(), 1);
        assert_eq!(state.snapshot().unwrap().timers[0].remaining, 1);
        assert_eq!(run_tick_batch(&state).unwrap(), 1);

        let finished = state.snapshot().unwrap();
        assert!(finished.timers.is_empty());
        assert_eq!(finished.history.len(), 1);

        let received: Vec<String> = std::iter::from_fn(|| notifications.try_recv().ok())
            .map(|n| n.message())
            .collect();
        assert_eq!(received, ["Plank is halfway done!", "Plank is completed!"]);
    }

    #[tokio::test]
    async fn driver_counts_down_until_cancelled() {
        let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), StatePersistence::in_memory()));
        let snapshot = state.create_timer(&NewTimer::new("Tea", "Break", 3)).unwrap();
        state.start(snapshot.timers[0].id.clone()).unwrap();
        let mut rx = state.subscribe();

        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(tick_driver_task(
            Arc::clone(&state),
            Duration::from_millis(10),
            shutdown.clone(),
        ));

        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|s| s.history.len() == 1),
        )
        .await;
        assert!(finished.is_ok_and(|waited| waited.is_ok()));

        shutdown.cancel();
        assert!(tokio::time::timeout(Duration::from_secs(5), handle).await.is_ok());
        assert!(state.snapshot().unwrap().timers.is_empty());
    }
}
