//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    error::CommandError,
    services::{
        duration_from_parts, export_history, group_by_category, CategoryGroup, HistorySummary,
        NewTimer, HISTORY_EXPORT_FILE_NAME,
    },
    state::{AppState, Timer, TimerId, TimersState},
};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Body of POST /timers.
///
/// `duration` in seconds takes precedence; otherwise the form fields
/// `hours`, `minutes` and `seconds` are combined.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTimerRequest {
    pub name: String,
    pub category: String,
    pub duration: Option<u64>,
    pub hours: Option<u64>,
    pub minutes: Option<u64>,
    pub seconds: Option<u64>,
}

impl CreateTimerRequest {
    fn into_new_timer(self) -> NewTimer {
        let duration = self.duration.unwrap_or_else(|| {
            duration_from_parts(
                self.hours.unwrap_or(0),
                self.minutes.unwrap_or(0),
                self.seconds.unwrap_or(0),
            )
        });
        NewTimer::new(self.name, self.category, duration)
    }
}

fn command_response(
    result: Result<TimersState, CommandError>,
    message: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(state) => Ok(Json(ApiResponse::ok(message, state))),
        Err(e) => {
            error!("Command failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn current_state(state: &AppState) -> Result<TimersState, StatusCode> {
    state.snapshot().map_err(|e| {
        error!("Failed to get timer state: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle GET /timers - Return the aggregate state
pub async fn list_timers_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimersState>, StatusCode> {
    current_state(&state).map(Json)
}

/// Handle GET /timers/grouped - Active timers grouped by category
pub async fn grouped_timers_handler(State(state): State<Arc<AppState>>) -> Result<Json<Vec<CategoryGroup>>, StatusCode> {
    let snapshot = current_state(&state)?;
    Ok(Json(group_by_category(&snapshot.timers)))
}

/// Handle POST /timers - Validate input and create a timer
pub async fn create_timer_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateTimerRequest>,
) -> Result<(StatusCode, Json<ApiResponse>), StatusCode> {
    match state.create_timer(&request.into_new_timer()) {
        Ok(snapshot) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::ok("Timer created!", snapshot)),
        )),
        Err(CommandError::Validation(e)) => {
            let snapshot = current_state(&state)?;
            Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(e.to_string(), snapshot)),
            ))
        }
        Err(e) => {
            error!("Failed to create timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timers/:id/start
pub async fn start_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    command_response(state.start(TimerId::from(id)), "Timer started")
}

/// Handle POST /timers/:id/pause
pub async fn pause_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    command_response(state.pause(TimerId::from(id)), "Timer paused")
}

/// Handle POST /timers/:id/reset
pub async fn reset_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    command_response(state.reset(TimerId::from(id)), "Timer reset")
}

/// Handle POST /timers/:id/tick
pub async fn tick_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    command_response(state.tick(TimerId::from(id)), "Timer ticked")
}

/// Handle DELETE /timers/:id
pub async fn delete_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    command_response(state.delete(TimerId::from(id)), "Timer deleted")
}

/// Handle POST /timers/start-all
pub async fn start_all_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    command_response(state.start_all(), "All timers started")
}

/// Handle POST /timers/pause-all
pub async fn pause_all_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    command_response(state.pause_all(), "All timers paused")
}

/// Handle DELETE /timers - Delete every active timer
pub async fn delete_all_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    command_response(state.delete_all(), "All timers deleted")
}

/// Handle GET /history
pub async fn history_handler(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Timer>>, StatusCode> {
    current_state(&state).map(|snapshot| Json(snapshot.history))
}

/// Handle GET /history/summary
pub async fn history_summary_handler(State(state): State<Arc<AppState>>) -> Result<Json<HistorySummary>, StatusCode> {
    let snapshot = current_state(&state)?;
    Ok(Json(HistorySummary::from_history(&snapshot.history)))
}

/// Handle GET /history/export - Download history as timer_history.json
pub async fn history_export_handler(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, StatusCode> {
    let snapshot = current_state(&state)?;
    let body = export_history(&snapshot.history).map_err(|e| {
        error!("Failed to serialize history: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    info!("Exporting {} history entries", snapshot.history.len());
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", HISTORY_EXPORT_FILE_NAME),
            ),
        ],
        body,
    ))
}

/// Handle DELETE /history
pub async fn clear_history_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    command_response(state.clear_history(), "History cleared")
}

/// Handle GET /status - Return store status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let snapshot = current_state(&state)?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        active_timers: snapshot.timers.len(),
        running_timers: snapshot.running().count(),
        history_entries: snapshot.history.len(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
