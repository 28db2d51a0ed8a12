//! HTTP API module
//!
//! This module exposes the timer command surface over HTTP.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/timers",
            get(list_timers_handler)
                .post(create_timer_handler)
                .delete(delete_all_handler),
        )
        .route("/timers/grouped", get(grouped_timers_handler))
        .route("/timers/start-all", post(start_all_handler))
        .route("/timers/pause-all", post(pause_all_handler))
        .route("/timers/:id", delete(delete_timer_handler))
        .route("/timers/:id/start", post(start_timer_handler))
        .route("/timers/:id/pause", post(pause_timer_handler))
        .route("/timers/:id/reset", post(reset_timer_handler))
        .route("/timers/:id/tick", post(tick_timer_handler))
        .route("/history", get(history_handler).delete(clear_history_handler))
        .route("/history/summary", get(history_summary_handler))
        .route("/history/export", get(history_export_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
