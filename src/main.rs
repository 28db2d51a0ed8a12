//! Timer Board - A state-managed HTTP server for named countdown timers
//!
//! This is the main entry point for the timer-board application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use timer_board::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::{BackgroundTasks, TICK_INTERVAL},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("timer_board={},tower_http=info", config.log_level()))
        .init();

    info!("Starting timer-board server v{}", env!("CARGO_PKG_VERSION"));
    if config.in_memory {
        info!("Configuration: host={}, port={}, storage=memory", config.host, config.port);
    } else {
        info!("Configuration: host={}, port={}, storage={}",
              config.host, config.port, config.data_dir().display());
    }

    // Create the store and restore the last saved state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), config.persistence()));
    state.init()?;

    let tasks = BackgroundTasks::spawn(&state, TICK_INTERVAL);

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers              - List active timers and history");
    info!("  POST   /timers              - Create a timer");
    info!("  POST   /timers/:id/start    - Start a timer (also pause, reset, tick)");
    info!("  DELETE /timers/:id          - Delete a timer");
    info!("  GET    /history/export      - Download timer_history.json");
    info!("  DELETE /history             - Clear history");
    info!("  GET    /status              - Check current status");

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Shutdown signal received, stopping background tasks");
    tasks.shutdown().await;

    info!("Server shutdown complete");
    Ok(())
}
