pub mod handlers;

use crate::calendar::CalendarGateway;
use crate::config::Config;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use handlers::{health_handler, index_handler, schedule_handler, upcoming_handler};

#[derive(Clone)]
pub struct AppState {
    /// Shared application configuration
    pub config: Arc<RwLock<Config>>,
    /// Client for the calendar provider
    pub gateway: CalendarGateway,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/schedule", post(schedule_handler))
        .route("/upcoming", get(upcoming_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
