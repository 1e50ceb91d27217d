//! API routes.

pub mod health;
pub mod sessions;
pub mod tutors;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Creates the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/sessions", post(sessions::create_handler))
        .route("/sessions/available", get(sessions::available_handler))
        .route("/sessions/:id", get(sessions::get_handler))
        .route("/sessions/:id/accept", put(sessions::accept_handler))
        .route("/sessions/:id/decline", put(sessions::decline_handler))
        .route("/sessions/:id/status", put(sessions::status_handler))
        .route("/tutors/available", get(tutors::available_handler))
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::ready_handler))
        .route("/health/live", get(health::live_handler))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
