//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use telemetry::{health, metrics};

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /health - Full health check.
///
/// The store flag is re-checked on every call so a recovered store flips
/// the report back without waiting for a write to succeed.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    health()
        .store
        .observe(state.store.is_healthy(), "store unavailable");

    let report = health().report();

    Json(HealthResponse {
        status: format!("{:?}", report.status).to_lowercase(),
        store_connected: health().store.is_healthy(),
        sweeper_running: health().sweeper.is_healthy(),
        open_sessions: metrics().open_sessions.get(),
    })
}

/// GET /health/ready - Readiness probe (can accept traffic).
pub async fn ready_handler() -> StatusCode {
    if health().is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health/live - Liveness probe (service is running).
pub async fn live_handler() -> StatusCode {
    if health().is_alive() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
