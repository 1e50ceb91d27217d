//! Session booking and lifecycle endpoints.
//!
//! Handlers stay thin: validation and state rules live in the coordinator
//! services, and every domain error converts to the wire envelope through
//! `ApiError`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use coordinator::AvailabilityFilter;
use serde::Deserialize;
use session_core::{CreateSessionRequest, Session, SessionStatus, SubjectTag};
use uuid::Uuid;

use crate::response::ApiError;
use crate::state::AppState;

/// Body for accept and decline calls.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorActionRequest {
    pub tutor_id: String,
}

/// Body for generic status changes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeRequest {
    pub status: SessionStatus,
}

/// Query parameters for the availability listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub subject: Option<String>,
    pub tutor_id: Option<String>,
}

/// POST /sessions - Book a session.
pub async fn create_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let session = state.booking.create(request).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /sessions/:id - Fetch one session.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, ApiError> {
    let session = state.store.get_session(id).await?;
    Ok(Json(session))
}

/// PUT /sessions/:id/accept - A tutor claims the session.
pub async fn accept_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TutorActionRequest>,
) -> Result<Json<Session>, ApiError> {
    let session = state.claims.try_claim(id, &request.tutor_id).await?;
    Ok(Json(session))
}

/// PUT /sessions/:id/decline - A tutor declines the session.
pub async fn decline_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TutorActionRequest>,
) -> Result<Json<Session>, ApiError> {
    let session = state.claims.decline(id, &request.tutor_id).await?;
    Ok(Json(session))
}

/// PUT /sessions/:id/status - Generic lifecycle transition.
pub async fn status_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusChangeRequest>,
) -> Result<Json<Session>, ApiError> {
    let session = state
        .lifecycle
        .request_transition(id, request.status)
        .await?;
    Ok(Json(session))
}

/// GET /sessions/available - Sessions a tutor could answer right now.
pub async fn available_handler(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<Session>>, ApiError> {
    let filter = AvailabilityFilter {
        subject: query
            .subject
            .filter(|s| !s.trim().is_empty())
            .map(SubjectTag::new),
        tutor_id: query.tutor_id,
    };
    let sessions = state.matching.available_sessions(&filter).await?;
    Ok(Json(sessions))
}
