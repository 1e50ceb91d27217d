//! Tutor directory endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use session_core::{SubjectTag, TutorMatch};

use crate::response::ApiError;
use crate::state::AppState;

/// Query parameters for the tutor listing.
#[derive(Debug, Deserialize)]
pub struct TutorQuery {
    pub subject: String,
}

/// GET /tutors/available - Compatible tutors for a subject, exact matches first.
pub async fn available_handler(
    State(state): State<AppState>,
    Query(query): Query<TutorQuery>,
) -> Result<Json<Vec<TutorMatch>>, ApiError> {
    if query.subject.trim().is_empty() {
        return Err(ApiError::bad_request("subject must not be blank"));
    }

    let subject = SubjectTag::new(query.subject);
    let matches = state.matching.compatible_tutors(&subject).await?;
    Ok(Json(matches))
}
