//! Unified error types for the coordination service.
//!
//! Every error carries a stable wire code:
//! - invalid_request: malformed or rule-breaking input (400)
//! - invalid_transition: lifecycle edge outside the transition table (409)
//! - conflict: lost a concurrent write race (409)
//! - not_found: unknown session (404)
//! - internal: storage or other unexpected failure (500)

use thiserror::Error;
use uuid::Uuid;

use crate::session::SessionStatus;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the coordination service.
#[derive(Debug, Error)]
pub enum Error {
    /// The request is malformed or violates a booking rule. Nothing was created.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The requested lifecycle edge is not in the transition table.
    #[error("invalid transition from {from} to {requested}")]
    InvalidTransition {
        from: SessionStatus,
        requested: SessionStatus,
    },

    /// A concurrent writer got there first. Routine under contention.
    #[error("conflict: {0}")]
    Conflict(String),

    /// No session with this id exists.
    #[error("session not found: {0}")]
    NotFound(Uuid),

    /// The session store failed.
    #[error("storage error: {0}")]
    Store(String),
}

impl Error {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Stable wire code for the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::Store(_) => "internal",
        }
    }

    /// HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 400,
            Self::InvalidTransition { .. } => 409,
            Self::Conflict(_) => 409,
            Self::NotFound(_) => 404,
            Self::Store(_) => 500,
        }
    }

    /// True when this is an optimistic-concurrency loss rather than a caller mistake.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
