//! Storage abstraction for sessions and tutor profiles.

use async_trait::async_trait;
use session_core::{Result, Session, SessionPatch, SessionStatus, TutorProfile};
use uuid::Uuid;

/// Backend-neutral persistence seam.
///
/// `conditional_update` is the only mutation path for existing sessions. It
/// compares the caller's expected version with the stored one and applies
/// the patch in the same atomic step, bumping the version on success. A
/// mismatch fails with `Conflict` and leaves the record untouched; callers
/// re-read and re-plan instead of retrying blindly.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persists a new session. The id must be fresh.
    async fn create_session(&self, session: Session) -> Result<Session>;

    /// Fetches one session.
    async fn get_session(&self, id: Uuid) -> Result<Session>;

    /// Compare-and-set write against an existing session.
    async fn conditional_update(
        &self,
        id: Uuid,
        expected_version: u64,
        patch: SessionPatch,
    ) -> Result<Session>;

    /// Sessions a tutor could still answer, oldest first.
    async fn list_open_sessions(&self) -> Result<Vec<Session>>;

    /// Sessions currently in any of the given states, oldest first.
    async fn list_sessions_in(&self, statuses: &[SessionStatus]) -> Result<Vec<Session>>;

    /// Every registered tutor profile, in stable order.
    async fn list_tutors(&self) -> Result<Vec<TutorProfile>>;

    /// One tutor profile, if registered.
    async fn get_tutor(&self, id: &str) -> Result<Option<TutorProfile>>;

    /// Inserts or replaces a tutor profile.
    async fn upsert_tutor(&self, tutor: TutorProfile) -> Result<()>;

    /// Cheap liveness signal for health reporting.
    fn is_healthy(&self) -> bool;
}
