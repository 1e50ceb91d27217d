//! Mock implementations for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use session_core::{Error, Result, Session, SessionPatch, SessionStatus, TutorProfile};
use session_store::{MemoryStore, SessionStore};
use uuid::Uuid;

/// Store wrapper with a switchable failure mode.
///
/// This implements the same `SessionStore` trait as the real store and
/// delegates every call to a `MemoryStore`, so tests run the production
/// read and write paths. Flipping the switch makes every call fail, for
/// exercising the 500 paths and health reporting.
pub struct FailingStore {
    inner: MemoryStore,
    /// Simulate failures if set.
    should_fail: Mutex<bool>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::default(),
            should_fail: Mutex::new(false),
        }
    }

    /// Set failure mode for testing error handling.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }

    fn gate(&self) -> Result<()> {
        if *self.should_fail.lock() {
            return Err(Error::store("store offline"));
        }
        Ok(())
    }
}

impl Default for FailingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for FailingStore {
    async fn create_session(&self, session: Session) -> Result<Session> {
        self.gate()?;
        self.inner.create_session(session).await
    }

    async fn get_session(&self, id: Uuid) -> Result<Session> {
        self.gate()?;
        self.inner.get_session(id).await
    }

    async fn conditional_update(
        &self,
        id: Uuid,
        expected_version: u64,
        patch: SessionPatch,
    ) -> Result<Session> {
        self.gate()?;
        self.inner.conditional_update(id, expected_version, patch).await
    }

    async fn list_open_sessions(&self) -> Result<Vec<Session>> {
        self.gate()?;
        self.inner.list_open_sessions().await
    }

    async fn list_sessions_in(&self, statuses: &[SessionStatus]) -> Result<Vec<Session>> {
        self.gate()?;
        self.inner.list_sessions_in(statuses).await
    }

    async fn list_tutors(&self) -> Result<Vec<TutorProfile>> {
        self.gate()?;
        self.inner.list_tutors().await
    }

    async fn get_tutor(&self, id: &str) -> Result<Option<TutorProfile>> {
        self.gate()?;
        self.inner.get_tutor(id).await
    }

    async fn upsert_tutor(&self, tutor: TutorProfile) -> Result<()> {
        self.gate()?;
        self.inner.upsert_tutor(tutor).await
    }

    fn is_healthy(&self) -> bool {
        !*self.should_fail.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use chrono::Utc;

    #[tokio::test]
    async fn test_failing_store_delegates_when_healthy() {
        let store = FailingStore::new();
        let session =
            fixtures::session_created_at("Algebra", SessionStatus::Searching, Utc::now());
        let id = session.id;

        store.create_session(session).await.unwrap();
        let stored = store.get_session(id).await.unwrap();
        assert_eq!(stored.id, id);
        assert!(store.is_healthy());
    }

    #[tokio::test]
    async fn test_failing_store_failure_mode() {
        let store = FailingStore::new();
        store.set_should_fail(true);

        let err = store.get_session(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::Store(_)), "got {:?}", err);
        assert!(!store.is_healthy());

        // Recovery restores the delegate untouched.
        store.set_should_fail(false);
        assert!(store.is_healthy());
        assert!(store.list_open_sessions().await.unwrap().is_empty());
    }
}
