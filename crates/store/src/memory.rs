//! In-memory store backed by process-local maps.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use session_core::{Error, Result, Session, SessionPatch, SessionStatus, TutorProfile};
use tracing::debug;
use uuid::Uuid;

use crate::config::MemoryStoreConfig;
use crate::store::SessionStore;

/// In-memory implementation of [`SessionStore`].
///
/// Sessions live in a map behind a single `RwLock`. The conditional update
/// runs entirely under one write guard, which is what makes the version
/// compare and the patch application a single atomic step.
pub struct MemoryStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    tutors: RwLock<HashMap<String, TutorProfile>>,
    config: MemoryStoreConfig,
}

impl MemoryStore {
    pub fn new(config: MemoryStoreConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            tutors: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Number of session records currently held.
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(MemoryStoreConfig::default())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, session: Session) -> Result<Session> {
        let mut sessions = self.sessions.write();
        if sessions.len() >= self.config.max_sessions {
            return Err(Error::store("session capacity reached"));
        }
        if sessions.contains_key(&session.id) {
            return Err(Error::conflict(format!(
                "session {} already exists",
                session.id
            )));
        }
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: Uuid) -> Result<Session> {
        self.sessions
            .read()
            .get(&id)
            .cloned()
            .ok_or(Error::NotFound(id))
    }

    async fn conditional_update(
        &self,
        id: Uuid,
        expected_version: u64,
        patch: SessionPatch,
    ) -> Result<Session> {
        let mut sessions = self.sessions.write();
        let session = sessions.get_mut(&id).ok_or(Error::NotFound(id))?;

        if session.version != expected_version {
            debug!(
                session_id = %id,
                expected = expected_version,
                actual = session.version,
                "Version mismatch on conditional update"
            );
            return Err(Error::conflict(format!(
                "session {} was modified concurrently",
                id
            )));
        }

        patch.apply_to(session);
        session.updated_at = Utc::now();
        session.version += 1;
        Ok(session.clone())
    }

    async fn list_open_sessions(&self) -> Result<Vec<Session>> {
        self.list_sessions_in(&[
            SessionStatus::Searching,
            SessionStatus::PendingTutorApproval,
        ])
        .await
    }

    async fn list_sessions_in(&self, statuses: &[SessionStatus]) -> Result<Vec<Session>> {
        let sessions = self.sessions.read();
        let mut out: Vec<Session> = sessions
            .values()
            .filter(|s| statuses.contains(&s.status))
            .cloned()
            .collect();
        out.sort_by_key(|s| s.created_at);
        Ok(out)
    }

    async fn list_tutors(&self) -> Result<Vec<TutorProfile>> {
        let tutors = self.tutors.read();
        let mut out: Vec<TutorProfile> = tutors.values().cloned().collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }

    async fn get_tutor(&self, id: &str) -> Result<Option<TutorProfile>> {
        Ok(self.tutors.read().get(id).cloned())
    }

    async fn upsert_tutor(&self, tutor: TutorProfile) -> Result<()> {
        self.tutors.write().insert(tutor.id.clone(), tutor);
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        true
    }
}
