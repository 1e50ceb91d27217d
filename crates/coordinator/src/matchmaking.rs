//! Matching and availability queries.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use session_core::{
    find_compatible_tutors, Result, Session, SessionStatus, SubjectTag, TagIndex, TutorMatch,
    TutorProfile,
};
use session_store::SessionStore;
use tracing::debug;

/// Cache TTL for the tutor directory (10 seconds).
const DIRECTORY_CACHE_TTL: Duration = Duration::from_secs(10);

/// Cache key for the single directory entry.
const DIRECTORY_CACHE_KEY: &str = "directory";

/// Answers matching and availability queries.
///
/// The tutor directory changes rarely next to the query rate, so listings
/// are cached briefly. Session listings always hit the store.
#[derive(Clone)]
pub struct MatchService {
    store: Arc<dyn SessionStore>,
    index: Arc<TagIndex>,
    directory_cache: Cache<&'static str, Arc<Vec<TutorProfile>>>,
}

/// Filters for the availability listing.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityFilter {
    /// Keep only sessions compatible with this subject
    pub subject: Option<SubjectTag>,
    /// The asking tutor, so their direct requests are included
    pub tutor_id: Option<String>,
}

impl MatchService {
    pub fn new(store: Arc<dyn SessionStore>, index: Arc<TagIndex>) -> Self {
        Self {
            store,
            index,
            directory_cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(DIRECTORY_CACHE_TTL)
                .build(),
        }
    }

    pub fn index(&self) -> &TagIndex {
        &self.index
    }

    async fn directory(&self) -> Result<Arc<Vec<TutorProfile>>> {
        if let Some(cached) = self.directory_cache.get(DIRECTORY_CACHE_KEY).await {
            debug!("Tutor directory cache hit");
            return Ok(cached);
        }

        let tutors = Arc::new(self.store.list_tutors().await?);
        self.directory_cache
            .insert(DIRECTORY_CACHE_KEY, tutors.clone())
            .await;
        Ok(tutors)
    }

    /// Compatible tutors for a subject, exact matches first.
    pub async fn compatible_tutors(&self, subject: &SubjectTag) -> Result<Vec<TutorMatch>> {
        let directory = self.directory().await?;
        Ok(find_compatible_tutors(&self.index, subject, &directory))
    }

    /// Sessions a tutor could answer right now, oldest first.
    ///
    /// Open searches are visible to everyone; a direct request only to the
    /// tutor it addresses.
    pub async fn available_sessions(&self, filter: &AvailabilityFilter) -> Result<Vec<Session>> {
        let open = self.store.list_open_sessions().await?;
        Ok(open
            .into_iter()
            .filter(|session| self.visible(session, filter))
            .collect())
    }

    fn visible(&self, session: &Session, filter: &AvailabilityFilter) -> bool {
        let audience_ok = match session.status {
            SessionStatus::Searching => true,
            SessionStatus::PendingTutorApproval => {
                match (&filter.tutor_id, &session.tutor_id) {
                    (Some(asking), Some(addressed)) => asking == addressed,
                    _ => false,
                }
            }
            _ => false,
        };
        if !audience_ok {
            return false;
        }

        match &filter.subject {
            Some(subject) => self.index.compatible(subject, &session.topic),
            None => true,
        }
    }
}
