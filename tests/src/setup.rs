//! Common test setup functions.

use std::sync::Arc;

use api::{router, AppState};
use axum::Router;
use session_core::TagIndex;
use session_store::SessionStore;

use crate::fixtures;
use crate::mocks::FailingStore;

/// Test context over an in-memory store.
///
/// This provides the same production code paths by:
/// - Using the real Axum router with all middleware
/// - Using FailingStore, which wraps a real MemoryStore and implements the
///   SessionStore trait, so failure injection is one switch away
/// - Seeding a small tutor directory against the built-in subject catalog
pub struct TestContext {
    pub store: Arc<FailingStore>,
    pub router: Router,
}

impl TestContext {
    /// Create a new test context with a seeded tutor directory.
    pub async fn new() -> Self {
        let store = Arc::new(FailingStore::new());

        for tutor in [
            fixtures::tutor("tutor-asha", "Asha", &["Algebra", "Geometry"]),
            fixtures::tutor("tutor-bela", "Bela", &["Physics"]),
            fixtures::tutor("tutor-chen", "Chen", &["English"]),
        ] {
            store
                .upsert_tutor(tutor)
                .await
                .expect("Failed to seed tutor");
        }

        let state = AppState::new(
            store.clone() as Arc<dyn SessionStore>,
            Arc::new(TagIndex::builtin()),
        );
        let router = router(state);

        Self { store, router }
    }

    /// Set the store to fail (for error testing).
    pub fn set_store_failure(&self, should_fail: bool) {
        self.store.set_should_fail(should_fail);
    }
}
