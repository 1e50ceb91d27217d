//! Application state shared across handlers.

use std::sync::Arc;

use coordinator::{BookingOrchestrator, ClaimCoordinator, LifecycleService, MatchService};
use session_core::TagIndex;
use session_store::SessionStore;

/// Shared application state.
///
/// Every service borrows the same store handle; the coordination services
/// are cheap handles themselves and clone per request.
#[derive(Clone)]
pub struct AppState {
    /// Session and tutor persistence
    pub store: Arc<dyn SessionStore>,
    /// Booking validation and creation
    pub booking: BookingOrchestrator,
    /// Claim and decline coordination
    pub claims: ClaimCoordinator,
    /// Generic lifecycle transitions
    pub lifecycle: LifecycleService,
    /// Matching and availability queries
    pub matching: MatchService,
}

impl AppState {
    pub fn new(store: Arc<dyn SessionStore>, index: Arc<TagIndex>) -> Self {
        Self {
            booking: BookingOrchestrator::new(store.clone()),
            claims: ClaimCoordinator::new(store.clone()),
            lifecycle: LifecycleService::new(store.clone()),
            matching: MatchService::new(store.clone(), index),
            store,
        }
    }
}
