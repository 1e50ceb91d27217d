//! Lifecycle transitions requested by clients and workers.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use session_core::{plan_transition, Result, Session, SessionStatus, TransitionPlan};
use session_store::SessionStore;
use telemetry::metrics;
use tracing::{debug, info};
use uuid::Uuid;

/// Applies status changes through the transition table.
#[derive(Clone)]
pub struct LifecycleService {
    store: Arc<dyn SessionStore>,
}

impl LifecycleService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Moves a session to `requested`, enforcing the transition table.
    ///
    /// Repeating the start signal is the one idempotent edge; it returns the
    /// current record without writing.
    pub async fn request_transition(
        &self,
        session_id: Uuid,
        requested: SessionStatus,
    ) -> Result<Session> {
        let start = Instant::now();
        let session = self.store.get_session(session_id).await?;

        let plan = match plan_transition(&session, requested, Utc::now()) {
            Ok(plan) => plan,
            Err(e) => {
                metrics().transitions_rejected.inc();
                debug!(
                    session_id = %session_id,
                    from = %session.status,
                    requested = %requested,
                    "Rejected transition"
                );
                return Err(e);
            }
        };

        let updated = match plan {
            TransitionPlan::Noop => {
                metrics().transitions_noop.inc();
                session
            }
            TransitionPlan::Apply(patch) => {
                let updated = self
                    .store
                    .conditional_update(session_id, session.version, patch)
                    .await?;
                metrics().transitions_applied.inc();
                match updated.status {
                    SessionStatus::Completed => metrics().sessions_completed.inc(),
                    SessionStatus::Cancelled => metrics().sessions_cancelled.inc(),
                    _ => {}
                }
                info!(
                    session_id = %session_id,
                    from = %session.status,
                    to = %updated.status,
                    "Applied transition"
                );
                updated
            }
        };

        metrics()
            .transition_latency_ms
            .observe(start.elapsed().as_millis() as u64);
        Ok(updated)
    }
}
