//! Claim coordination for tutor responses.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use session_core::{plan_claim, plan_decline, Error, Result, Session, TransitionPlan};
use session_store::SessionStore;
use telemetry::metrics;
use tracing::{debug, info};
use uuid::Uuid;

/// Serializes tutor claims through the store's conditional write.
///
/// A claim is one read plus one conditional write, never retried here. Once
/// another tutor holds the session a retry cannot win it back, so the loss
/// goes straight to the caller as a conflict.
#[derive(Clone)]
pub struct ClaimCoordinator {
    store: Arc<dyn SessionStore>,
}

impl ClaimCoordinator {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// A tutor accepts a session.
    ///
    /// The winning write attaches the tutor and moves the session to
    /// `pending_payment` atomically.
    pub async fn try_claim(&self, session_id: Uuid, tutor_id: &str) -> Result<Session> {
        let start = Instant::now();
        metrics().claims_attempted.inc();

        let session = self.store.get_session(session_id).await?;
        let patch = match plan_claim(&session, tutor_id) {
            Ok(patch) => patch,
            // A live session outside the claimable states was taken by an
            // earlier claim; that is an ownership loss for this caller.
            // Terminal sessions keep the transition error.
            Err(Error::InvalidTransition { .. })
                if !session.status.is_terminal() && !session.status.is_claimable() =>
            {
                metrics().claims_conflicted.inc();
                debug!(session_id = %session_id, tutor_id = %tutor_id, "Claim refused, session already taken");
                return Err(Error::conflict(format!(
                    "session {} is already taken",
                    session_id
                )));
            }
            Err(e) => {
                if e.is_conflict() {
                    metrics().claims_conflicted.inc();
                    debug!(session_id = %session_id, tutor_id = %tutor_id, "Claim refused, session addressed elsewhere");
                }
                return Err(e);
            }
        };

        match self
            .store
            .conditional_update(session_id, session.version, patch)
            .await
        {
            Ok(updated) => {
                metrics().claims_won.inc();
                metrics()
                    .claim_latency_ms
                    .observe(start.elapsed().as_millis() as u64);
                info!(session_id = %session_id, tutor_id = %tutor_id, "Tutor claimed session");
                Ok(updated)
            }
            Err(e) if e.is_conflict() => {
                metrics().claims_conflicted.inc();
                debug!(session_id = %session_id, tutor_id = %tutor_id, "Lost claim race");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// A tutor declines a session.
    ///
    /// Declining an open search leaves it open for everyone else; declining
    /// a direct request cancels it.
    pub async fn decline(&self, session_id: Uuid, tutor_id: &str) -> Result<Session> {
        metrics().declines.inc();

        let session = self.store.get_session(session_id).await?;
        match plan_decline(&session, tutor_id, Utc::now())? {
            TransitionPlan::Noop => {
                debug!(session_id = %session_id, tutor_id = %tutor_id, "Decline on open search ignored");
                Ok(session)
            }
            TransitionPlan::Apply(patch) => {
                let updated = self
                    .store
                    .conditional_update(session_id, session.version, patch)
                    .await?;
                metrics().sessions_cancelled.inc();
                info!(session_id = %session_id, tutor_id = %tutor_id, "Tutor declined session");
                Ok(updated)
            }
        }
    }
}
