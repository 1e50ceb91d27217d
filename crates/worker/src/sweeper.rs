//! Expiry sweeper for sessions stuck in a waiting state.
//!
//! Nothing on the session record marks it expired; timeouts are policy. The
//! sweeper scans the waiting states on an interval, plans a cancellation
//! through the regular transition table, and writes it with the version it
//! observed. A session someone acts on mid-sweep wins the version race and
//! the sweeper moves on.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use session_core::{plan_transition, Result, Session, SessionStatus, TransitionPlan};
use session_store::SessionStore;
use telemetry::metrics;
use tracing::{debug, info, warn};

/// States the sweeper watches.
const SWEPT_STATUSES: &[SessionStatus] = &[
    SessionStatus::Searching,
    SessionStatus::PendingTutorApproval,
    SessionStatus::PendingPayment,
];

/// Cutoffs for each watched state.
#[derive(Debug, Clone, Copy)]
pub struct SweepTimeouts {
    /// How long an open search may stay unclaimed
    pub search: Duration,
    /// How long a direct request may wait on its tutor
    pub approval: Duration,
    /// How long a claimed session may sit unpaid
    pub payment: Duration,
}

impl Default for SweepTimeouts {
    fn default() -> Self {
        Self {
            search: Duration::minutes(30),
            approval: Duration::hours(24),
            payment: Duration::minutes(15),
        }
    }
}

/// Outcome of one sweep pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub examined: usize,
    pub cancelled: usize,
    pub conflicts: usize,
}

/// Worker that cancels sessions whose waiting state outlived its timeout.
pub struct ExpirySweeper {
    store: Arc<dyn SessionStore>,
    timeouts: SweepTimeouts,
}

impl ExpirySweeper {
    pub fn new(store: Arc<dyn SessionStore>, timeouts: SweepTimeouts) -> Self {
        Self { store, timeouts }
    }

    /// One pass over the waiting states.
    pub async fn run(&self) -> Result<SweepReport> {
        let now = Utc::now();
        let candidates = self.store.list_sessions_in(SWEPT_STATUSES).await?;

        let mut report = SweepReport {
            examined: candidates.len(),
            ..Default::default()
        };

        for session in &candidates {
            let Some(reason) = expiry_reason(session, &self.timeouts, now) else {
                continue;
            };

            // Plan on the listed snapshot and write with its version. The
            // listing may be stale; the conditional write is what decides.
            let Ok(TransitionPlan::Apply(patch)) =
                plan_transition(session, SessionStatus::Cancelled, now)
            else {
                continue;
            };

            match self
                .store
                .conditional_update(session.id, session.version, patch)
                .await
            {
                Ok(cancelled) => {
                    report.cancelled += 1;
                    metrics().sweeper_cancellations.inc();
                    metrics().sessions_cancelled.inc();
                    info!(
                        session_id = %session.id,
                        from = %session.status,
                        to = %cancelled.status,
                        reason = reason,
                        "Cancelled expired session"
                    );
                }
                Err(e) if e.is_conflict() => {
                    report.conflicts += 1;
                    metrics().sweeper_conflicts.inc();
                    debug!(
                        session_id = %session.id,
                        "Session changed mid-sweep, skipping"
                    );
                }
                Err(e) => {
                    warn!(session_id = %session.id, error = %e, "Sweep write failed");
                }
            }
        }

        metrics().sweeps_run.inc();
        self.refresh_gauges().await;

        if report.cancelled > 0 || report.conflicts > 0 {
            info!(
                examined = report.examined,
                cancelled = report.cancelled,
                conflicts = report.conflicts,
                "Sweep complete"
            );
        }
        Ok(report)
    }

    /// Refreshes the open/live session gauges from fresh listings.
    async fn refresh_gauges(&self) {
        match self.store.list_open_sessions().await {
            Ok(open) => metrics().open_sessions.set(open.len() as u64),
            Err(e) => debug!(error = %e, "Could not refresh open-session gauge"),
        }
        match self
            .store
            .list_sessions_in(&[SessionStatus::InProgress])
            .await
        {
            Ok(live) => metrics().live_sessions.set(live.len() as u64),
            Err(e) => debug!(error = %e, "Could not refresh live-session gauge"),
        }
    }
}

/// Why a session should expire now, or None while it is within bounds.
///
/// Search and approval ages run from creation. Payment age runs from
/// `updated_at`, the claim write, so a claim late in a long search still
/// gets the full payment window.
fn expiry_reason(
    session: &Session,
    timeouts: &SweepTimeouts,
    now: DateTime<Utc>,
) -> Option<&'static str> {
    match session.status {
        SessionStatus::Searching if now - session.created_at > timeouts.search => {
            Some("search window elapsed")
        }
        SessionStatus::PendingTutorApproval if now - session.created_at > timeouts.approval => {
            Some("approval window elapsed")
        }
        SessionStatus::PendingPayment if now - session.updated_at > timeouts.payment => {
            Some("payment window elapsed")
        }
        _ => None,
    }
}
