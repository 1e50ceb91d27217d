//! Status transition rules and write planning.
//!
//! All legality decisions live here as pure functions. Callers read the
//! current record, plan against it, and submit the plan through the store's
//! conditional write, so a stale read can never produce a hidden overwrite.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::session::{PaymentStatus, Session, SessionPatch, SessionStatus};

/// Outcome of planning a write against a session.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionPlan {
    /// Submit this patch with the session's current version.
    Apply(SessionPatch),
    /// Already in the requested state. Nothing to write.
    Noop,
}

fn cancel_patch(now: DateTime<Utc>, payment_status: Option<PaymentStatus>) -> SessionPatch {
    SessionPatch {
        status: Some(SessionStatus::Cancelled),
        end_time: Some(now),
        payment_status,
        ..Default::default()
    }
}

fn addressed_to_other(session: &Session) -> Error {
    Error::conflict(format!(
        "session {} is addressed to a different tutor",
        session.id
    ))
}

/// Plans a caller-requested status change.
///
/// Claim-shaped edges are not plannable here. Attaching a tutor goes through
/// [`plan_claim`] so the tutor id always travels with the status flip.
pub fn plan_transition(
    session: &Session,
    requested: SessionStatus,
    now: DateTime<Utc>,
) -> Result<TransitionPlan> {
    use SessionStatus::*;

    match (session.status, requested) {
        // Cancellation is allowed from every live state.
        (Searching, Cancelled)
        | (PendingTutorApproval, Cancelled)
        | (PaidWaiting, Cancelled)
        | (InProgress, Cancelled) => Ok(TransitionPlan::Apply(cancel_patch(now, None))),

        // Abandoning checkout also settles the payment record.
        (PendingPayment, Cancelled) => Ok(TransitionPlan::Apply(cancel_patch(
            now,
            Some(PaymentStatus::Failed),
        ))),

        (PendingPayment, PaidWaiting) => Ok(TransitionPlan::Apply(SessionPatch {
            status: Some(PaidWaiting),
            payment_status: Some(PaymentStatus::Success),
            ..Default::default()
        })),

        (PaidWaiting, InProgress) => Ok(TransitionPlan::Apply(SessionPatch {
            status: Some(InProgress),
            actual_start_time: Some(now),
            ..Default::default()
        })),

        // Both parties send a start signal; the second one must not error.
        (InProgress, InProgress) => Ok(TransitionPlan::Noop),

        (InProgress, Completed) => Ok(TransitionPlan::Apply(SessionPatch {
            status: Some(Completed),
            end_time: Some(now),
            ..Default::default()
        })),

        // Claim-shaped edges included: without a tutor id they are not
        // plannable here, so they fall through like any undefined edge.
        (from, requested) => Err(Error::InvalidTransition { from, requested }),
    }
}

/// Plans a tutor's claim on a session.
///
/// The winning patch attaches the tutor and moves the session to
/// `pending_payment` in the same write. For a direct request only the
/// addressed tutor may claim; anyone else loses with a conflict.
pub fn plan_claim(session: &Session, tutor_id: &str) -> Result<SessionPatch> {
    match session.status {
        SessionStatus::Searching => Ok(SessionPatch {
            status: Some(SessionStatus::PendingPayment),
            tutor_id: Some(tutor_id.to_string()),
            ..Default::default()
        }),
        SessionStatus::PendingTutorApproval => match session.tutor_id.as_deref() {
            Some(addressed) if addressed == tutor_id => Ok(SessionPatch {
                status: Some(SessionStatus::PendingPayment),
                ..Default::default()
            }),
            _ => Err(addressed_to_other(session)),
        },
        from => Err(Error::InvalidTransition {
            from,
            requested: SessionStatus::PendingPayment,
        }),
    }
}

/// Plans a tutor's decline.
///
/// Declining an open search is a no-op; the session stays visible to other
/// tutors. Declining a direct request cancels the session.
pub fn plan_decline(
    session: &Session,
    tutor_id: &str,
    now: DateTime<Utc>,
) -> Result<TransitionPlan> {
    match session.status {
        SessionStatus::Searching => Ok(TransitionPlan::Noop),
        SessionStatus::PendingTutorApproval => match session.tutor_id.as_deref() {
            Some(addressed) if addressed == tutor_id => {
                Ok(TransitionPlan::Apply(cancel_patch(now, None)))
            }
            _ => Err(addressed_to_other(session)),
        },
        from => Err(Error::InvalidTransition {
            from,
            requested: SessionStatus::Cancelled,
        }),
    }
}
