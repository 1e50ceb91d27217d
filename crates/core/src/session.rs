//! Session record and lifecycle states.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::subject::SubjectTag;

/// Lifecycle state of a session.
///
/// `Completed` and `Cancelled` are terminal. Every other state has at least
/// one outgoing edge in the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Open search, visible to every compatible tutor
    Searching,
    /// Direct request, waiting on the addressed tutor
    PendingTutorApproval,
    /// A tutor is attached, waiting on payment
    PendingPayment,
    /// Paid, waiting for the meeting to start
    PaidWaiting,
    /// Meeting underway
    InProgress,
    /// Finished normally
    Completed,
    /// Abandoned, declined, expired, or aborted
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Searching => "searching",
            Self::PendingTutorApproval => "pending_tutor_approval",
            Self::PendingPayment => "pending_payment",
            Self::PaidWaiting => "paid_waiting",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Terminal states accept no further writes.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// States a tutor can still claim or answer.
    pub fn is_claimable(&self) -> bool {
        matches!(self, Self::Searching | Self::PendingTutorApproval)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the meeting is anchored in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingType {
    /// Starts as soon as both sides are ready
    OnDemand,
    /// Booked against a fixed start time
    Scheduled,
}

/// Payment outcome for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

/// A tutoring session as stored and served.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session id
    pub id: Uuid,
    /// Requesting student
    pub student_id: String,
    /// Attached tutor. None while searching; immutable once set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tutor_id: Option<String>,
    /// Requested subject tag
    pub topic: SubjectTag,
    /// Lifecycle state
    pub status: SessionStatus,
    /// On-demand or scheduled
    pub meeting_type: MeetingType,
    /// Fixed start time, scheduled sessions only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_start_time: Option<DateTime<Utc>>,
    /// When the meeting actually began
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_start_time: Option<DateTime<Utc>>,
    /// When the session reached a terminal state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Booked duration cap in minutes
    pub duration_limit_minutes: u32,
    /// Payment outcome
    pub payment_status: PaymentStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Time of the last successful write, maintained by the store
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency token, bumped by the store on every write
    pub version: u64,
}

impl Session {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// True when the session should appear in open-session listings.
    pub fn is_open(&self) -> bool {
        self.status.is_claimable()
    }

    /// Time the session has spent alive, relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.created_at
    }
}

/// Partial update applied through the store's conditional write.
///
/// Absent fields keep their stored value. The store owns the version bump;
/// a patch never carries one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub status: Option<SessionStatus>,
    pub tutor_id: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl SessionPatch {
    /// Folds the patch into a session record.
    pub fn apply_to(&self, session: &mut Session) {
        if let Some(status) = self.status {
            session.status = status;
        }
        if let Some(ref tutor_id) = self.tutor_id {
            session.tutor_id = Some(tutor_id.clone());
        }
        if let Some(payment_status) = self.payment_status {
            session.payment_status = payment_status;
        }
        if let Some(actual_start_time) = self.actual_start_time {
            session.actual_start_time = Some(actual_start_time);
        }
        if let Some(end_time) = self.end_time {
            session.end_time = Some(end_time);
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
