//! Booking requests and mode rules.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{Error, Result};
use crate::limits::{MAX_SESSION_MINUTES, MIN_SESSION_MINUTES, SCHEDULE_PAST_GRACE_SECS};
use crate::session::{MeetingType, PaymentStatus, Session, SessionStatus};
use crate::subject::SubjectTag;

/// Booking mode derived from the request shape.
///
/// The meeting type is orthogonal: a scheduled request without a tutor is a
/// marketplace slot, which is just an open search with a fixed start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingMode {
    /// No tutor named, visible to every compatible tutor
    OpenSearch,
    /// Tutor named, only that tutor can answer
    DirectRequest,
}

/// Payload for creating a session.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// Requesting student
    #[validate(length(min = 1, max = 128))]
    pub student_id: String,
    /// Requested subject tag
    #[validate(length(min = 1, max = 200))]
    pub topic: String,
    /// On-demand or scheduled
    pub meeting_type: MeetingType,
    /// Addressed tutor, direct requests only
    #[validate(length(min = 1, max = 128))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutor_id: Option<String>,
    /// Fixed start time, scheduled sessions only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_start_time: Option<DateTime<Utc>>,
    /// Duration cap in minutes
    pub duration_limit_minutes: u32,
}

fn require_nonblank(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_request(format!("{} must not be blank", field)));
    }
    Ok(())
}

impl CreateSessionRequest {
    /// Which booking mode this request selects.
    pub fn mode(&self) -> BookingMode {
        if self.tutor_id.is_some() {
            BookingMode::DirectRequest
        } else {
            BookingMode::OpenSearch
        }
    }

    /// Initial lifecycle state for this mode.
    pub fn initial_status(&self) -> SessionStatus {
        match self.mode() {
            BookingMode::OpenSearch => SessionStatus::Searching,
            BookingMode::DirectRequest => SessionStatus::PendingTutorApproval,
        }
    }

    /// Full shape check. Nothing is created when any rule fails.
    pub fn check(&self, now: DateTime<Utc>) -> Result<()> {
        // Run validator derive validations
        self.validate()
            .map_err(|e| Error::invalid_request(format!("{}", e)))?;

        require_nonblank(&self.student_id, "studentId")?;
        require_nonblank(&self.topic, "topic")?;
        if let Some(ref tutor_id) = self.tutor_id {
            require_nonblank(tutor_id, "tutorId")?;
        }

        if self.duration_limit_minutes < MIN_SESSION_MINUTES
            || self.duration_limit_minutes > MAX_SESSION_MINUTES
        {
            return Err(Error::invalid_request(format!(
                "durationLimitMinutes must be between {} and {}",
                MIN_SESSION_MINUTES, MAX_SESSION_MINUTES
            )));
        }

        // Cross-field: the meeting type decides whether a start time is allowed.
        match self.meeting_type {
            MeetingType::Scheduled => {
                let Some(start) = self.scheduled_start_time else {
                    return Err(Error::invalid_request(
                        "scheduled sessions require scheduledStartTime",
                    ));
                };
                if start < now - Duration::seconds(SCHEDULE_PAST_GRACE_SECS) {
                    return Err(Error::invalid_request("scheduledStartTime is in the past"));
                }
            }
            MeetingType::OnDemand => {
                if self.scheduled_start_time.is_some() {
                    return Err(Error::invalid_request(
                        "on-demand sessions must not set scheduledStartTime",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Materializes the session record this request describes.
    pub fn to_session(&self, now: DateTime<Utc>) -> Session {
        Session {
            id: Uuid::new_v4(),
            student_id: self.student_id.clone(),
            tutor_id: self.tutor_id.clone(),
            topic: SubjectTag::new(self.topic.as_str()),
            status: self.initial_status(),
            meeting_type: self.meeting_type,
            scheduled_start_time: self.scheduled_start_time,
            actual_start_time: None,
            end_time: None,
            duration_limit_minutes: self.duration_limit_minutes,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }
}
