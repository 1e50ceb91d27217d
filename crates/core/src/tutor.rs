//! Tutor directory types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Error, Result};
use crate::limits::MAX_SUBJECTS_PER_TUTOR;
use crate::subject::SubjectTag;

/// A tutor profile as published to the matching directory.
///
/// Profiles are owned by the identity system; the coordinator reads them
/// and never edits them during a session.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TutorProfile {
    /// Stable tutor id
    #[validate(length(min = 1, max = 128))]
    pub id: String,
    /// Display name
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Subjects this tutor teaches
    pub subjects: Vec<SubjectTag>,
    /// Advertised rate per hour, informational only
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub hourly_rate: f64,
    /// Whether the tutor currently accepts sessions
    pub active: bool,
}

impl TutorProfile {
    /// Creates an active profile with no advertised rate.
    pub fn new(id: impl Into<String>, name: impl Into<String>, subjects: Vec<SubjectTag>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subjects,
            hourly_rate: 0.0,
            active: true,
        }
    }

    /// Full shape check, including bounds the derive macro cannot express.
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| Error::invalid_request(format!("{}", e)))?;

        if self.subjects.is_empty() {
            return Err(Error::invalid_request(
                "tutor must advertise at least one subject",
            ));
        }
        if self.subjects.len() > MAX_SUBJECTS_PER_TUTOR {
            return Err(Error::invalid_request(format!(
                "tutor advertises {} subjects, max is {}",
                self.subjects.len(),
                MAX_SUBJECTS_PER_TUTOR
            )));
        }
        Ok(())
    }

    /// True when the profile should be considered by matching.
    pub fn is_matchable(&self) -> bool {
        self.active && !self.subjects.is_empty()
    }
}
