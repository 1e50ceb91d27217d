//! Field and policy limits for booking and matching.
//!
//! # Usage Note
//!
//! Constants used at runtime: `SCHEDULE_PAST_GRACE_SECS`, `MIN_SESSION_MINUTES`,
//! `MAX_SESSION_MINUTES`, `MAX_SUBJECTS_PER_TUTOR`.
//!
//! The `#[validate]` derive macro requires literal values in attributes,
//! so string-length limits are duplicated there. Keep both in sync when modifying.

// === Identifier Limits (chars) ===

/// Student and tutor id max length.
/// UUIDs=36, emails=~50, custom IDs up to 128.
pub const MAX_PARTY_ID_LEN: usize = 128;

/// Subject tag max length.
/// Catalog names like "JEE Mains – Maths" are ~20 chars; free text stays short.
pub const MAX_TOPIC_LEN: usize = 200;

/// Tutor display name max length.
pub const MAX_TUTOR_NAME_LEN: usize = 200;

// === Booking Bounds ===

/// Shortest bookable session in minutes.
pub const MIN_SESSION_MINUTES: u32 = 1;

/// Longest bookable session in minutes (8 hours).
pub const MAX_SESSION_MINUTES: u32 = 480;

/// Allowed clock skew for scheduled start times (seconds).
///
/// A slot a few seconds in the past is a clock difference, not a booking error.
pub const SCHEDULE_PAST_GRACE_SECS: i64 = 60;

// === Directory Bounds ===

/// Maximum subjects a single tutor profile may advertise.
pub const MAX_SUBJECTS_PER_TUTOR: usize = 32;

/// Maximum tags in a single match group.
pub const MAX_GROUP_TAGS: usize = 64;
