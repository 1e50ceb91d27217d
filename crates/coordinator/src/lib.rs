//! Coordination services: booking, claims, lifecycle, and matching.

pub mod booking;
pub mod claim;
pub mod lifecycle;
pub mod matchmaking;

pub use booking::*;
pub use claim::*;
pub use lifecycle::*;
pub use matchmaking::*;
