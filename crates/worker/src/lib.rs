//! Background workers for the session coordinator.
//!
//! Handles the externally-timed side of the lifecycle:
//! - Expiry sweeper (search, approval, and payment timeouts)
//! - Periodic metrics snapshot logging

pub mod scheduler;
pub mod sweeper;

pub use scheduler::*;
pub use sweeper::{ExpirySweeper, SweepReport, SweepTimeouts};
