//! Internal telemetry for the TutorMatch coordinator.
//!
//! Metrics stay in-process; the worker logs periodic snapshots instead of
//! pushing to an external metrics system.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
