//! Session and tutor persistence for the TutorMatch coordinator.

pub mod config;
pub mod memory;
pub mod store;

pub use config::*;
pub use memory::*;
pub use store::*;
