//! Core domain types, matching, and lifecycle rules for the TutorMatch coordinator.

pub mod booking;
pub mod error;
pub mod lifecycle;
pub mod limits;
pub mod matching;
pub mod session;
pub mod subject;
pub mod tutor;

pub use booking::*;
pub use error::{Error, Result};
pub use lifecycle::*;
pub use matching::*;
pub use session::*;
pub use subject::*;
pub use tutor::*;
