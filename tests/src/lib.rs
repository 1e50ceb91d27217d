//! Shared helpers for the integration test suite.

pub mod mocks;
pub mod setup;
