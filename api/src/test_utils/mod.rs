//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Why manual mocks instead of mockall?
//! - Keyset paging needs a real ordered store behind the port, not canned replies
//! - Manual mocks are more explicit and easier to debug

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
