//! Test utilities
//!
//! Manual port implementations and test fixtures for unit testing.
//!
//! The blob store port is small enough that hand-written fakes are clearer
//! than generated mocks: tests seed files and read them back directly.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
