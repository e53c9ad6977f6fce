//! Integration tests for linetrace-nav
//!
//! These tests drive the full route controller against the mocks
//! from linetrace-io: a scripted sensor source, a recording actuator and a
//! manual clock, so no test waits on real time.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p linetrace-nav --test integration -- --nocapture
//! ```

mod harness;
mod properties;
mod scenarios;

pub use harness::{CENTERED, CLEAR, CROSS, TestHarness, single_route};
