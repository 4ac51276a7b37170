//! uperf-harness - batch regression runner for the uperf benchmark
//!
//! Runs `uperf -m <profile>` for every profile matching a glob, with a fixed
//! set of benchmark parameters exported through the environment, and reports
//! which profiles passed.

pub mod common;
pub mod harness;

// Re-export commonly used types for tests
pub use common::{Config, Error, Result};
pub use harness::{run, RunReport, TestCase};
