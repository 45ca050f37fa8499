//! Trellis CLI Library
//!
//! Scenario parsing and replay shared by the `trellis` binary and its tests.

#![allow(missing_docs)]

pub mod scenario;

pub use scenario::{run, Action, ActionOutcome, Report, Scenario};
