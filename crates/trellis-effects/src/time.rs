//! Time Effect Handlers
//!
//! `real` reads the system clock; `simulated` is driven by tests.

pub mod real;
pub mod simulated;
