//! Trellis Testing Infrastructure
//!
//! Shared setup for tests across the Trellis crates: deterministic effect
//! bundles, a fault-injecting store, seeding fixtures, graph assertions and
//! proptest strategies.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! Add this to your crate's `Cargo.toml` dev-dependencies:
//! ```toml
//! [dev-dependencies]
//! trellis-testkit = { workspace = true }
//! ```
//!
//! Then in your tests:
//! ```rust,ignore
//! use trellis_testkit::*;
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let effects = test_effects_deterministic(42, 1_000);
//!     let ada = seed_user(&effects, 1, "ada").await;
//!     // ... test logic
//! }
//! ```

pub mod assertions;
pub mod effects;
pub mod faults;
pub mod fixtures;
pub mod strategies;

pub use assertions::*;
pub use effects::*;
pub use faults::{FaultOp, FaultyStore};
pub use fixtures::*;
