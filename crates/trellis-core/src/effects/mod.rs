//! Core Effect Trait Definitions
//!
//! Pure trait definitions for every side effect the social engine performs.
//! This module defines **what** effects can be performed; handlers in
//! `trellis-effects` define **how**.
//!
//! # Effect Classification
//!
//! ## Storage Effects
//! - **Identity** (`IdentityStore`): user records
//! - **Documents** (`DocumentStore`): atomic set primitives on user/post
//!   documents, comment sequences and notifications
//!
//! ## Infrastructure Effects
//! - **Time** (`PhysicalTimeEffects`): server-assigned timestamps
//! - **Random** (`RandomEffects`): identifier generation
//!
//! ## Composite Effects
//! - `SocialEffects`: everything the engine needs, blanket-implemented
//!
//! All engine code is parameterized by these traits, so tests swap in
//! simulated clocks, seeded randomness and fault-injecting stores.

pub mod identity;
pub mod random;
pub mod storage;
pub mod supertraits;
pub mod time;

pub use identity::IdentityStore;
pub use random::RandomEffects;
pub use storage::{DocumentStore, SetToggle, StorageError, UserEdge};
pub use supertraits::SocialEffects;
pub use time::{PhysicalTimeEffects, TimeError};
