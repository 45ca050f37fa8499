//! Trellis Core - Records and Effect Interfaces
//!
//! This crate provides the foundational types shared by every Trellis crate.
//! It contains no storage or clock implementations, only the shapes of the
//! data and the effect traits that handlers implement.
//!
//! # Contents
//!
//! - Identifiers: `UserId`, `PostId`, `CommentId`, `NotificationId`
//! - Records: `User`, `Post`, `Comment`, `Notification`
//! - Effect interfaces: `IdentityStore`, `DocumentStore`,
//!   `PhysicalTimeEffects`, `RandomEffects` and the `SocialEffects` supertrait
//! - Configuration traits and validation helpers
//!
//! # Storage Model
//!
//! `User` and `Post` documents are the source of truth for graph and
//! engagement sets. Every mutation on them is exposed as a single atomic
//! per-document primitive (`toggle`, `insert`, `remove`), so callers never
//! read a set and write it back.

#![forbid(unsafe_code)]

/// Configuration traits and validation
pub mod config;

/// Domain records persisted by the document store
pub mod domain;

/// Pure effect interfaces (no implementations)
pub mod effects;

/// Unified error handling
pub mod errors;

/// Wall-clock time values
pub mod time;

/// Identifier newtypes
pub mod types;

pub use config::{ConfigValidationError, ConfigValidator, TrellisConfig};
pub use domain::{
    ActorSnapshot, Comment, Notification, NotificationKind, Post, ProfilePatch, User,
};
pub use effects::{
    DocumentStore, IdentityStore, PhysicalTimeEffects, RandomEffects, SetToggle, SocialEffects,
    StorageError, TimeError, UserEdge,
};
pub use errors::TrellisError;
pub use time::PhysicalTime;
pub use types::identifiers::{CommentId, NotificationId, PostId, UserId};
