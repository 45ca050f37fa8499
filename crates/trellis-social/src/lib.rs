//! Trellis Social - Engagement & Social-Graph Consistency
//!
//! This crate implements the operations that mutate shared relationship
//! state and the notifications they produce:
//!
//! - `GraphMutator`: follow/unfollow across two user documents, with one
//!   compensating attempt and a fatal `Consistency` error on partial failure
//! - `EngagementMutator`: like/unlike and save/unsave toggles
//! - `CommentLedger`: append/remove comments, newest-first reads
//! - `NotificationEmitter`: one notification per non-self transition
//! - `SocialEngine`: one entry point per user-facing action
//!
//! # Toggle Semantics
//!
//! No API accepts a client-supplied "like"/"unlike" flag. Every direction is
//! decided by the store's atomic toggle on the current membership, so two
//! identical requests alternate and concurrent requests never double-apply.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use trellis_effects::CompositeEffects;
//! use trellis_social::{SocialConfig, SocialEngine};
//!
//! let engine = SocialEngine::new(Arc::new(CompositeEffects::production()), SocialConfig::default());
//! let ada = engine.register_user("ada", "", "").await?;
//! let bob = engine.register_user("bob", "", "").await?;
//!
//! let followed = engine.follow(ada.id, bob.id).await?;
//! assert_eq!(followed.direction, FollowDirection::Followed);
//! ```

#![forbid(unsafe_code)]

pub mod comments;
pub mod config;
pub mod engagement;
pub mod engine;
pub mod error;
pub mod graph;
pub mod notification;
pub mod view;

pub use comments::CommentLedger;
pub use config::SocialConfig;
pub use engagement::{EngagementMutator, LikeDirection, SaveDirection};
pub use engine::SocialEngine;
pub use error::{SocialError, SocialResult};
pub use graph::{FollowDirection, GraphMutator};
pub use notification::{render_message, NotificationEmitter, SocialEvent};
pub use view::{PostView, Toggled, UserAggregate, UserSummary};
