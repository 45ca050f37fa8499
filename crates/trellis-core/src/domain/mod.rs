//! Domain records persisted by the document store.
//!
//! `User` and `Post` are authoritative for graph and engagement sets.
//! `Notification` is a derived, denormalized side-effect record.

mod notification;
mod post;
mod user;

pub use notification::{ActorSnapshot, Notification, NotificationKind};
pub use post::{Comment, Post};
pub use user::{ProfilePatch, User};
