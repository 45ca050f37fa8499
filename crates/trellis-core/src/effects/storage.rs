//! Document store interface.
//!
//! Every mutation here is a single atomic operation on one document. The
//! engine never reads a set and writes it back: membership decisions come
//! from `toggle_*` primitives that test and flip in the same call.
//!
//! Methods returning `Option` use `None` for "document does not exist".

use crate::domain::{Comment, Notification, Post};
use crate::types::identifiers::{CommentId, NotificationId, PostId, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors from the backing document store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Reading a document failed
    #[error("Read failed: {0}")]
    ReadFailed(String),
    /// Writing a document failed
    #[error("Write failed: {0}")]
    WriteFailed(String),
    /// Removing a document failed
    #[error("Delete failed: {0}")]
    DeleteFailed(String),
    /// A document with the same id already exists
    #[error("Duplicate document: {0}")]
    Duplicate(String),
    /// The store is not reachable
    #[error("Storage unavailable")]
    Unavailable,
}

/// Result of an atomic membership toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetToggle {
    /// The member was absent and has been inserted
    Added,
    /// The member was present and has been removed
    Removed,
}

/// Follow-graph set on a user document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserEdge {
    /// `user.following`
    Following,
    /// `user.followers`
    Followers,
}

impl UserEdge {
    /// Field name, for logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Following => "following",
            Self::Followers => "followers",
        }
    }
}

/// Persistent document store with per-document atomic set operations.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    // ---- follow graph -------------------------------------------------

    /// Atomically flip `member` in `user.<edge>`.
    async fn toggle_user_edge(
        &self,
        user: UserId,
        edge: UserEdge,
        member: UserId,
    ) -> Result<Option<SetToggle>, StorageError>;

    /// Set-add `member` to `user.<edge>`; `Some(false)` if already present.
    async fn insert_user_edge(
        &self,
        user: UserId,
        edge: UserEdge,
        member: UserId,
    ) -> Result<Option<bool>, StorageError>;

    /// Set-remove `member` from `user.<edge>`; `Some(false)` if absent.
    async fn remove_user_edge(
        &self,
        user: UserId,
        edge: UserEdge,
        member: UserId,
    ) -> Result<Option<bool>, StorageError>;

    // ---- saved posts --------------------------------------------------

    /// Atomically flip `post` in `user.saved_posts`.
    async fn toggle_saved_post(
        &self,
        user: UserId,
        post: PostId,
    ) -> Result<Option<SetToggle>, StorageError>;

    /// Set-remove `post` from `user.saved_posts`; `Some(false)` if absent.
    async fn remove_saved_post(
        &self,
        user: UserId,
        post: PostId,
    ) -> Result<Option<bool>, StorageError>;

    /// Users whose `saved_posts` contains `post`.
    async fn users_with_saved_post(&self, post: PostId) -> Result<Vec<UserId>, StorageError>;

    // ---- authored posts -----------------------------------------------

    /// Append `post` to `user.posts`; `false` if the user does not exist.
    async fn push_user_post(&self, user: UserId, post: PostId) -> Result<bool, StorageError>;

    /// Remove `post` from `user.posts`; `false` if nothing was removed.
    async fn remove_user_post(&self, user: UserId, post: PostId) -> Result<bool, StorageError>;

    // ---- posts --------------------------------------------------------

    /// Insert a new post document.
    ///
    /// Fails with `StorageError::Duplicate` if the id is taken.
    async fn insert_post(&self, post: Post) -> Result<(), StorageError>;

    /// Fetch a post document.
    async fn get_post(&self, id: PostId) -> Result<Option<Post>, StorageError>;

    /// Delete a post document, returning it if it existed.
    async fn remove_post(&self, id: PostId) -> Result<Option<Post>, StorageError>;

    /// Atomically flip `user` in `post.likes`.
    async fn toggle_like(
        &self,
        post: PostId,
        user: UserId,
    ) -> Result<Option<SetToggle>, StorageError>;

    /// Append a comment to the post's sequence; `false` if the post is gone.
    async fn append_comment(&self, post: PostId, comment: Comment) -> Result<bool, StorageError>;

    /// Remove a comment from the post's sequence, returning it if present.
    async fn remove_comment(
        &self,
        post: PostId,
        comment: CommentId,
    ) -> Result<Option<Comment>, StorageError>;

    // ---- notifications ------------------------------------------------

    /// Persist a new notification.
    async fn insert_notification(&self, notification: Notification) -> Result<(), StorageError>;

    /// Fetch a notification.
    async fn get_notification(
        &self,
        id: NotificationId,
    ) -> Result<Option<Notification>, StorageError>;

    /// Set `read = true`; `Some(true)` if the flag changed, `Some(false)` if
    /// it was already read.
    async fn mark_notification_read(
        &self,
        id: NotificationId,
    ) -> Result<Option<bool>, StorageError>;

    /// Every notification addressed to `recipient`, in insertion order.
    async fn notifications_for(
        &self,
        recipient: UserId,
    ) -> Result<Vec<Notification>, StorageError>;
}
