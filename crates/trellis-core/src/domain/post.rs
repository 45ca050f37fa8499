//! Post documents and their embedded comments.

use crate::time::PhysicalTime;
use crate::types::identifiers::{CommentId, PostId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A comment embedded in a post's comment sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment identifier
    pub id: CommentId,
    /// Post the comment belongs to
    pub post: PostId,
    /// Author; the only user allowed to remove the comment
    pub author: UserId,
    /// Trimmed, non-empty text
    pub text: String,
    /// Server-assigned creation time
    pub created_at: PhysicalTime,
}

/// A post document.
///
/// `comments` is kept in insertion order; read ordering is applied by the
/// comment ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Document identifier
    pub id: PostId,
    /// Author of the post; the only user allowed to delete it
    pub owner: UserId,
    /// Caption text
    #[serde(default)]
    pub caption: String,
    /// Users who like the post
    #[serde(default)]
    pub likes: BTreeSet<UserId>,
    /// Comments in insertion order
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Creation time
    pub created_at: PhysicalTime,
}

impl Post {
    /// Create a post with no likes or comments.
    pub fn new(
        id: PostId,
        owner: UserId,
        caption: impl Into<String>,
        created_at: PhysicalTime,
    ) -> Self {
        Self {
            id,
            owner,
            caption: caption.into(),
            likes: BTreeSet::new(),
            comments: Vec::new(),
            created_at,
        }
    }

    /// Number of distinct users liking the post.
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    /// Whether `user` likes the post.
    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.contains(user)
    }

    /// Look up a comment by id.
    pub fn comment(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == *id)
    }
}
