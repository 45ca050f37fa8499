//! User documents.

use crate::time::PhysicalTime;
use crate::types::identifiers::{PostId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A user document.
///
/// `following`, `followers` and `saved_posts` are only ever changed through
/// the store's atomic set primitives. The follow edge is kept symmetric:
/// `b ∈ a.followers ⟺ a ∈ b.following`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Document identifier
    pub id: UserId,
    /// Display handle
    pub username: String,
    /// Profile picture URL, empty when unset
    #[serde(default)]
    pub avatar: String,
    /// Free-form profile text
    #[serde(default)]
    pub bio: String,
    /// Users this user follows
    #[serde(default)]
    pub following: BTreeSet<UserId>,
    /// Users following this user
    #[serde(default)]
    pub followers: BTreeSet<UserId>,
    /// Posts this user has saved
    #[serde(default)]
    pub saved_posts: BTreeSet<PostId>,
    /// Posts authored by this user, in creation order
    #[serde(default)]
    pub posts: Vec<PostId>,
    /// Registration time
    pub created_at: PhysicalTime,
}

impl User {
    /// Create a user with empty relationship sets.
    pub fn new(id: UserId, username: impl Into<String>, created_at: PhysicalTime) -> Self {
        Self {
            id,
            username: username.into(),
            avatar: String::new(),
            bio: String::new(),
            following: BTreeSet::new(),
            followers: BTreeSet::new(),
            saved_posts: BTreeSet::new(),
            posts: Vec::new(),
            created_at,
        }
    }

    /// Set the avatar URL.
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }

    /// Set the bio.
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = bio.into();
        self
    }

    /// Whether this user follows `other`.
    pub fn is_following(&self, other: &UserId) -> bool {
        self.following.contains(other)
    }

    /// Whether `other` follows this user.
    pub fn is_followed_by(&self, other: &UserId) -> bool {
        self.followers.contains(other)
    }

    /// Whether this user has saved `post`.
    pub fn has_saved(&self, post: &PostId) -> bool {
        self.saved_posts.contains(post)
    }
}

/// Partial profile update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
    /// New username
    pub username: Option<String>,
    /// New bio
    pub bio: Option<String>,
    /// New avatar URL
    pub avatar: Option<String>,
}

impl ProfilePatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.bio.is_none() && self.avatar.is_none()
    }

    /// Apply the patch to a user in place.
    pub fn apply(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username.clone_from(username);
        }
        if let Some(bio) = &self.bio {
            user.bio.clone_from(bio);
        }
        if let Some(avatar) = &self.avatar {
            user.avatar.clone_from(avatar);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_only_touches_present_fields() {
        let id = UserId::new_from_entropy([1u8; 32]);
        let mut user = User::new(id, "ada", PhysicalTime::epoch()).with_bio("first");

        let patch = ProfilePatch {
            avatar: Some("https://img/ada.png".to_string()),
            ..ProfilePatch::default()
        };
        assert!(!patch.is_empty());
        patch.apply(&mut user);

        assert_eq!(user.username, "ada");
        assert_eq!(user.bio, "first");
        assert_eq!(user.avatar, "https://img/ada.png");
    }
}
