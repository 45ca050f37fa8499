//! Core identifier types used across Trellis
//!
//! Each identifier is a UUID newtype. Handlers mint fresh values through
//! `RandomEffects`; tests derive them deterministically with
//! `new_from_entropy`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

fn uuid_from_entropy(entropy: [u8; 32]) -> Uuid {
    let mut uuid_bytes = [0u8; 16];
    uuid_bytes.copy_from_slice(&entropy[..16]);
    Uuid::from_bytes(uuid_bytes)
}

/// User identifier
///
/// Identifies a user document. Follow edges and saved-post sets are keyed by
/// this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Create a user ID from 32 bytes of caller-provided entropy.
    pub fn new_from_entropy(entropy: [u8; 32]) -> Self {
        Self(uuid_from_entropy(entropy))
    }

    /// Create from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user-{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("user-").unwrap_or(s);
        Ok(Self(Uuid::parse_str(raw)?))
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Post identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostId(pub Uuid);

impl PostId {
    /// Create a post ID from 32 bytes of caller-provided entropy.
    pub fn new_from_entropy(entropy: [u8; 32]) -> Self {
        Self(uuid_from_entropy(entropy))
    }

    /// Create from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "post-{}", self.0)
    }
}

impl FromStr for PostId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("post-").unwrap_or(s);
        Ok(Self(Uuid::parse_str(raw)?))
    }
}

impl From<Uuid> for PostId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Comment identifier, unique within the whole store (not just one post)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommentId(pub Uuid);

impl CommentId {
    /// Create a comment ID from 32 bytes of caller-provided entropy.
    pub fn new_from_entropy(entropy: [u8; 32]) -> Self {
        Self(uuid_from_entropy(entropy))
    }

    /// Create from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "comment-{}", self.0)
    }
}

impl From<Uuid> for CommentId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Notification identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(pub Uuid);

impl NotificationId {
    /// Create a notification ID from 32 bytes of caller-provided entropy.
    pub fn new_from_entropy(entropy: [u8; 32]) -> Self {
        Self(uuid_from_entropy(entropy))
    }

    /// Create from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "notification-{}", self.0)
    }
}

impl From<Uuid> for NotificationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_ids_are_deterministic() {
        assert_eq!(
            UserId::new_from_entropy([7u8; 32]),
            UserId::new_from_entropy([7u8; 32])
        );
        assert_ne!(
            UserId::new_from_entropy([7u8; 32]),
            UserId::new_from_entropy([8u8; 32])
        );
    }

    #[test]
    fn test_user_id_parses_with_or_without_prefix() {
        let id = UserId::new_from_entropy([3u8; 32]);
        assert_eq!(id.to_string().parse::<UserId>().ok(), Some(id));
        assert_eq!(id.uuid().to_string().parse::<UserId>().ok(), Some(id));
        assert!("user-not-a-uuid".parse::<UserId>().is_err());
    }
}
