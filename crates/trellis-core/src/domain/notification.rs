//! Notification records.
//!
//! A notification copies the actor's identity at emission time. Later
//! profile edits do not rewrite history, and the record never owns or
//! resolves the user/post it points at.

use crate::time::PhysicalTime;
use crate::types::identifiers::{NotificationId, PostId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The state transition a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Actor started following the recipient
    Follow,
    /// Actor stopped following the recipient
    Unfollow,
    /// Actor liked the recipient's post
    Like,
    /// Actor removed a like from the recipient's post
    Unlike,
    /// Actor saved the recipient's post
    Save,
    /// Actor removed the recipient's post from their saves
    Unsave,
    /// Actor commented on the recipient's post
    Comment,
}

impl NotificationKind {
    /// All kinds, in declaration order.
    pub const ALL: [NotificationKind; 7] = [
        Self::Follow,
        Self::Unfollow,
        Self::Like,
        Self::Unlike,
        Self::Save,
        Self::Unsave,
        Self::Comment,
    ];

    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Unfollow => "unfollow",
            Self::Like => "like",
            Self::Unlike => "unlike",
            Self::Save => "save",
            Self::Unsave => "unsave",
            Self::Comment => "comment",
        }
    }

    /// Whether this kind reports the negative half of a toggle pair.
    pub fn is_retraction(&self) -> bool {
        matches!(self, Self::Unfollow | Self::Unlike | Self::Unsave)
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Copy of the actor's public identity taken when the notification is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    /// Actor id (plain lookup field)
    pub id: UserId,
    /// Username at emission time
    pub username: String,
    /// Avatar URL at emission time
    pub avatar: String,
}

/// A persisted notification.
///
/// Immutable except for `read`, which only moves from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification identifier
    pub id: NotificationId,
    /// Transition being reported
    pub kind: NotificationKind,
    /// Denormalized actor identity
    pub actor: ActorSnapshot,
    /// User receiving the notification
    pub recipient: UserId,
    /// Human-readable text
    pub message: String,
    /// Whether the recipient has read it
    pub read: bool,
    /// Post involved in the transition, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_post: Option<PostId>,
    /// User involved in the transition, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_user: Option<UserId>,
    /// Emission time
    pub created_at: PhysicalTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names_match_serde() {
        for kind in NotificationKind::ALL {
            let json = serde_json::to_string(&kind).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_retraction_kinds() {
        let retractions: Vec<_> = NotificationKind::ALL
            .into_iter()
            .filter(NotificationKind::is_retraction)
            .collect();
        assert_eq!(
            retractions,
            vec![
                NotificationKind::Unfollow,
                NotificationKind::Unlike,
                NotificationKind::Unsave
            ]
        );
    }
}
