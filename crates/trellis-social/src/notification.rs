//! Notification Emitter
//!
//! Builds and persists exactly one notification per transition event. The
//! emitter never decides whether a transition happened; callers hand it the
//! event after the mutation succeeded.
//!
//! Rules:
//! - no notification when the actor is the recipient
//! - retraction kinds (unfollow, unlike, unsave) are emitted unless disabled
//!   through `SocialConfig::emit_retraction_notices`
//! - the actor's username and avatar are copied into the record at emission
//!   time

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use trellis_core::effects::SocialEffects;
use trellis_core::{
    ActorSnapshot, Notification, NotificationId, NotificationKind, PostId, User, UserId,
};

use crate::engagement::{LikeDirection, SaveDirection};
use crate::error::{SocialError, SocialResult};
use crate::graph::FollowDirection;

/// A state transition that may produce a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialEvent {
    /// Transition kind
    pub kind: NotificationKind,
    /// User who caused the transition
    pub actor: UserId,
    /// User to notify
    pub recipient: UserId,
    /// Post involved, if any
    pub target_post: Option<PostId>,
    /// User involved, if any
    pub target_user: Option<UserId>,
}

impl SocialEvent {
    /// Follow-graph transition from `actor` to `target`.
    ///
    /// `target_user` links back to the actor, whose profile the recipient
    /// will want to open.
    pub fn follow(actor: UserId, target: UserId, direction: FollowDirection) -> Self {
        let kind = match direction {
            FollowDirection::Followed => NotificationKind::Follow,
            FollowDirection::Unfollowed => NotificationKind::Unfollow,
        };
        Self {
            kind,
            actor,
            recipient: target,
            target_post: None,
            target_user: Some(actor),
        }
    }

    /// Like transition on `post`, owned by `owner`.
    pub fn like(actor: UserId, post: PostId, owner: UserId, direction: LikeDirection) -> Self {
        let kind = match direction {
            LikeDirection::Liked => NotificationKind::Like,
            LikeDirection::Unliked => NotificationKind::Unlike,
        };
        Self::on_post(kind, actor, post, owner)
    }

    /// Save transition on `post`, owned by `owner`.
    pub fn save(actor: UserId, post: PostId, owner: UserId, direction: SaveDirection) -> Self {
        let kind = match direction {
            SaveDirection::Saved => NotificationKind::Save,
            SaveDirection::Unsaved => NotificationKind::Unsave,
        };
        Self::on_post(kind, actor, post, owner)
    }

    /// New comment on `post`, owned by `owner`.
    pub fn comment(actor: UserId, post: PostId, owner: UserId) -> Self {
        Self::on_post(NotificationKind::Comment, actor, post, owner)
    }

    fn on_post(kind: NotificationKind, actor: UserId, post: PostId, owner: UserId) -> Self {
        Self {
            kind,
            actor,
            recipient: owner,
            target_post: Some(post),
            target_user: None,
        }
    }

    /// Whether the actor would be notifying themselves.
    pub fn is_self_directed(&self) -> bool {
        self.actor == self.recipient
    }
}

/// Human-readable notification text.
pub fn render_message(kind: NotificationKind, username: &str) -> String {
    match kind {
        NotificationKind::Follow => format!("{username} started following you"),
        NotificationKind::Unfollow => format!("{username} unfollowed you"),
        NotificationKind::Like => format!("{username} liked your post"),
        NotificationKind::Unlike => format!("{username} unliked your post"),
        NotificationKind::Save => format!("{username} saved your post"),
        NotificationKind::Unsave => format!("{username} removed your post from their saved posts"),
        NotificationKind::Comment => format!("{username} commented on your post"),
    }
}

/// Newest first; ties put the later insertion first.
fn newest_first(mut notifications: Vec<Notification>) -> Vec<Notification> {
    notifications.reverse();
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    notifications
}

/// Notification persistence and read-state management.
#[derive(Debug, Clone, Copy)]
pub struct NotificationEmitter {
    emit_retractions: bool,
}

impl NotificationEmitter {
    /// Create an emitter; `emit_retractions` gates unfollow/unlike/unsave.
    pub fn new(emit_retractions: bool) -> Self {
        Self { emit_retractions }
    }

    /// Whether `event` produces a notification under the current rules.
    pub fn should_emit(&self, event: &SocialEvent) -> bool {
        if event.is_self_directed() {
            return false;
        }
        self.emit_retractions || !event.kind.is_retraction()
    }

    /// Build and persist the notification for `event`.
    ///
    /// Returns `Ok(None)` when the rules suppress it.
    pub async fn emit<E>(
        &self,
        effects: &E,
        event: &SocialEvent,
    ) -> SocialResult<Option<Notification>>
    where
        E: SocialEffects + ?Sized,
    {
        if !self.should_emit(event) {
            debug!(kind = %event.kind, actor = %event.actor, "notification suppressed");
            return Ok(None);
        }

        let actor: User = effects
            .get_user(event.actor)
            .await?
            .ok_or_else(|| SocialError::not_found("user", event.actor))?;

        let notification = Notification {
            id: NotificationId::from_uuid(effects.random_uuid().await),
            kind: event.kind,
            message: render_message(event.kind, &actor.username),
            actor: ActorSnapshot {
                id: actor.id,
                username: actor.username,
                avatar: actor.avatar,
            },
            recipient: event.recipient,
            read: false,
            target_post: event.target_post,
            target_user: event.target_user,
            created_at: effects.physical_time().await?,
        };

        effects.insert_notification(notification.clone()).await?;
        info!(
            notification = %notification.id,
            kind = %notification.kind,
            recipient = %notification.recipient,
            "notification emitted"
        );
        Ok(Some(notification))
    }

    /// Mark a notification read. Only the recipient may do so; repeat calls
    /// are no-ops.
    pub async fn mark_read<E>(
        &self,
        effects: &E,
        id: NotificationId,
        requester: UserId,
    ) -> SocialResult<()>
    where
        E: SocialEffects + ?Sized,
    {
        let notification = effects
            .get_notification(id)
            .await?
            .ok_or_else(|| SocialError::not_found("notification", id))?;
        if notification.recipient != requester {
            return Err(SocialError::unauthorized(
                "only the recipient can mark a notification as read",
            ));
        }
        if notification.read {
            return Ok(());
        }

        effects
            .mark_notification_read(id)
            .await?
            .ok_or_else(|| SocialError::not_found("notification", id))?;
        debug!(notification = %id, %requester, "notification marked read");
        Ok(())
    }

    /// Notifications addressed to `recipient`, newest first.
    pub async fn notifications_for<E>(
        &self,
        effects: &E,
        recipient: UserId,
    ) -> SocialResult<Vec<Notification>>
    where
        E: SocialEffects + ?Sized,
    {
        Ok(newest_first(effects.notifications_for(recipient).await?))
    }

    /// Number of unread notifications for `recipient`.
    pub async fn unread_count<E>(&self, effects: &E, recipient: UserId) -> SocialResult<usize>
    where
        E: SocialEffects + ?Sized,
    {
        let all = effects.notifications_for(recipient).await?;
        Ok(all.iter().filter(|n| !n.read).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (UserId, UserId, PostId) {
        (
            UserId::new_from_entropy([1u8; 32]),
            UserId::new_from_entropy([2u8; 32]),
            PostId::new_from_entropy([3u8; 32]),
        )
    }

    #[test]
    fn test_self_directed_events_never_emit() {
        let (a, _, post) = ids();
        let emitter = NotificationEmitter::new(true);

        for event in [
            SocialEvent::like(a, post, a, LikeDirection::Liked),
            SocialEvent::save(a, post, a, SaveDirection::Saved),
            SocialEvent::comment(a, post, a),
        ] {
            assert!(!emitter.should_emit(&event));
        }
    }

    #[test]
    fn test_retractions_follow_config() {
        let (a, b, post) = ids();
        let unfollow = SocialEvent::follow(a, b, FollowDirection::Unfollowed);
        let unlike = SocialEvent::like(a, post, b, LikeDirection::Unliked);
        let follow = SocialEvent::follow(a, b, FollowDirection::Followed);

        let on = NotificationEmitter::new(true);
        assert!(on.should_emit(&unfollow));
        assert!(on.should_emit(&unlike));

        let off = NotificationEmitter::new(false);
        assert!(!off.should_emit(&unfollow));
        assert!(!off.should_emit(&unlike));
        assert!(off.should_emit(&follow));
    }

    #[test]
    fn test_event_targets() {
        let (a, b, post) = ids();
        let follow = SocialEvent::follow(a, b, FollowDirection::Followed);
        assert_eq!(follow.recipient, b);
        assert_eq!(follow.target_user, Some(a));

        let unfollow = SocialEvent::follow(a, b, FollowDirection::Unfollowed);
        assert_eq!(unfollow.kind, NotificationKind::Unfollow);
        assert_eq!(unfollow.target_user, Some(a));
        assert_eq!(follow.target_post, None);

        let comment = SocialEvent::comment(a, post, b);
        assert_eq!(comment.kind, NotificationKind::Comment);
        assert_eq!(comment.target_post, Some(post));
    }

    #[test]
    fn test_messages_name_the_actor() {
        assert_eq!(
            render_message(NotificationKind::Unfollow, "ada"),
            "ada unfollowed you"
        );
        assert_eq!(
            render_message(NotificationKind::Like, "ada"),
            "ada liked your post"
        );
    }
}
