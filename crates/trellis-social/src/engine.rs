//! Social Engine - one entry point per user-facing action
//!
//! Every mutating entry point runs the same pipeline: the mutator decides
//! and applies the change in one store call, the emitter records a
//! notification best-effort, and the affected aggregate is reloaded from the
//! store. A mutator error aborts the pipeline before any notification is
//! written.

use std::sync::Arc;

use tracing::{debug, info, warn};
use trellis_core::effects::SocialEffects;
use trellis_core::{
    Comment, CommentId, Notification, NotificationId, Post, PostId, ProfilePatch, User, UserId,
};

use crate::comments::CommentLedger;
use crate::config::SocialConfig;
use crate::engagement::{EngagementMutator, LikeDirection, SaveDirection};
use crate::error::{SocialError, SocialResult};
use crate::graph::{FollowDirection, GraphMutator};
use crate::notification::{NotificationEmitter, SocialEvent};
use crate::view::{
    load_post_view, load_user_aggregate, PostView, Toggled, UserAggregate, UserSummary,
};

/// Orchestrates mutators, the comment ledger and the notification emitter.
///
/// Holds no toggle state of its own; clones share the effects bundle.
pub struct SocialEngine<E: ?Sized> {
    effects: Arc<E>,
    config: SocialConfig,
    graph: GraphMutator,
    engagement: EngagementMutator,
    ledger: CommentLedger,
    emitter: NotificationEmitter,
}

impl<E: ?Sized> Clone for SocialEngine<E> {
    fn clone(&self) -> Self {
        Self {
            effects: Arc::clone(&self.effects),
            config: self.config.clone(),
            graph: self.graph.clone(),
            engagement: self.engagement,
            ledger: self.ledger,
            emitter: self.emitter,
        }
    }
}

impl<E: ?Sized> std::fmt::Debug for SocialEngine<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocialEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E> SocialEngine<E>
where
    E: SocialEffects + ?Sized,
{
    /// Create an engine over `effects`
    pub fn new(effects: Arc<E>, config: SocialConfig) -> Self {
        Self {
            effects,
            graph: GraphMutator::new(),
            engagement: EngagementMutator::new(),
            ledger: CommentLedger::new(config.max_comment_length),
            emitter: NotificationEmitter::new(config.emit_retraction_notices),
            config,
        }
    }

    /// The effects bundle
    pub fn effects(&self) -> &E {
        &self.effects
    }

    /// Active configuration
    pub fn config(&self) -> &SocialConfig {
        &self.config
    }

    /// Record a notification; failures are logged and dropped.
    async fn notify(&self, event: SocialEvent) {
        match self.emitter.emit(self.effects.as_ref(), &event).await {
            Ok(Some(_)) => {}
            Ok(None) => debug!(kind = %event.kind, "no notification for event"),
            Err(err) => warn!(
                kind = %event.kind,
                actor = %event.actor,
                recipient = %event.recipient,
                error = %err,
                "failed to record notification"
            ),
        }
    }

    // ---- accounts and posts -------------------------------------------

    /// Register a new user.
    pub async fn register_user(
        &self,
        username: &str,
        avatar: &str,
        bio: &str,
    ) -> SocialResult<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(SocialError::validation("Username cannot be empty"));
        }
        let id = UserId::from_uuid(self.effects.random_uuid().await);
        let user = User::new(id, username, self.effects.physical_time().await?)
            .with_avatar(avatar.trim())
            .with_bio(bio);

        self.effects.insert_user(user.clone()).await?;
        info!(user = %id, username, "user registered");
        Ok(user)
    }

    /// Update profile fields. Existing notifications keep the old snapshot.
    pub async fn edit_profile(&self, user: UserId, patch: ProfilePatch) -> SocialResult<User> {
        if patch
            .username
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(SocialError::validation("Username cannot be empty"));
        }
        let patch = ProfilePatch {
            username: patch.username.map(|name| name.trim().to_string()),
            ..patch
        };

        let updated = self
            .effects
            .update_profile(user, &patch)
            .await?
            .ok_or_else(|| SocialError::not_found("user", user))?;
        info!(%user, "profile updated");
        Ok(updated)
    }

    /// Publish a post and append it to the owner's post list.
    pub async fn create_post(&self, owner: UserId, caption: &str) -> SocialResult<Post> {
        if !self.effects.user_exists(owner).await? {
            return Err(SocialError::not_found("user", owner));
        }
        let id = PostId::from_uuid(self.effects.random_uuid().await);
        let post = Post::new(id, owner, caption, self.effects.physical_time().await?);

        self.effects.insert_post(post.clone()).await?;
        if !self.effects.push_user_post(owner, id).await? {
            // Owner vanished after the existence check; drop the orphan
            self.effects.remove_post(id).await?;
            return Err(SocialError::not_found("user", owner));
        }
        info!(post = %id, %owner, "post created");
        Ok(post)
    }

    /// Delete a post. Only the owner may do so.
    ///
    /// Removing the post document is the authoritative step; cleanup of the
    /// owner's post list and every user's saved set is best-effort.
    pub async fn delete_post(&self, post: PostId, requester: UserId) -> SocialResult<()> {
        let existing = self
            .effects
            .get_post(post)
            .await?
            .ok_or_else(|| SocialError::not_found("post", post))?;
        if existing.owner != requester {
            return Err(SocialError::unauthorized("only the owner can delete a post"));
        }

        if self.effects.remove_post(post).await?.is_none() {
            return Err(SocialError::not_found("post", post));
        }
        info!(%post, owner = %requester, "post deleted");

        if let Err(err) = self.effects.remove_user_post(existing.owner, post).await {
            warn!(%post, owner = %existing.owner, error = %err, "failed to detach post from owner");
        }
        match self.effects.users_with_saved_post(post).await {
            Ok(savers) => {
                for saver in savers {
                    if let Err(err) = self.effects.remove_saved_post(saver, post).await {
                        warn!(%post, user = %saver, error = %err, "failed to clear saved post");
                    }
                }
            }
            Err(err) => warn!(%post, error = %err, "failed to list savers of deleted post"),
        }
        Ok(())
    }

    // ---- graph and engagement -----------------------------------------

    /// Toggle the follow edge `actor -> target`.
    pub async fn follow(
        &self,
        actor: UserId,
        target: UserId,
    ) -> SocialResult<Toggled<FollowDirection, UserAggregate>> {
        let direction = self
            .graph
            .toggle_follow(self.effects.as_ref(), actor, target)
            .await?;
        self.notify(SocialEvent::follow(actor, target, direction))
            .await;

        let view = load_user_aggregate(self.effects.as_ref(), actor).await?;
        Ok(Toggled::new(direction, view))
    }

    /// Toggle `actor`'s like on `post`.
    pub async fn like(
        &self,
        post: PostId,
        actor: UserId,
    ) -> SocialResult<Toggled<LikeDirection, PostView>> {
        let direction = self
            .engagement
            .toggle_like(self.effects.as_ref(), post, actor)
            .await?;

        let view = load_post_view(self.effects.as_ref(), post).await?;
        self.notify(SocialEvent::like(actor, post, view.owner, direction))
            .await;
        Ok(Toggled::new(direction, view))
    }

    /// Toggle `post` in `actor`'s saved posts.
    pub async fn save(
        &self,
        post: PostId,
        actor: UserId,
    ) -> SocialResult<Toggled<SaveDirection, UserAggregate>> {
        let direction = self
            .engagement
            .toggle_save(self.effects.as_ref(), post, actor)
            .await?;

        match self.effects.get_post(post).await {
            Ok(Some(saved)) => {
                self.notify(SocialEvent::save(actor, post, saved.owner, direction))
                    .await
            }
            Ok(None) => debug!(%post, "post deleted before save notification"),
            Err(err) => warn!(%post, error = %err, "failed to load post for save notification"),
        }

        let view = load_user_aggregate(self.effects.as_ref(), actor).await?;
        Ok(Toggled::new(direction, view))
    }

    // ---- comments -----------------------------------------------------

    /// Add a comment to `post`.
    pub async fn comment(
        &self,
        post: PostId,
        author: UserId,
        text: &str,
    ) -> SocialResult<Comment> {
        let comment = self
            .ledger
            .add_comment(self.effects.as_ref(), post, author, text)
            .await?;

        match self.effects.get_post(post).await {
            Ok(Some(target)) => {
                self.notify(SocialEvent::comment(author, post, target.owner))
                    .await
            }
            Ok(None) => debug!(%post, "post deleted before comment notification"),
            Err(err) => warn!(%post, error = %err, "failed to load post for comment notification"),
        }
        Ok(comment)
    }

    /// Remove a comment. Only its author may do so.
    pub async fn uncomment(
        &self,
        post: PostId,
        comment: CommentId,
        requester: UserId,
    ) -> SocialResult<()> {
        self.ledger
            .remove_comment(self.effects.as_ref(), post, comment, requester)
            .await?;
        Ok(())
    }

    /// Comments on `post`, newest first.
    pub async fn comments(&self, post: PostId) -> SocialResult<Vec<Comment>> {
        self.ledger.comments(self.effects.as_ref(), post).await
    }

    // ---- notifications ------------------------------------------------

    /// Mark a notification read on behalf of `requester`.
    pub async fn mark_notification_read(
        &self,
        notification: NotificationId,
        requester: UserId,
    ) -> SocialResult<()> {
        self.emitter
            .mark_read(self.effects.as_ref(), notification, requester)
            .await
    }

    /// Notifications for `recipient`, newest first.
    pub async fn notifications(&self, recipient: UserId) -> SocialResult<Vec<Notification>> {
        self.emitter
            .notifications_for(self.effects.as_ref(), recipient)
            .await
    }

    /// Number of unread notifications for `recipient`.
    pub async fn unread_notifications(&self, recipient: UserId) -> SocialResult<usize> {
        self.emitter
            .unread_count(self.effects.as_ref(), recipient)
            .await
    }

    // ---- reads --------------------------------------------------------

    /// Profile aggregate for `user`.
    pub async fn profile(&self, user: UserId) -> SocialResult<UserAggregate> {
        load_user_aggregate(self.effects.as_ref(), user).await
    }

    /// View of a single post.
    pub async fn post_view(&self, post: PostId) -> SocialResult<PostView> {
        load_post_view(self.effects.as_ref(), post).await
    }

    /// Other users, in registration order, capped at `suggestion_limit`.
    pub async fn suggested_users(&self, actor: UserId) -> SocialResult<Vec<UserSummary>> {
        if !self.effects.user_exists(actor).await? {
            return Err(SocialError::not_found("user", actor));
        }
        let users = self.effects.list_users().await?;
        Ok(users
            .iter()
            .filter(|user| user.id != actor)
            .take(self.config.suggestion_limit)
            .map(UserSummary::from)
            .collect())
    }

    /// Users other than `actor` whose username contains `query`, ignoring
    /// case, in registration order and capped at `search_limit`.
    ///
    /// # Errors
    /// `Validation` if the query is blank; `NotFound` if `actor` is missing.
    pub async fn search_users(
        &self,
        actor: UserId,
        query: &str,
    ) -> SocialResult<Vec<UserSummary>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(SocialError::validation("search query must not be empty"));
        }
        if !self.effects.user_exists(actor).await? {
            return Err(SocialError::not_found("user", actor));
        }
        let users = self.effects.list_users().await?;
        let found: Vec<_> = users
            .iter()
            .filter(|user| user.id != actor)
            .filter(|user| user.username.to_lowercase().contains(&needle))
            .take(self.config.search_limit)
            .map(UserSummary::from)
            .collect();
        debug!(%actor, query = %needle, hits = found.len(), "user search");
        Ok(found)
    }
}
