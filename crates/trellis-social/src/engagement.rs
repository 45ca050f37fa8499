//! Engagement Mutator - likes and saves
//!
//! Likes live on the post (`post.likes`); saves live on the user
//! (`user.saved_posts`). Both are single-document toggles, so the store's
//! atomic toggle decides the direction and applies it in one call.

use serde::{Deserialize, Serialize};
use tracing::info;
use trellis_core::effects::{SetToggle, SocialEffects};
use trellis_core::{PostId, UserId};

use crate::error::{SocialError, SocialResult};

/// Direction decided by a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeDirection {
    /// The user now likes the post
    Liked,
    /// The user no longer likes the post
    Unliked,
}

impl From<SetToggle> for LikeDirection {
    fn from(toggle: SetToggle) -> Self {
        match toggle {
            SetToggle::Added => Self::Liked,
            SetToggle::Removed => Self::Unliked,
        }
    }
}

/// Direction decided by a save toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveDirection {
    /// The post is now in the user's saved set
    Saved,
    /// The post was removed from the user's saved set
    Unsaved,
}

impl From<SetToggle> for SaveDirection {
    fn from(toggle: SetToggle) -> Self {
        match toggle {
            SetToggle::Added => Self::Saved,
            SetToggle::Removed => Self::Unsaved,
        }
    }
}

/// Like/save mutator.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngagementMutator;

impl EngagementMutator {
    /// Create a new engagement mutator
    pub fn new() -> Self {
        Self
    }

    /// Flip `user` in `post.likes`.
    pub async fn toggle_like<E>(
        &self,
        effects: &E,
        post: PostId,
        user: UserId,
    ) -> SocialResult<LikeDirection>
    where
        E: SocialEffects + ?Sized,
    {
        if !effects.user_exists(user).await? {
            return Err(SocialError::not_found("user", user));
        }
        let direction: LikeDirection = effects
            .toggle_like(post, user)
            .await?
            .ok_or_else(|| SocialError::not_found("post", post))?
            .into();

        info!(%post, %user, ?direction, "like toggled");
        Ok(direction)
    }

    /// Flip `post` in `user.saved_posts`.
    ///
    /// The post must exist at call time; the saved set holds references
    /// only and is cleaned up best-effort when the post is deleted.
    pub async fn toggle_save<E>(
        &self,
        effects: &E,
        post: PostId,
        user: UserId,
    ) -> SocialResult<SaveDirection>
    where
        E: SocialEffects + ?Sized,
    {
        if effects.get_post(post).await?.is_none() {
            return Err(SocialError::not_found("post", post));
        }
        let direction: SaveDirection = effects
            .toggle_saved_post(user, post)
            .await?
            .ok_or_else(|| SocialError::not_found("user", user))?
            .into();

        info!(%post, %user, ?direction, "save toggled");
        Ok(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use trellis_core::{DocumentStore, IdentityStore, PhysicalTime, Post, User};
    use trellis_effects::CompositeEffects;

    #[tokio::test]
    async fn test_like_and_save_alternate() {
        let effects = CompositeEffects::simulated(3, 0, 1);
        let owner = UserId::new_from_entropy([1u8; 32]);
        let fan = UserId::new_from_entropy([2u8; 32]);
        let post = PostId::new_from_entropy([3u8; 32]);
        effects
            .insert_user(User::new(owner, "owner", PhysicalTime::epoch()))
            .await
            .unwrap();
        effects
            .insert_user(User::new(fan, "fan", PhysicalTime::epoch()))
            .await
            .unwrap();
        effects
            .insert_post(Post::new(post, owner, "sunset", PhysicalTime::epoch()))
            .await
            .unwrap();

        let engagement = EngagementMutator::new();
        assert_eq!(
            engagement.toggle_like(&effects, post, fan).await,
            Ok(LikeDirection::Liked)
        );
        assert_eq!(
            engagement.toggle_like(&effects, post, fan).await,
            Ok(LikeDirection::Unliked)
        );
        assert_eq!(
            engagement.toggle_save(&effects, post, fan).await,
            Ok(SaveDirection::Saved)
        );
        assert!(effects.get_user(fan).await.unwrap().unwrap().has_saved(&post));
    }

    #[tokio::test]
    async fn test_missing_post_is_not_found() {
        let effects = CompositeEffects::simulated(3, 0, 1);
        let fan = UserId::new_from_entropy([2u8; 32]);
        effects
            .insert_user(User::new(fan, "fan", PhysicalTime::epoch()))
            .await
            .unwrap();
        let ghost = PostId::new_from_entropy([42u8; 32]);

        let engagement = EngagementMutator::new();
        assert_matches!(
            engagement.toggle_like(&effects, ghost, fan).await,
            Err(SocialError::NotFound { entity: "post", .. })
        );
        assert_matches!(
            engagement.toggle_save(&effects, ghost, fan).await,
            Err(SocialError::NotFound { entity: "post", .. })
        );
    }
}
