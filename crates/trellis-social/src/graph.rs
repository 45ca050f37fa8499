//! Graph Mutator - follow/unfollow edges
//!
//! A follow edge lives on two documents: `actor.following` and
//! `target.followers`. The direction is decided by the store's atomic toggle
//! on `actor.following`; the mirror write on `target.followers` then applies
//! the same direction with an idempotent set-add or set-remove.
//!
//! If the mirror write fails, the mutator makes one attempt to reverse the
//! first write and reports `SocialError::Consistency` either way.
//!
//! The two writes are not atomic together. Requests on the same ordered
//! edge are serialized by a striped lock shared by every clone of the
//! mutator, so a second toggle cannot interleave between another toggle's
//! decision and its mirror write.
//!
//! The lock is in-process and per mutator: a store must be written by one
//! `GraphMutator` (one `SocialEngine` and its clones). Independently
//! constructed engines over the same store can interleave on an edge; the
//! mirror write then finds the follower side already settled, which is
//! logged as drift.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use trellis_core::effects::{SetToggle, SocialEffects, UserEdge};
use trellis_core::UserId;

use crate::error::{SocialError, SocialResult};

/// Direction decided by a follow toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowDirection {
    /// The actor now follows the target
    Followed,
    /// The actor no longer follows the target
    Unfollowed,
}

impl From<SetToggle> for FollowDirection {
    fn from(toggle: SetToggle) -> Self {
        match toggle {
            SetToggle::Added => Self::Followed,
            SetToggle::Removed => Self::Unfollowed,
        }
    }
}

const EDGE_LOCK_STRIPES: usize = 64;

/// Striped locks keyed by `(actor, target)`.
#[derive(Debug)]
struct EdgeLocks {
    stripes: Vec<Mutex<()>>,
}

impl EdgeLocks {
    fn new(count: usize) -> Self {
        Self {
            stripes: (0..count.max(1)).map(|_| Mutex::new(())).collect(),
        }
    }

    fn stripe(&self, actor: UserId, target: UserId) -> &Mutex<()> {
        let mut hasher = DefaultHasher::new();
        (actor, target).hash(&mut hasher);
        let index = (hasher.finish() % self.stripes.len() as u64) as usize;
        &self.stripes[index]
    }
}

/// Follow-graph mutator.
///
/// Effects are passed per call; the only state is the edge lock table.
#[derive(Debug, Clone)]
pub struct GraphMutator {
    edges: Arc<EdgeLocks>,
}

impl Default for GraphMutator {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphMutator {
    /// Create a new graph mutator
    pub fn new() -> Self {
        Self {
            edges: Arc::new(EdgeLocks::new(EDGE_LOCK_STRIPES)),
        }
    }

    /// Flip the follow edge `actor -> target`.
    ///
    /// # Errors
    /// - `SelfReference` if `actor == target`, before any store access
    /// - `NotFound` if either user is missing
    /// - `Consistency` if the mirror write fails after the first write
    pub async fn toggle_follow<E>(
        &self,
        effects: &E,
        actor: UserId,
        target: UserId,
    ) -> SocialResult<FollowDirection>
    where
        E: SocialEffects + ?Sized,
    {
        if actor == target {
            return Err(SocialError::self_reference(actor));
        }
        if !effects.user_exists(target).await? {
            return Err(SocialError::not_found("user", target));
        }

        let _edge = self.edges.stripe(actor, target).lock().await;
        let toggle = effects
            .toggle_user_edge(actor, UserEdge::Following, target)
            .await?
            .ok_or_else(|| SocialError::not_found("user", actor))?;
        let direction = FollowDirection::from(toggle);
        debug!(%actor, %target, ?direction, "follow toggle decided");

        let mirror = match direction {
            FollowDirection::Followed => {
                effects
                    .insert_user_edge(target, UserEdge::Followers, actor)
                    .await
            }
            FollowDirection::Unfollowed => {
                effects
                    .remove_user_edge(target, UserEdge::Followers, actor)
                    .await
            }
        };

        match mirror {
            Ok(Some(applied)) => {
                if !applied {
                    warn!(
                        %actor,
                        %target,
                        ?direction,
                        "follower side already matched before mirror write"
                    );
                }
                info!(%actor, %target, ?direction, "follow edge updated");
                Ok(direction)
            }
            Ok(None) => {
                // Target vanished between the existence check and the mirror write
                let reason = format!("user {target} disappeared during follow update");
                Err(self.compensate(effects, actor, target, direction, reason).await)
            }
            Err(err) => {
                let reason = format!(
                    "failed to update {}.{}: {err}",
                    target,
                    UserEdge::Followers.as_str()
                );
                Err(self.compensate(effects, actor, target, direction, reason).await)
            }
        }
    }

    /// Reverse the `actor.following` write once and build the fatal error.
    async fn compensate<E>(
        &self,
        effects: &E,
        actor: UserId,
        target: UserId,
        direction: FollowDirection,
        reason: String,
    ) -> SocialError
    where
        E: SocialEffects + ?Sized,
    {
        let reversal = match direction {
            FollowDirection::Followed => {
                effects
                    .remove_user_edge(actor, UserEdge::Following, target)
                    .await
            }
            FollowDirection::Unfollowed => {
                effects
                    .insert_user_edge(actor, UserEdge::Following, target)
                    .await
            }
        };
        let compensated = matches!(reversal, Ok(Some(_)));

        error!(
            %actor,
            %target,
            ?direction,
            compensated,
            reason = %reason,
            "follow edge left inconsistent"
        );
        SocialError::consistency(reason, compensated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use trellis_core::{DocumentStore, IdentityStore, PhysicalTime, User};
    use trellis_effects::CompositeEffects;

    async fn seeded_pair() -> (
        CompositeEffects<
            trellis_effects::MemoryDocumentStore,
            trellis_effects::SimulatedTimeHandler,
            trellis_effects::SeededRandomHandler,
        >,
        UserId,
        UserId,
    ) {
        let effects = CompositeEffects::simulated(1, 0, 1);
        let a = UserId::new_from_entropy([1u8; 32]);
        let b = UserId::new_from_entropy([2u8; 32]);
        for (id, name) in [(a, "ada"), (b, "bob")] {
            effects
                .insert_user(User::new(id, name, PhysicalTime::epoch()))
                .await
                .unwrap();
        }
        (effects, a, b)
    }

    #[tokio::test]
    async fn test_toggle_alternates_and_stays_symmetric() {
        let (effects, a, b) = seeded_pair().await;
        let graph = GraphMutator::new();

        for expected in [
            FollowDirection::Followed,
            FollowDirection::Unfollowed,
            FollowDirection::Followed,
        ] {
            let direction = graph.toggle_follow(&effects, a, b).await.unwrap();
            assert_eq!(direction, expected);

            let ada = effects.get_user(a).await.unwrap().unwrap();
            let bob = effects.get_user(b).await.unwrap().unwrap();
            assert_eq!(ada.is_following(&b), bob.is_followed_by(&a));
        }
    }

    #[tokio::test]
    async fn test_drifted_follower_side_still_converges() {
        let (effects, a, b) = seeded_pair().await;
        // Follower side written without the following side
        effects
            .insert_user_edge(b, UserEdge::Followers, a)
            .await
            .unwrap();

        let graph = GraphMutator::new();
        let direction = graph.toggle_follow(&effects, a, b).await.unwrap();
        assert_eq!(direction, FollowDirection::Followed);

        let ada = effects.get_user(a).await.unwrap().unwrap();
        let bob = effects.get_user(b).await.unwrap().unwrap();
        assert!(ada.is_following(&b));
        assert!(bob.is_followed_by(&a));
        assert_eq!(bob.followers.len(), 1);
    }

    #[tokio::test]
    async fn test_self_follow_rejected() {
        let (effects, a, _) = seeded_pair().await;
        let result = GraphMutator::new().toggle_follow(&effects, a, a).await;
        assert_matches!(result, Err(SocialError::SelfReference { .. }));
    }

    #[tokio::test]
    async fn test_missing_users_are_not_found() {
        let (effects, a, _) = seeded_pair().await;
        let ghost = UserId::new_from_entropy([99u8; 32]);
        let graph = GraphMutator::new();

        assert_matches!(
            graph.toggle_follow(&effects, a, ghost).await,
            Err(SocialError::NotFound { entity: "user", .. })
        );
        assert_matches!(
            graph.toggle_follow(&effects, ghost, a).await,
            Err(SocialError::NotFound { entity: "user", .. })
        );
        let ada = effects.get_user(a).await.unwrap().unwrap();
        assert!(ada.followers.is_empty());
    }
}
