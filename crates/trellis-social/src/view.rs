//! Read-side views returned by the engine
//!
//! Views are rebuilt from the store after every mutation. References to
//! users or posts that no longer exist are skipped.

use serde::{Deserialize, Serialize};
use trellis_core::effects::SocialEffects;
use trellis_core::{Comment, PhysicalTime, Post, PostId, User, UserId};

use crate::comments::newest_first;
use crate::error::{SocialError, SocialResult};

/// Public identity of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User id
    pub id: UserId,
    /// Current username
    pub username: String,
    /// Current avatar URL
    pub avatar: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// A post with derived counts and ordered comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    /// Post id
    pub id: PostId,
    /// Post author
    pub owner: UserId,
    /// Caption text
    pub caption: String,
    /// Number of distinct likers
    pub like_count: usize,
    /// Users who like the post
    pub likes: Vec<UserId>,
    /// Comments, newest first
    pub comments: Vec<Comment>,
    /// Creation time
    pub created_at: PhysicalTime,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            owner: post.owner,
            caption: post.caption,
            like_count: post.likes.len(),
            likes: post.likes.into_iter().collect(),
            comments: newest_first(post.comments),
            created_at: post.created_at,
        }
    }
}

/// A user with the follow graph and post lists resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAggregate {
    /// User id
    pub id: UserId,
    /// Current username
    pub username: String,
    /// Current avatar URL
    pub avatar: String,
    /// Profile text
    pub bio: String,
    /// Users this user follows
    pub following: Vec<UserSummary>,
    /// Users following this user
    pub followers: Vec<UserSummary>,
    /// Authored posts, newest first
    pub posts: Vec<PostView>,
    /// Saved posts, newest first
    pub saved_posts: Vec<PostView>,
    /// Registration time
    pub created_at: PhysicalTime,
}

/// A toggle result: the decided direction plus the reloaded view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toggled<D, V> {
    /// Direction decided by the store
    pub direction: D,
    /// View reloaded after the mutation
    pub view: V,
}

impl<D, V> Toggled<D, V> {
    /// Pair a direction with its view
    pub fn new(direction: D, view: V) -> Self {
        Self { direction, view }
    }
}

async fn summaries<E, I>(effects: &E, ids: I) -> SocialResult<Vec<UserSummary>>
where
    E: SocialEffects + ?Sized,
    I: IntoIterator<Item = UserId>,
{
    let mut out = Vec::new();
    for id in ids {
        if let Some(user) = effects.get_user(id).await? {
            out.push(UserSummary::from(&user));
        }
    }
    Ok(out)
}

async fn post_views<E, I>(effects: &E, ids: I) -> SocialResult<Vec<PostView>>
where
    E: SocialEffects + ?Sized,
    I: IntoIterator<Item = PostId>,
{
    let mut posts = Vec::new();
    for id in ids {
        if let Some(post) = effects.get_post(id).await? {
            posts.push(post);
        }
    }
    // Stable: ties stay in list order
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(posts.into_iter().map(PostView::from).collect())
}

/// Load a user and resolve its relationship lists.
pub async fn load_user_aggregate<E>(effects: &E, id: UserId) -> SocialResult<UserAggregate>
where
    E: SocialEffects + ?Sized,
{
    let user = effects
        .get_user(id)
        .await?
        .ok_or_else(|| SocialError::not_found("user", id))?;

    Ok(UserAggregate {
        following: summaries(effects, user.following.iter().copied()).await?,
        followers: summaries(effects, user.followers.iter().copied()).await?,
        posts: post_views(effects, user.posts.iter().copied()).await?,
        saved_posts: post_views(effects, user.saved_posts.iter().copied()).await?,
        id: user.id,
        username: user.username,
        avatar: user.avatar,
        bio: user.bio,
        created_at: user.created_at,
    })
}

/// Load a post view.
pub async fn load_post_view<E>(effects: &E, id: PostId) -> SocialResult<PostView>
where
    E: SocialEffects + ?Sized,
{
    effects
        .get_post(id)
        .await?
        .map(PostView::from)
        .ok_or_else(|| SocialError::not_found("post", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_post_view_counts_likes_and_orders_comments() {
        let owner = UserId::new_from_entropy([1u8; 32]);
        let post_id = PostId::new_from_entropy([2u8; 32]);
        let mut post = Post::new(post_id, owner, "caption", PhysicalTime::epoch());
        post.likes = BTreeSet::from([
            UserId::new_from_entropy([3u8; 32]),
            UserId::new_from_entropy([4u8; 32]),
        ]);
        for (seed, ts) in [(5u8, 100u64), (6, 300), (7, 200)] {
            post.comments.push(Comment {
                id: trellis_core::CommentId::new_from_entropy([seed; 32]),
                post: post_id,
                author: owner,
                text: format!("c{seed}"),
                created_at: PhysicalTime::from_ms(ts),
            });
        }

        let view = PostView::from(post);
        assert_eq!(view.like_count, 2);
        let times: Vec<_> = view.comments.iter().map(|c| c.created_at.ts_ms).collect();
        assert_eq!(times, vec![300, 200, 100]);
    }
}
