//! Seeding fixtures
//!
//! Write users and posts straight into a store with ids derived from a seed
//! byte, bypassing the engine so tests can set up state without producing
//! notifications.

use trellis_core::effects::{DocumentStore, IdentityStore, PhysicalTimeEffects};
use trellis_core::{Post, PostId, User, UserId};

/// Deterministic user id for `seed`
pub fn test_user_id(seed: u8) -> UserId {
    UserId::new_from_entropy([seed; 32])
}

/// Deterministic post id for `seed`
pub fn test_post_id(seed: u8) -> PostId {
    PostId::new_from_entropy([seed; 32])
}

/// Insert a user with id `test_user_id(seed)` and an avatar derived from
/// the username.
pub async fn seed_user<E>(effects: &E, seed: u8, username: &str) -> User
where
    E: IdentityStore + PhysicalTimeEffects,
{
    let created_at = effects.physical_time().await.unwrap();
    let user = User::new(test_user_id(seed), username, created_at)
        .with_avatar(format!("https://avatars.test/{username}.png"));
    effects.insert_user(user.clone()).await.unwrap();
    user
}

/// Insert `count` users with seeds `1..=count`, named `user1`, `user2`, ...
pub async fn seed_users<E>(effects: &E, count: u8) -> Vec<User>
where
    E: IdentityStore + PhysicalTimeEffects,
{
    let mut users = Vec::with_capacity(usize::from(count));
    for seed in 1..=count {
        users.push(seed_user(effects, seed, &format!("user{seed}")).await);
    }
    users
}

/// Insert a post with id `test_post_id(seed)` and append it to the owner's
/// post list.
pub async fn seed_post<E>(effects: &E, seed: u8, owner: UserId, caption: &str) -> Post
where
    E: DocumentStore + PhysicalTimeEffects,
{
    let created_at = effects.physical_time().await.unwrap();
    let post = Post::new(test_post_id(seed), owner, caption, created_at);
    effects.insert_post(post.clone()).await.unwrap();
    assert!(effects.push_user_post(owner, post.id).await.unwrap());
    post
}
