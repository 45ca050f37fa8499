//! Graph assertions

use trellis_core::effects::IdentityStore;
use trellis_core::{User, UserId};

async fn load_all<S: IdentityStore + ?Sized>(store: &S, users: &[UserId]) -> Vec<User> {
    let mut loaded = Vec::with_capacity(users.len());
    for id in users {
        let user = store.get_user(*id).await.unwrap();
        loaded.push(user.unwrap_or_else(|| panic!("user {id} missing")));
    }
    loaded
}

/// Check `b ∈ a.followers ⟺ a ∈ b.following` for every pair of `users`,
/// and that nobody follows themselves.
///
/// Returns a description of the first violation.
pub async fn check_follow_symmetry<S>(store: &S, users: &[UserId]) -> Result<(), String>
where
    S: IdentityStore + ?Sized,
{
    let loaded = load_all(store, users).await;
    for a in &loaded {
        if a.is_following(&a.id) || a.is_followed_by(&a.id) {
            return Err(format!("{} has a self edge", a.id));
        }
        for b in &loaded {
            if b.is_followed_by(&a.id) != a.is_following(&b.id) {
                return Err(format!(
                    "asymmetric edge {} -> {}: following={}, followers={}",
                    a.id,
                    b.id,
                    a.is_following(&b.id),
                    b.is_followed_by(&a.id)
                ));
            }
        }
    }
    Ok(())
}

/// Panic unless the follow graph over `users` is symmetric.
pub async fn assert_follow_symmetry<S>(store: &S, users: &[UserId])
where
    S: IdentityStore + ?Sized,
{
    if let Err(violation) = check_follow_symmetry(store, users).await {
        panic!("follow graph is not symmetric: {violation}");
    }
}
