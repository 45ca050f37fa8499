//! Composite effect handler
//!
//! Bundles a document store, a clock and a random source into one value
//! that satisfies `SocialEffects` through the blanket implementation.

use async_trait::async_trait;
use trellis_core::effects::{
    DocumentStore, IdentityStore, PhysicalTimeEffects, RandomEffects, SetToggle, StorageError,
    TimeError, UserEdge,
};
use trellis_core::{
    Comment, CommentId, Notification, NotificationId, PhysicalTime, Post, PostId, ProfilePatch,
    User, UserId,
};
use uuid::Uuid;

use crate::random::{RealRandomHandler, SeededRandomHandler};
use crate::storage::memory::MemoryDocumentStore;
use crate::time::real::RealTimeHandler;
use crate::time::simulated::SimulatedTimeHandler;

/// Store + clock + randomness
#[derive(Debug, Clone)]
pub struct CompositeEffects<S, T, R> {
    store: S,
    clock: T,
    random: R,
}

impl<S, T, R> CompositeEffects<S, T, R> {
    /// Assemble a composite from its parts
    pub fn new(store: S, clock: T, random: R) -> Self {
        Self {
            store,
            clock,
            random,
        }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The underlying clock
    pub fn clock(&self) -> &T {
        &self.clock
    }
}

impl CompositeEffects<MemoryDocumentStore, RealTimeHandler, RealRandomHandler> {
    /// In-memory store with the system clock and OS randomness
    pub fn production() -> Self {
        Self::new(
            MemoryDocumentStore::new(),
            RealTimeHandler::new(),
            RealRandomHandler::new(),
        )
    }
}

impl CompositeEffects<MemoryDocumentStore, SimulatedTimeHandler, SeededRandomHandler> {
    /// Deterministic composite: each clock read advances by `step_ms`
    pub fn simulated(seed: u64, start_ms: u64, step_ms: u64) -> Self {
        Self::new(
            MemoryDocumentStore::new(),
            SimulatedTimeHandler::with_step(start_ms, step_ms),
            SeededRandomHandler::new(seed),
        )
    }
}

#[async_trait]
impl<S, T, R> PhysicalTimeEffects for CompositeEffects<S, T, R>
where
    S: Send + Sync,
    T: PhysicalTimeEffects,
    R: Send + Sync,
{
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        self.clock.physical_time().await
    }
}

#[async_trait]
impl<S, T, R> RandomEffects for CompositeEffects<S, T, R>
where
    S: Send + Sync,
    T: Send + Sync,
    R: RandomEffects,
{
    async fn random_uuid(&self) -> Uuid {
        self.random.random_uuid().await
    }
}

#[async_trait]
impl<S, T, R> IdentityStore for CompositeEffects<S, T, R>
where
    S: IdentityStore,
    T: Send + Sync,
    R: Send + Sync,
{
    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        self.store.get_user(id).await
    }

    async fn user_exists(&self, id: UserId) -> Result<bool, StorageError> {
        self.store.user_exists(id).await
    }

    async fn insert_user(&self, user: User) -> Result<(), StorageError> {
        self.store.insert_user(user).await
    }

    async fn update_profile(
        &self,
        id: UserId,
        patch: &ProfilePatch,
    ) -> Result<Option<User>, StorageError> {
        self.store.update_profile(id, patch).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        self.store.list_users().await
    }
}

#[async_trait]
impl<S, T, R> DocumentStore for CompositeEffects<S, T, R>
where
    S: DocumentStore,
    T: Send + Sync,
    R: Send + Sync,
{
    async fn toggle_user_edge(
        &self,
        user: UserId,
        edge: UserEdge,
        member: UserId,
    ) -> Result<Option<SetToggle>, StorageError> {
        self.store.toggle_user_edge(user, edge, member).await
    }

    async fn insert_user_edge(
        &self,
        user: UserId,
        edge: UserEdge,
        member: UserId,
    ) -> Result<Option<bool>, StorageError> {
        self.store.insert_user_edge(user, edge, member).await
    }

    async fn remove_user_edge(
        &self,
        user: UserId,
        edge: UserEdge,
        member: UserId,
    ) -> Result<Option<bool>, StorageError> {
        self.store.remove_user_edge(user, edge, member).await
    }

    async fn toggle_saved_post(
        &self,
        user: UserId,
        post: PostId,
    ) -> Result<Option<SetToggle>, StorageError> {
        self.store.toggle_saved_post(user, post).await
    }

    async fn remove_saved_post(
        &self,
        user: UserId,
        post: PostId,
    ) -> Result<Option<bool>, StorageError> {
        self.store.remove_saved_post(user, post).await
    }

    async fn users_with_saved_post(&self, post: PostId) -> Result<Vec<UserId>, StorageError> {
        self.store.users_with_saved_post(post).await
    }

    async fn push_user_post(&self, user: UserId, post: PostId) -> Result<bool, StorageError> {
        self.store.push_user_post(user, post).await
    }

    async fn remove_user_post(&self, user: UserId, post: PostId) -> Result<bool, StorageError> {
        self.store.remove_user_post(user, post).await
    }

    async fn insert_post(&self, post: Post) -> Result<(), StorageError> {
        self.store.insert_post(post).await
    }

    async fn get_post(&self, id: PostId) -> Result<Option<Post>, StorageError> {
        self.store.get_post(id).await
    }

    async fn remove_post(&self, id: PostId) -> Result<Option<Post>, StorageError> {
        self.store.remove_post(id).await
    }

    async fn toggle_like(
        &self,
        post: PostId,
        user: UserId,
    ) -> Result<Option<SetToggle>, StorageError> {
        self.store.toggle_like(post, user).await
    }

    async fn append_comment(&self, post: PostId, comment: Comment) -> Result<bool, StorageError> {
        self.store.append_comment(post, comment).await
    }

    async fn remove_comment(
        &self,
        post: PostId,
        comment: CommentId,
    ) -> Result<Option<Comment>, StorageError> {
        self.store.remove_comment(post, comment).await
    }

    async fn insert_notification(&self, notification: Notification) -> Result<(), StorageError> {
        self.store.insert_notification(notification).await
    }

    async fn get_notification(
        &self,
        id: NotificationId,
    ) -> Result<Option<Notification>, StorageError> {
        self.store.get_notification(id).await
    }

    async fn mark_notification_read(
        &self,
        id: NotificationId,
    ) -> Result<Option<bool>, StorageError> {
        self.store.mark_notification_read(id).await
    }

    async fn notifications_for(
        &self,
        recipient: UserId,
    ) -> Result<Vec<Notification>, StorageError> {
        self.store.notifications_for(recipient).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::SocialEffects;

    fn assert_social<E: SocialEffects>(_: &E) {}

    #[tokio::test]
    async fn test_simulated_composite_is_social_effects() {
        let effects = CompositeEffects::simulated(7, 1_000, 10);
        assert_social(&effects);

        let t1 = effects.physical_time().await;
        let t2 = effects.physical_time().await;
        assert_eq!(t1, Ok(PhysicalTime::from_ms(1_000)));
        assert_eq!(t2, Ok(PhysicalTime::from_ms(1_010)));
    }
}
