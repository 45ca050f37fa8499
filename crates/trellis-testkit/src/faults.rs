//! Fault-injecting document store
//!
//! `FaultyStore` forwards to an inner store unless a fault is armed for the
//! called operation, in which case it returns `StorageError::WriteFailed`
//! (or `ReadFailed` for reads) without touching the inner store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use trellis_core::effects::{DocumentStore, IdentityStore, SetToggle, StorageError, UserEdge};
use trellis_core::{
    Comment, CommentId, Notification, NotificationId, Post, PostId, ProfilePatch, User, UserId,
};

/// Store operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultOp {
    /// `IdentityStore::get_user`
    GetUser,
    /// `DocumentStore::toggle_user_edge`
    ToggleUserEdge,
    /// `DocumentStore::insert_user_edge` on the given edge
    InsertUserEdge(UserEdge),
    /// `DocumentStore::remove_user_edge` on the given edge
    RemoveUserEdge(UserEdge),
    /// `DocumentStore::toggle_like`
    ToggleLike,
    /// `DocumentStore::toggle_saved_post`
    ToggleSavedPost,
    /// `DocumentStore::remove_saved_post`
    RemoveSavedPost,
    /// `DocumentStore::remove_user_post`
    RemoveUserPost,
    /// `DocumentStore::append_comment`
    AppendComment,
    /// `DocumentStore::insert_notification`
    InsertNotification,
}

/// Store wrapper with armable failures.
#[derive(Debug, Clone)]
pub struct FaultyStore<S> {
    inner: S,
    // remaining failures per operation
    armed: Arc<Mutex<HashMap<FaultOp, usize>>>,
}

impl<S> FaultyStore<S> {
    /// Wrap `inner` with no faults armed
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            armed: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The wrapped store, for inspecting state behind the faults
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Fail every future call to `op`
    pub fn fail_always(&self, op: FaultOp) {
        self.armed.lock().unwrap().insert(op, usize::MAX);
    }

    /// Fail the next `times` calls to `op`
    pub fn fail_times(&self, op: FaultOp, times: usize) {
        self.armed.lock().unwrap().insert(op, times);
    }

    /// Disarm every fault
    pub fn heal(&self) {
        self.armed.lock().unwrap().clear();
    }

    fn trip(&self, op: FaultOp) -> bool {
        let mut armed = self.armed.lock().unwrap();
        match armed.get_mut(&op) {
            Some(0) | None => false,
            Some(remaining) => {
                if *remaining != usize::MAX {
                    *remaining -= 1;
                }
                true
            }
        }
    }

    fn check_write(&self, op: FaultOp) -> Result<(), StorageError> {
        if self.trip(op) {
            return Err(StorageError::WriteFailed(format!("injected fault on {op:?}")));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: IdentityStore> IdentityStore for FaultyStore<S> {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        if self.trip(FaultOp::GetUser) {
            return Err(StorageError::ReadFailed(format!("injected fault reading {id}")));
        }
        self.inner.get_user(id).await
    }

    async fn user_exists(&self, id: UserId) -> Result<bool, StorageError> {
        self.inner.user_exists(id).await
    }

    async fn insert_user(&self, user: User) -> Result<(), StorageError> {
        self.inner.insert_user(user).await
    }

    async fn update_profile(
        &self,
        id: UserId,
        patch: &ProfilePatch,
    ) -> Result<Option<User>, StorageError> {
        self.inner.update_profile(id, patch).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        self.inner.list_users().await
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for FaultyStore<S> {
    async fn toggle_user_edge(
        &self,
        user: UserId,
        edge: UserEdge,
        member: UserId,
    ) -> Result<Option<SetToggle>, StorageError> {
        self.check_write(FaultOp::ToggleUserEdge)?;
        self.inner.toggle_user_edge(user, edge, member).await
    }

    async fn insert_user_edge(
        &self,
        user: UserId,
        edge: UserEdge,
        member: UserId,
    ) -> Result<Option<bool>, StorageError> {
        self.check_write(FaultOp::InsertUserEdge(edge))?;
        self.inner.insert_user_edge(user, edge, member).await
    }

    async fn remove_user_edge(
        &self,
        user: UserId,
        edge: UserEdge,
        member: UserId,
    ) -> Result<Option<bool>, StorageError> {
        self.check_write(FaultOp::RemoveUserEdge(edge))?;
        self.inner.remove_user_edge(user, edge, member).await
    }

    async fn toggle_saved_post(
        &self,
        user: UserId,
        post: PostId,
    ) -> Result<Option<SetToggle>, StorageError> {
        self.check_write(FaultOp::ToggleSavedPost)?;
        self.inner.toggle_saved_post(user, post).await
    }

    async fn remove_saved_post(
        &self,
        user: UserId,
        post: PostId,
    ) -> Result<Option<bool>, StorageError> {
        self.check_write(FaultOp::RemoveSavedPost)?;
        self.inner.remove_saved_post(user, post).await
    }

    async fn users_with_saved_post(&self, post: PostId) -> Result<Vec<UserId>, StorageError> {
        self.inner.users_with_saved_post(post).await
    }

    async fn push_user_post(&self, user: UserId, post: PostId) -> Result<bool, StorageError> {
        self.inner.push_user_post(user, post).await
    }

    async fn remove_user_post(&self, user: UserId, post: PostId) -> Result<bool, StorageError> {
        self.check_write(FaultOp::RemoveUserPost)?;
        self.inner.remove_user_post(user, post).await
    }

    async fn insert_post(&self, post: Post) -> Result<(), StorageError> {
        self.inner.insert_post(post).await
    }

    async fn get_post(&self, id: PostId) -> Result<Option<Post>, StorageError> {
        self.inner.get_post(id).await
    }

    async fn remove_post(&self, id: PostId) -> Result<Option<Post>, StorageError> {
        self.inner.remove_post(id).await
    }

    async fn toggle_like(
        &self,
        post: PostId,
        user: UserId,
    ) -> Result<Option<SetToggle>, StorageError> {
        self.check_write(FaultOp::ToggleLike)?;
        self.inner.toggle_like(post, user).await
    }

    async fn append_comment(&self, post: PostId, comment: Comment) -> Result<bool, StorageError> {
        self.check_write(FaultOp::AppendComment)?;
        self.inner.append_comment(post, comment).await
    }

    async fn remove_comment(
        &self,
        post: PostId,
        comment: CommentId,
    ) -> Result<Option<Comment>, StorageError> {
        self.inner.remove_comment(post, comment).await
    }

    async fn insert_notification(&self, notification: Notification) -> Result<(), StorageError> {
        self.check_write(FaultOp::InsertNotification)?;
        self.inner.insert_notification(notification).await
    }

    async fn get_notification(
        &self,
        id: NotificationId,
    ) -> Result<Option<Notification>, StorageError> {
        self.inner.get_notification(id).await
    }

    async fn mark_notification_read(
        &self,
        id: NotificationId,
    ) -> Result<Option<bool>, StorageError> {
        self.inner.mark_notification_read(id).await
    }

    async fn notifications_for(
        &self,
        recipient: UserId,
    ) -> Result<Vec<Notification>, StorageError> {
        self.inner.notifications_for(recipient).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::PhysicalTime;
    use trellis_effects::MemoryDocumentStore;

    #[tokio::test]
    async fn test_fail_times_counts_down() {
        let store = FaultyStore::new(MemoryDocumentStore::new());
        let ada = UserId::new_from_entropy([1u8; 32]);
        store
            .insert_user(User::new(ada, "ada", PhysicalTime::epoch()))
            .await
            .unwrap();

        store.fail_times(FaultOp::GetUser, 1);
        assert!(store.get_user(ada).await.is_err());
        assert!(store.get_user(ada).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_edge_faults_are_per_edge() {
        let store = FaultyStore::new(MemoryDocumentStore::new());
        let ada = UserId::new_from_entropy([1u8; 32]);
        let bob = UserId::new_from_entropy([2u8; 32]);
        store
            .insert_user(User::new(ada, "ada", PhysicalTime::epoch()))
            .await
            .unwrap();

        store.fail_always(FaultOp::InsertUserEdge(UserEdge::Followers));
        assert!(store
            .insert_user_edge(ada, UserEdge::Followers, bob)
            .await
            .is_err());
        assert_eq!(
            store.insert_user_edge(ada, UserEdge::Following, bob).await,
            Ok(Some(true))
        );

        store.heal();
        assert_eq!(
            store.insert_user_edge(ada, UserEdge::Followers, bob).await,
            Ok(Some(true))
        );
    }
}
