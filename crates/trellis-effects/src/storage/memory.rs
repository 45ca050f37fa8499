//! In-memory document store
//!
//! Each collection sits behind its own `RwLock`. Every primitive takes the
//! write lock once, tests membership and mutates inside that critical
//! section, which gives the per-document atomicity the engine relies on.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use trellis_core::effects::{DocumentStore, IdentityStore, SetToggle, StorageError, UserEdge};
use trellis_core::{
    Comment, CommentId, Notification, NotificationId, Post, PostId, ProfilePatch, User, UserId,
};

fn toggle_member<T: Ord>(set: &mut BTreeSet<T>, member: T) -> SetToggle {
    // `take` returns the stored element if present, removing it
    if set.take(&member).is_some() {
        SetToggle::Removed
    } else {
        set.insert(member);
        SetToggle::Added
    }
}

fn edge_set(user: &mut User, edge: UserEdge) -> &mut BTreeSet<UserId> {
    match edge {
        UserEdge::Following => &mut user.following,
        UserEdge::Followers => &mut user.followers,
    }
}

/// In-memory `IdentityStore` + `DocumentStore`
///
/// Cloning shares the underlying collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    posts: Arc<RwLock<HashMap<PostId, Post>>>,
    notifications: Arc<RwLock<Vec<Notification>>>,
}

impl MemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored notifications (for testing)
    pub async fn notification_count(&self) -> usize {
        self.notifications.read().await.len()
    }

    /// Number of stored posts (for testing)
    pub async fn post_count(&self) -> usize {
        self.posts.read().await.len()
    }
}

#[async_trait]
impl IdentityStore for MemoryDocumentStore {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn user_exists(&self, id: UserId) -> Result<bool, StorageError> {
        Ok(self.users.read().await.contains_key(&id))
    }

    async fn insert_user(&self, user: User) -> Result<(), StorageError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(StorageError::Duplicate(user.id.to_string()));
        }
        debug!(user = %user.id, "inserted user document");
        users.insert(user.id, user);
        Ok(())
    }

    async fn update_profile(
        &self,
        id: UserId,
        patch: &ProfilePatch,
    ) -> Result<Option<User>, StorageError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            patch.apply(user);
            user.clone()
        }))
    }

    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn toggle_user_edge(
        &self,
        user: UserId,
        edge: UserEdge,
        member: UserId,
    ) -> Result<Option<SetToggle>, StorageError> {
        let mut users = self.users.write().await;
        Ok(users
            .get_mut(&user)
            .map(|doc| toggle_member(edge_set(doc, edge), member)))
    }

    async fn insert_user_edge(
        &self,
        user: UserId,
        edge: UserEdge,
        member: UserId,
    ) -> Result<Option<bool>, StorageError> {
        let mut users = self.users.write().await;
        Ok(users
            .get_mut(&user)
            .map(|doc| edge_set(doc, edge).insert(member)))
    }

    async fn remove_user_edge(
        &self,
        user: UserId,
        edge: UserEdge,
        member: UserId,
    ) -> Result<Option<bool>, StorageError> {
        let mut users = self.users.write().await;
        Ok(users
            .get_mut(&user)
            .map(|doc| edge_set(doc, edge).remove(&member)))
    }

    async fn toggle_saved_post(
        &self,
        user: UserId,
        post: PostId,
    ) -> Result<Option<SetToggle>, StorageError> {
        let mut users = self.users.write().await;
        Ok(users
            .get_mut(&user)
            .map(|doc| toggle_member(&mut doc.saved_posts, post)))
    }

    async fn remove_saved_post(
        &self,
        user: UserId,
        post: PostId,
    ) -> Result<Option<bool>, StorageError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&user).map(|doc| doc.saved_posts.remove(&post)))
    }

    async fn users_with_saved_post(&self, post: PostId) -> Result<Vec<UserId>, StorageError> {
        let users = self.users.read().await;
        let mut savers: Vec<UserId> = users
            .values()
            .filter(|u| u.saved_posts.contains(&post))
            .map(|u| u.id)
            .collect();
        savers.sort();
        Ok(savers)
    }

    async fn push_user_post(&self, user: UserId, post: PostId) -> Result<bool, StorageError> {
        let mut users = self.users.write().await;
        match users.get_mut(&user) {
            Some(doc) => {
                if !doc.posts.contains(&post) {
                    doc.posts.push(post);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_user_post(&self, user: UserId, post: PostId) -> Result<bool, StorageError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&user).is_some_and(|doc| {
            let before = doc.posts.len();
            doc.posts.retain(|p| *p != post);
            doc.posts.len() != before
        }))
    }

    async fn insert_post(&self, post: Post) -> Result<(), StorageError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(StorageError::Duplicate(post.id.to_string()));
        }
        debug!(post = %post.id, owner = %post.owner, "inserted post document");
        posts.insert(post.id, post);
        Ok(())
    }

    async fn get_post(&self, id: PostId) -> Result<Option<Post>, StorageError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn remove_post(&self, id: PostId) -> Result<Option<Post>, StorageError> {
        Ok(self.posts.write().await.remove(&id))
    }

    async fn toggle_like(
        &self,
        post: PostId,
        user: UserId,
    ) -> Result<Option<SetToggle>, StorageError> {
        let mut posts = self.posts.write().await;
        Ok(posts
            .get_mut(&post)
            .map(|doc| toggle_member(&mut doc.likes, user)))
    }

    async fn append_comment(&self, post: PostId, comment: Comment) -> Result<bool, StorageError> {
        let mut posts = self.posts.write().await;
        match posts.get_mut(&post) {
            Some(doc) => {
                doc.comments.push(comment);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_comment(
        &self,
        post: PostId,
        comment: CommentId,
    ) -> Result<Option<Comment>, StorageError> {
        let mut posts = self.posts.write().await;
        Ok(posts.get_mut(&post).and_then(|doc| {
            let index = doc.comments.iter().position(|c| c.id == comment)?;
            Some(doc.comments.remove(index))
        }))
    }

    async fn insert_notification(&self, notification: Notification) -> Result<(), StorageError> {
        let mut notifications = self.notifications.write().await;
        if notifications.iter().any(|n| n.id == notification.id) {
            return Err(StorageError::Duplicate(notification.id.to_string()));
        }
        notifications.push(notification);
        Ok(())
    }

    async fn get_notification(
        &self,
        id: NotificationId,
    ) -> Result<Option<Notification>, StorageError> {
        let notifications = self.notifications.read().await;
        Ok(notifications.iter().find(|n| n.id == id).cloned())
    }

    async fn mark_notification_read(
        &self,
        id: NotificationId,
    ) -> Result<Option<bool>, StorageError> {
        let mut notifications = self.notifications.write().await;
        Ok(notifications.iter_mut().find(|n| n.id == id).map(|n| {
            let changed = !n.read;
            n.read = true;
            changed
        }))
    }

    async fn notifications_for(
        &self,
        recipient: UserId,
    ) -> Result<Vec<Notification>, StorageError> {
        let notifications = self.notifications.read().await;
        Ok(notifications
            .iter()
            .filter(|n| n.recipient == recipient)
            .cloned()
            .collect())
    }
}
