//! Identity store interface.
//!
//! The identity store owns user records. Relationship sets on those records
//! are mutated only through `DocumentStore`; this trait covers lookup,
//! registration and profile edits.

use super::storage::StorageError;
use crate::domain::{ProfilePatch, User};
use crate::types::identifiers::UserId;
use async_trait::async_trait;

/// User record lookup and profile maintenance.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Fetch a user document.
    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError>;

    /// Whether a user document exists.
    async fn user_exists(&self, id: UserId) -> Result<bool, StorageError>;

    /// Insert a new user document.
    ///
    /// Fails with `StorageError::Duplicate` if the id is taken.
    async fn insert_user(&self, user: User) -> Result<(), StorageError>;

    /// Apply a profile patch atomically, returning the updated user or
    /// `None` if the user does not exist.
    async fn update_profile(
        &self,
        id: UserId,
        patch: &ProfilePatch,
    ) -> Result<Option<User>, StorageError>;

    /// All user documents, ordered by registration time.
    async fn list_users(&self) -> Result<Vec<User>, StorageError>;
}
