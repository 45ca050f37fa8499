//! Randomness effects used for identifier generation.

use async_trait::async_trait;
use uuid::Uuid;

/// Source of fresh identifiers.
#[async_trait]
pub trait RandomEffects: Send + Sync {
    /// Generate a fresh UUID.
    async fn random_uuid(&self) -> Uuid;
}

/// Blanket implementation for Arc<T> where T: RandomEffects
#[async_trait]
impl<T: RandomEffects + ?Sized> RandomEffects for std::sync::Arc<T> {
    async fn random_uuid(&self) -> Uuid {
        (**self).random_uuid().await
    }
}
