//! Random effect handlers
//!
//! Standard implementations of the `RandomEffects` trait defined in
//! `trellis-core`. Identifiers for posts, comments and notifications are
//! minted here.

use async_trait::async_trait;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::Mutex;
use trellis_core::effects::RandomEffects;
use uuid::Uuid;

/// Real random handler using v4 UUIDs from the OS generator
#[derive(Debug, Clone, Copy, Default)]
pub struct RealRandomHandler;

impl RealRandomHandler {
    /// Create a new real random handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RandomEffects for RealRandomHandler {
    async fn random_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic random handler for tests and scenario replay
///
/// Two handlers built from the same seed produce the same identifier
/// sequence.
#[derive(Debug)]
pub struct SeededRandomHandler {
    rng: Mutex<ChaCha8Rng>,
}

impl SeededRandomHandler {
    /// Create a handler from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl Default for SeededRandomHandler {
    fn default() -> Self {
        Self::new(0)
    }
}

#[async_trait]
impl RandomEffects for SeededRandomHandler {
    async fn random_uuid(&self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.rng.lock().await.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_handler_is_reproducible() {
        let a = SeededRandomHandler::new(42);
        let b = SeededRandomHandler::new(42);

        let first = a.random_uuid().await;
        assert_eq!(first, b.random_uuid().await);
        assert_ne!(first, a.random_uuid().await);
    }
}
