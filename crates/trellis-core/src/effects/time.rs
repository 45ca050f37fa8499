//! Wall-clock time effects.
//!
//! Every `created_at` on a record is assigned through this trait so tests
//! can drive a simulated clock.

use crate::time::PhysicalTime;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for time operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TimeError {
    /// The system clock reported a time before the Unix epoch
    #[error("Clock before Unix epoch")]
    BeforeEpoch,
    /// The time source is not reachable
    #[error("Time service unavailable")]
    ServiceUnavailable,
}

/// Wall-clock time for record timestamps.
#[async_trait]
pub trait PhysicalTimeEffects: Send + Sync {
    /// Current wall-clock time.
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError>;
}

/// Blanket implementation for Arc<T> where T: PhysicalTimeEffects
#[async_trait]
impl<T: PhysicalTimeEffects + ?Sized> PhysicalTimeEffects for std::sync::Arc<T> {
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        (**self).physical_time().await
    }
}
