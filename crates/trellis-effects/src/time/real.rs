//! Real time effect handler for production use

use async_trait::async_trait;
use std::time::{SystemTime, UNIX_EPOCH};
use trellis_core::effects::{PhysicalTimeEffects, TimeError};
use trellis_core::PhysicalTime;

/// Real time handler reading the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeHandler;

impl RealTimeHandler {
    /// Create a new real time handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PhysicalTimeEffects for RealTimeHandler {
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| TimeError::BeforeEpoch)?;
        let ts_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        Ok(PhysicalTime::from_ms(ts_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_real_time_is_after_2020() {
        let now = RealTimeHandler::new().physical_time().await;
        assert!(matches!(now, Ok(t) if t.ts_ms > 1_577_836_800_000));
    }
}
