//! Simulated time effect handler for testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use trellis_core::effects::{PhysicalTimeEffects, TimeError};
use trellis_core::PhysicalTime;

/// Simulated time handler for testing and scenario replay
///
/// Every read returns the current simulated time and then advances it by
/// `step_ms`, so consecutive records get strictly increasing timestamps
/// unless the step is zero.
#[derive(Debug, Clone)]
pub struct SimulatedTimeHandler {
    /// Current simulated time in milliseconds
    current_time: Arc<AtomicU64>,
    /// Amount the clock advances after each read
    step_ms: u64,
}

impl SimulatedTimeHandler {
    /// Create a frozen clock starting at the given time
    pub fn new(start_time_ms: u64) -> Self {
        Self::with_step(start_time_ms, 0)
    }

    /// Create a clock that ticks `step_ms` after every read
    pub fn with_step(start_time_ms: u64, step_ms: u64) -> Self {
        Self {
            current_time: Arc::new(AtomicU64::new(start_time_ms)),
            step_ms,
        }
    }

    /// Create a frozen clock at Unix epoch
    pub fn new_at_epoch() -> Self {
        Self::new(0)
    }

    /// Advance simulated time by the given duration
    pub fn advance_time(&self, duration_ms: u64) {
        self.current_time.fetch_add(duration_ms, Ordering::SeqCst);
    }

    /// Set the absolute simulated time
    pub fn set_time(&self, time_ms: u64) {
        self.current_time.store(time_ms, Ordering::SeqCst);
    }

    /// Get the current simulated time without advancing it
    pub fn get_time(&self) -> u64 {
        self.current_time.load(Ordering::SeqCst)
    }
}

impl Default for SimulatedTimeHandler {
    fn default() -> Self {
        Self::new_at_epoch()
    }
}

#[async_trait]
impl PhysicalTimeEffects for SimulatedTimeHandler {
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        let ts_ms = self.current_time.fetch_add(self.step_ms, Ordering::SeqCst);
        Ok(PhysicalTime::from_ms(ts_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_frozen_clock_repeats() {
        let clock = SimulatedTimeHandler::new(1_000);
        assert_eq!(clock.physical_time().await, Ok(PhysicalTime::from_ms(1_000)));
        assert_eq!(clock.physical_time().await, Ok(PhysicalTime::from_ms(1_000)));

        clock.advance_time(500);
        assert_eq!(clock.get_time(), 1_500);
    }

    #[tokio::test]
    async fn test_stepping_clock_ticks_per_read() {
        let clock = SimulatedTimeHandler::with_step(10, 5);
        assert_eq!(clock.physical_time().await, Ok(PhysicalTime::from_ms(10)));
        assert_eq!(clock.physical_time().await, Ok(PhysicalTime::from_ms(15)));
        assert_eq!(clock.get_time(), 20);
    }
}
