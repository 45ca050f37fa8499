//! Deterministic effect bundles for tests

use std::sync::Once;

use trellis_effects::{
    CompositeEffects, MemoryDocumentStore, SeededRandomHandler, SimulatedTimeHandler,
};

use crate::faults::FaultyStore;

/// In-memory store, stepping simulated clock, seeded identifiers
pub type TestEffects =
    CompositeEffects<MemoryDocumentStore, SimulatedTimeHandler, SeededRandomHandler>;

/// `TestEffects` with a fault-injecting store in front of the memory store
pub type FaultyEffects =
    CompositeEffects<FaultyStore<MemoryDocumentStore>, SimulatedTimeHandler, SeededRandomHandler>;

/// Clock step used by the deterministic bundles
pub const TEST_CLOCK_STEP_MS: u64 = 10;

/// Deterministic effects: ids from `seed`, clock starting at `start_ms` and
/// ticking `TEST_CLOCK_STEP_MS` on every read.
pub fn test_effects_deterministic(seed: u64, start_ms: u64) -> TestEffects {
    CompositeEffects::simulated(seed, start_ms, TEST_CLOCK_STEP_MS)
}

/// Deterministic effects with a frozen clock; every record shares one
/// timestamp.
pub fn test_effects_frozen_clock(seed: u64, at_ms: u64) -> TestEffects {
    CompositeEffects::new(
        MemoryDocumentStore::new(),
        SimulatedTimeHandler::new(at_ms),
        SeededRandomHandler::new(seed),
    )
}

/// Deterministic effects whose store can be told to fail.
pub fn test_effects_faulty(seed: u64, start_ms: u64) -> FaultyEffects {
    CompositeEffects::new(
        FaultyStore::new(MemoryDocumentStore::new()),
        SimulatedTimeHandler::with_step(start_ms, TEST_CLOCK_STEP_MS),
        SeededRandomHandler::new(seed),
    )
}

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per process. Honours `RUST_LOG`.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
