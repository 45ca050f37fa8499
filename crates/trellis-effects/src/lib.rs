//! Trellis Effects - Effect Handlers
//!
//! Implementations of the effect traits defined in `trellis-core`:
//!
//! - `MemoryDocumentStore`: in-process `IdentityStore` + `DocumentStore`
//!   where every primitive runs under the owning collection's write lock,
//!   making each set toggle a single atomic step
//! - `RealTimeHandler` / `SimulatedTimeHandler`: wall clock and a
//!   controllable clock for deterministic tests
//! - `RealRandomHandler` / `SeededRandomHandler`: identifier generation
//! - `CompositeEffects`: bundles a store, a clock and a random source into
//!   one `SocialEffects` value
//! - `logging::init_tracing`: subscriber setup for binaries

#![forbid(unsafe_code)]

pub mod composite;
pub mod logging;
pub mod random;
pub mod storage;
pub mod time;

pub use composite::CompositeEffects;
pub use random::{RealRandomHandler, SeededRandomHandler};
pub use storage::memory::MemoryDocumentStore;
pub use time::{real::RealTimeHandler, simulated::SimulatedTimeHandler};
