//! Tracing subscriber setup for binaries and integration harnesses.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! caller's job.

use tracing_subscriber::EnvFilter;
use trellis_core::TrellisError;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins when set and may carry per-target directives; otherwise
/// `default_level` (a bare level such as `"info"`) applies to every target.
/// Fails if a subscriber is already installed or the level does not parse.
pub fn init_tracing(default_level: &str) -> Result<(), TrellisError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level).map_err(|e| {
            TrellisError::invalid(format!("Invalid log filter '{default_level}': {e}"))
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| TrellisError::internal(format!("Failed to install tracing subscriber: {e}")))
}
