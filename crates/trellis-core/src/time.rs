//! Wall-clock time values.
//!
//! Timestamps are produced by `PhysicalTimeEffects` handlers and stored on
//! records as milliseconds since the Unix epoch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical (wall-clock) timestamp in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhysicalTime {
    /// Milliseconds since the Unix epoch
    pub ts_ms: u64,
}

impl PhysicalTime {
    /// Create a timestamp from milliseconds since the Unix epoch.
    pub const fn from_ms(ts_ms: u64) -> Self {
        Self { ts_ms }
    }

    /// The Unix epoch.
    pub const fn epoch() -> Self {
        Self { ts_ms: 0 }
    }
}

impl fmt::Display for PhysicalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.ts_ms)
    }
}
