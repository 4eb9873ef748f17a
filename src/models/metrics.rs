// Snapshot and byte-pair models

use serde::{Deserialize, Serialize};

/// Capacity and consumption of one resource, in bytes.
///
/// `used <= total` is expected but not enforced. `{0, 0}` is what a sampler
/// reports when its source could not be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub total: u64,
    pub used: u64,
}

impl ByteRange {
    pub const fn zero() -> Self {
        Self { total: 0, used: 0 }
    }

    /// Builds a range from a total and the portion of it that is free.
    pub fn from_free(total: u64, free: u64) -> Self {
        Self {
            total,
            used: total.saturating_sub(free),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total == 0 && self.used == 0
    }
}

/// One reading of the host. Keys serialize as `cpu_load`, `memory`, `disk`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub cpu_load: f64,
    pub memory: ByteRange,
    pub disk: ByteRange,
}

impl MetricsSnapshot {
    pub const fn zeroed() -> Self {
        Self {
            cpu_load: 0.0,
            memory: ByteRange::zero(),
            disk: ByteRange::zero(),
        }
    }
}
