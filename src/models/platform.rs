// Platform and CPU-metric enumerations

use serde::{Deserialize, Serialize};
use std::fmt;

/// OS family the sampler branches on. Anything unrecognized is `Unknown`,
/// for which the OS-specific samplers report zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Darwin,
    Linux,
    Unknown,
}

impl PlatformKind {
    /// Platform of the running process.
    pub fn detect() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Maps an OS name (`std::env::consts::OS` or a `uname -s` style name) to a platform.
    pub fn from_os_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "darwin" | "macos" => Self::Darwin,
            "linux" => Self::Linux,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Darwin => "darwin",
            Self::Linux => "linux",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Unit reported in `cpu_load`. Chosen per deployment; the two are never mixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpuMetric {
    /// Utilization percentage, 0-100.
    #[default]
    Percent,
    /// Raw 1-minute load average.
    LoadAverage,
}
