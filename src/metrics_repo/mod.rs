// Host metrics: per-platform samplers and the snapshot aggregator

mod darwin;
mod disk;
mod linux;

pub use darwin::{TOP_ARGS, parse_top_cpu_usage, parse_vm_stat_free_pages};
pub use disk::usage_from_fs_stats;
pub use linux::{parse_meminfo, parse_proc_stat_cpu};

use crate::error::{SampleResult, SourceUnavailable};
use crate::host::{Host, RealHost};
use crate::models::{ByteRange, CpuMetric, MetricsSnapshot, PlatformKind};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

/// Where and how the samplers read.
#[derive(Debug, Clone)]
pub struct SamplerSettings {
    /// Mount point of procfs (Linux).
    pub proc_path: PathBuf,
    /// Filesystem reported as `disk`.
    pub root_path: PathBuf,
    /// Upper bound for `top` / `vm_stat`; a timeout counts as an unavailable source.
    pub command_timeout: Duration,
    pub cpu_metric: CpuMetric,
    /// Skips detection when set.
    pub platform_override: Option<PlatformKind>,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            proc_path: PathBuf::from("/proc"),
            root_path: PathBuf::from("/"),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            cpu_metric: CpuMetric::Percent,
            platform_override: None,
        }
    }
}

/// `cpu_load` in the configured unit.
pub fn try_sample_cpu(
    host: &dyn Host,
    platform: PlatformKind,
    settings: &SamplerSettings,
) -> SampleResult<f64> {
    match (platform, settings.cpu_metric) {
        (PlatformKind::Unknown, _) => Err(SourceUnavailable::Unsupported {
            what: "cpu load on an unknown platform",
        }),
        (_, CpuMetric::LoadAverage) => try_sample_load_average(host),
        (PlatformKind::Darwin, CpuMetric::Percent) => {
            darwin::cpu_percent(host, settings.command_timeout)
        }
        (PlatformKind::Linux, CpuMetric::Percent) => {
            linux::cpu_percent(host, &settings.proc_path)
        }
    }
}

/// 1-minute load average; an absolute number, not a percentage.
pub fn try_sample_load_average(host: &dyn Host) -> SampleResult<f64> {
    let load = host.load_average_one().ok_or(SourceUnavailable::Unsupported {
        what: "load average",
    })?;
    if !load.is_finite() || load < 0.0 {
        return Err(SourceUnavailable::parse(
            "load average",
            format!("implausible value {load}"),
        ));
    }
    Ok(load)
}

pub fn try_sample_memory(
    host: &dyn Host,
    platform: PlatformKind,
    settings: &SamplerSettings,
) -> SampleResult<ByteRange> {
    match platform {
        PlatformKind::Darwin => darwin::memory(host, settings.command_timeout),
        PlatformKind::Linux => linux::memory(host, &settings.proc_path),
        PlatformKind::Unknown => Err(SourceUnavailable::Unsupported {
            what: "memory on an unknown platform",
        }),
    }
}

/// Platform-independent.
pub fn try_sample_disk(host: &dyn Host, settings: &SamplerSettings) -> SampleResult<ByteRange> {
    disk::usage(host, &settings.root_path)
}

/// CPU load, or `0.0` when the source is unavailable.
#[instrument(skip(host, settings), fields(repo = "metrics", operation = "sample_cpu"))]
pub fn sample_cpu(host: &dyn Host, platform: PlatformKind, settings: &SamplerSettings) -> f64 {
    try_sample_cpu(host, platform, settings).unwrap_or_else(|e| {
        tracing::warn!(error = %e, %platform, "cpu source unavailable, reporting 0");
        0.0
    })
}

/// Memory usage, or `{0, 0}` when the source is unavailable.
#[instrument(skip(host, settings), fields(repo = "metrics", operation = "sample_memory"))]
pub fn sample_memory(
    host: &dyn Host,
    platform: PlatformKind,
    settings: &SamplerSettings,
) -> ByteRange {
    try_sample_memory(host, platform, settings).unwrap_or_else(|e| {
        tracing::warn!(error = %e, %platform, "memory source unavailable, reporting 0");
        ByteRange::zero()
    })
}

/// Root filesystem usage, or `{0, 0}` when it cannot be queried.
#[instrument(skip(host, settings), fields(repo = "metrics", operation = "sample_disk"))]
pub fn sample_disk(host: &dyn Host, settings: &SamplerSettings) -> ByteRange {
    try_sample_disk(host, settings).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "disk source unavailable, reporting 0");
        ByteRange::zero()
    })
}

/// Takes one fresh reading per call. Holds no state between calls.
#[derive(Clone)]
pub struct MetricsRepo {
    host: Arc<dyn Host>,
    settings: Arc<SamplerSettings>,
}

impl MetricsRepo {
    pub fn new(host: Arc<dyn Host>, settings: SamplerSettings) -> Self {
        Self {
            host,
            settings: Arc::new(settings),
        }
    }

    /// Repo reading the running system.
    pub fn system(settings: SamplerSettings) -> Self {
        Self::new(Arc::new(RealHost::new()), settings)
    }

    pub fn settings(&self) -> &SamplerSettings {
        &self.settings
    }

    pub fn platform(&self) -> PlatformKind {
        self.settings
            .platform_override
            .unwrap_or_else(PlatformKind::detect)
    }

    /// Runs the three samplers concurrently on the blocking pool.
    /// Never fails: each missing source shows up as a zero field.
    #[instrument(skip(self), fields(repo = "metrics", operation = "collect"))]
    pub async fn collect(&self) -> MetricsSnapshot {
        let platform = self.platform();

        let cpu = {
            let (host, settings) = (self.host.clone(), self.settings.clone());
            tokio::task::spawn_blocking(move || sample_cpu(host.as_ref(), platform, &settings))
        };
        let memory = {
            let (host, settings) = (self.host.clone(), self.settings.clone());
            tokio::task::spawn_blocking(move || sample_memory(host.as_ref(), platform, &settings))
        };
        let disk = {
            let (host, settings) = (self.host.clone(), self.settings.clone());
            tokio::task::spawn_blocking(move || sample_disk(host.as_ref(), &settings))
        };

        let (cpu, memory, disk) = tokio::join!(cpu, memory, disk);
        let snapshot = MetricsSnapshot {
            cpu_load: cpu.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "cpu sampler task failed");
                0.0
            }),
            memory: memory.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "memory sampler task failed");
                ByteRange::zero()
            }),
            disk: disk.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "disk sampler task failed");
                ByteRange::zero()
            }),
        };
        tracing::debug!(%platform, ?snapshot, "collected snapshot");
        snapshot
    }

    /// Sequential variant of [`collect`](Self::collect) for callers without a runtime.
    pub fn collect_blocking(&self) -> MetricsSnapshot {
        let platform = self.platform();
        let host = self.host.as_ref();
        MetricsSnapshot {
            cpu_load: sample_cpu(host, platform, &self.settings),
            memory: sample_memory(host, platform, &self.settings),
            disk: sample_disk(host, &self.settings),
        }
    }
}
