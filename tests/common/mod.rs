// Shared test helpers: canned hosts for each platform

#![allow(dead_code)]

use hostmetrics::host::{FsStats, MockHost};
use hostmetrics::metrics_repo::{MetricsRepo, SamplerSettings};
use hostmetrics::models::PlatformKind;
use std::sync::Arc;

pub const MEMINFO: &str = "\
MemTotal:        1000000 kB
MemFree:          200000 kB
MemAvailable:     600000 kB
Buffers:           50000 kB
Cached:           150000 kB
SwapCached:            0 kB
Active:           300000 kB
";

pub const PROC_STAT: &str = "\
cpu  100 0 50 850 0 0 0 0 0 0
cpu0 50 0 25 425 0 0 0 0 0 0
cpu1 50 0 25 425 0 0 0 0 0 0
intr 12345
ctxt 999
";

pub const TOP: &str = "\
Processes: 512 total, 3 running, 509 sleeping, 2417 threads
Load Avg: 1.93, 2.10, 2.25
CPU usage: 12.5% user, 7.5% sys, 80.0% idle
";

pub const VM_STAT: &str = "\
Mach Virtual Memory Statistics: (page size of 4096 bytes)
Pages free:                                 100.
Pages active:                               600.
Pages inactive:                             200.
";

pub fn root_fs() -> FsStats {
    FsStats {
        fragment_size: 1000,
        blocks: 500_000_000,
        blocks_free: 250_000_000,
    }
}

pub fn linux_host() -> MockHost {
    MockHost::new()
        .with_file("/proc/stat", PROC_STAT)
        .with_file("/proc/meminfo", MEMINFO)
        .with_fs("/", root_fs())
        .with_load_average(0.75)
}

pub fn darwin_host() -> MockHost {
    MockHost::new()
        .with_command("top -l 1 -n 0", TOP)
        .with_command("vm_stat", VM_STAT)
        .with_sysconf(4096, 1000)
        .with_fs("/", root_fs())
        .with_load_average(1.93)
}

pub fn settings_for(platform: PlatformKind) -> SamplerSettings {
    SamplerSettings {
        platform_override: Some(platform),
        ..SamplerSettings::default()
    }
}

pub fn repo(host: MockHost, platform: PlatformKind) -> MetricsRepo {
    MetricsRepo::new(Arc::new(host), settings_for(platform))
}
