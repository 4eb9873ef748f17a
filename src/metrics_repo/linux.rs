// Linux sources: /proc/stat and /proc/meminfo

use crate::error::{SampleResult, SourceUnavailable};
use crate::host::Host;
use crate::models::ByteRange;
use std::path::Path;

const KIB: u64 = 1024;

/// CPU utilization since boot from the aggregate `cpu ` line of `/proc/stat`:
/// `(user + nice + system) / (user + nice + system + idle) * 100`.
pub fn parse_proc_stat_cpu(content: &str) -> SampleResult<f64> {
    let line = content
        .lines()
        .find(|l| l.starts_with("cpu "))
        .ok_or_else(|| SourceUnavailable::parse("/proc/stat", "no aggregate cpu line"))?;

    let mut fields = line.split_whitespace().skip(1);
    let mut next_counter = |name: &str| -> SampleResult<u64> {
        let raw = fields
            .next()
            .ok_or_else(|| SourceUnavailable::parse("/proc/stat", format!("missing {name}")))?;
        raw.parse::<u64>().map_err(|e| {
            SourceUnavailable::parse("/proc/stat", format!("{name} {raw:?}: {e}"))
        })
    };
    let user = next_counter("user")?;
    let nice = next_counter("nice")?;
    let system = next_counter("system")?;
    let idle = next_counter("idle")?;

    let active = user
        .checked_add(nice)
        .and_then(|v| v.checked_add(system))
        .ok_or_else(|| SourceUnavailable::parse("/proc/stat", "tick counters overflow"))?;
    let total = active
        .checked_add(idle)
        .ok_or_else(|| SourceUnavailable::parse("/proc/stat", "tick counters overflow"))?;
    if total == 0 {
        return Err(SourceUnavailable::parse("/proc/stat", "tick total is zero"));
    }
    Ok(active as f64 / total as f64 * 100.0)
}

/// Total and used memory from `/proc/meminfo`. Buffers and page cache count as free.
pub fn parse_meminfo(content: &str) -> SampleResult<ByteRange> {
    let mut total = None;
    let mut free = None;
    let mut buffers = None;
    let mut cached = None;

    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let slot = match key.trim() {
            "MemTotal" => &mut total,
            "MemFree" => &mut free,
            "Buffers" => &mut buffers,
            "Cached" => &mut cached,
            _ => continue,
        };
        *slot = Some(parse_kib(key.trim(), value)?);
    }

    let field = |v: Option<u64>, name: &str| {
        v.ok_or_else(|| SourceUnavailable::parse("/proc/meminfo", format!("missing {name}")))
    };
    let total = field(total, "MemTotal")?;
    let reclaimable = field(free, "MemFree")?
        .saturating_add(field(buffers, "Buffers")?)
        .saturating_add(field(cached, "Cached")?);

    Ok(ByteRange::from_free(total, reclaimable))
}

/// `"  1000000 kB"` -> bytes.
fn parse_kib(key: &str, value: &str) -> SampleResult<u64> {
    let raw = value
        .split_whitespace()
        .next()
        .ok_or_else(|| SourceUnavailable::parse("/proc/meminfo", format!("{key} has no value")))?;
    raw.parse::<u64>()
        .map_err(|e| SourceUnavailable::parse("/proc/meminfo", format!("{key} {raw:?}: {e}")))?
        .checked_mul(KIB)
        .ok_or_else(|| SourceUnavailable::parse("/proc/meminfo", format!("{key} overflows")))
}

pub(super) fn cpu_percent(host: &dyn Host, proc_path: &Path) -> SampleResult<f64> {
    let path = proc_path.join("stat");
    let content = host
        .read_to_string(&path)
        .map_err(|e| SourceUnavailable::io(&path, e))?;
    parse_proc_stat_cpu(&content)
}

pub(super) fn memory(host: &dyn Host, proc_path: &Path) -> SampleResult<ByteRange> {
    let path = proc_path.join("meminfo");
    let content = host
        .read_to_string(&path)
        .map_err(|e| SourceUnavailable::io(&path, e))?;
    parse_meminfo(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMINFO: &str = "\
MemTotal:        1000000 kB
MemFree:          200000 kB
MemAvailable:     500000 kB
Buffers:           50000 kB
Cached:           150000 kB
SwapCached:            0 kB
";

    #[test]
    fn proc_stat_percentage_from_first_four_counters() {
        let stat = "cpu  100 0 50 850 7 0 3 0 0 0\ncpu0 50 0 25 425 0 0 0 0 0 0\nintr 1\n";
        let load = parse_proc_stat_cpu(stat).unwrap();
        assert!((load - 15.0).abs() < 1e-9);
    }

    #[test]
    fn proc_stat_zero_ticks_is_a_parse_failure() {
        let err = parse_proc_stat_cpu("cpu  0 0 0 0\n").unwrap_err();
        assert!(matches!(err, SourceUnavailable::Parse { .. }));
    }

    #[test]
    fn proc_stat_ignores_per_cpu_lines() {
        // "cpu0" must not be mistaken for the aggregate line
        assert!(parse_proc_stat_cpu("cpu0 1 2 3 4\n").is_err());
    }

    #[test]
    fn proc_stat_truncated_line() {
        assert!(parse_proc_stat_cpu("cpu  100 0 50\n").is_err());
        assert!(parse_proc_stat_cpu("cpu  100 zero 50 850\n").is_err());
        assert!(parse_proc_stat_cpu("").is_err());
    }

    #[test]
    fn meminfo_counts_buffers_and_cache_as_free() {
        let mem = parse_meminfo(MEMINFO).unwrap();
        assert_eq!(mem.total, 1_024_000_000);
        assert_eq!(mem.used, 614_400_000);
    }

    #[test]
    fn meminfo_missing_field() {
        let without_cached = MEMINFO.replace("Cached:           150000 kB\n", "");
        let err = parse_meminfo(&without_cached).unwrap_err();
        assert!(err.to_string().contains("Cached"));
    }

    #[test]
    fn meminfo_swap_cached_is_not_cached() {
        let only_swap = MEMINFO.replace("Cached:           150000 kB\n", "");
        assert!(only_swap.contains("SwapCached"));
        assert!(parse_meminfo(&only_swap).is_err());
    }

    #[test]
    fn meminfo_garbage_value() {
        let bad = MEMINFO.replace("200000", "lots");
        assert!(parse_meminfo(&bad).is_err());
    }

    #[test]
    fn meminfo_free_exceeding_total_saturates() {
        let odd = "MemTotal: 100 kB\nMemFree: 90 kB\nBuffers: 20 kB\nCached: 30 kB\n";
        let mem = parse_meminfo(odd).unwrap();
        assert_eq!(mem.total, 102_400);
        assert_eq!(mem.used, 0);
    }
}
