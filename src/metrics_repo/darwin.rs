// macOS sources: `top` for CPU, `vm_stat` + sysconf for memory

use crate::error::{SampleResult, SourceUnavailable};
use crate::host::Host;
use crate::models::ByteRange;
use std::time::Duration;

/// Single sample, no process rows.
pub const TOP_ARGS: [&str; 4] = ["-l", "1", "-n", "0"];

/// `user + sys` from a `top` summary line such as
/// `CPU usage: 5.26% user, 10.52% sys, 84.21% idle`.
pub fn parse_top_cpu_usage(output: &str) -> SampleResult<f64> {
    let summary = output
        .lines()
        .find_map(|l| l.split_once("CPU usage:").map(|(_, rest)| rest))
        .ok_or_else(|| SourceUnavailable::parse("top", "no CPU usage line"))?;

    let mut user = None;
    let mut sys = None;
    for part in summary.split(',') {
        let Some((value, label)) = part.trim().split_once('%') else {
            continue;
        };
        let slot = match label.trim() {
            "user" => &mut user,
            "sys" => &mut sys,
            _ => continue,
        };
        let value = value
            .trim()
            .parse::<f64>()
            .map_err(|e| SourceUnavailable::parse("top", format!("{value:?}: {e}")))?;
        // f64 parsing accepts "nan", "inf" and signs; none of them is a usage share
        if !value.is_finite() || value < 0.0 {
            return Err(SourceUnavailable::parse(
                "top",
                format!("implausible {} share {value}", label.trim()),
            ));
        }
        *slot = Some(value);
    }

    match (user, sys) {
        (Some(user), Some(sys)) => {
            let total = user + sys;
            if !total.is_finite() {
                return Err(SourceUnavailable::parse(
                    "top",
                    format!("user + sys overflows: {user} + {sys}"),
                ));
            }
            // per-field rounding in top can push the sum just past 100
            Ok(total.min(100.0))
        }
        _ => Err(SourceUnavailable::parse(
            "top",
            format!("CPU usage line lacks user/sys: {}", summary.trim()),
        )),
    }
}

/// Leading integer of the `Pages free:` line of `vm_stat` (`Pages free:  12345.`).
pub fn parse_vm_stat_free_pages(output: &str) -> SampleResult<u64> {
    let rest = output
        .lines()
        .find_map(|l| l.strip_prefix("Pages free:"))
        .ok_or_else(|| SourceUnavailable::parse("vm_stat", "no Pages free line"))?;
    let digits: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits
        .parse::<u64>()
        .map_err(|e| SourceUnavailable::parse("vm_stat", format!("Pages free {rest:?}: {e}")))
}

pub(super) fn cpu_percent(host: &dyn Host, timeout: Duration) -> SampleResult<f64> {
    let out = host.run_command("top", &TOP_ARGS, timeout)?;
    parse_top_cpu_usage(&out)
}

/// Only "Pages free" counts as unused; inactive, speculative and purgeable pages are used.
pub(super) fn memory(host: &dyn Host, timeout: Duration) -> SampleResult<ByteRange> {
    let page_size = host
        .page_size()
        .ok_or(SourceUnavailable::Unsupported { what: "_SC_PAGESIZE" })?;
    let total_pages = host
        .physical_pages()
        .ok_or(SourceUnavailable::Unsupported { what: "_SC_PHYS_PAGES" })?;

    let out = host.run_command("vm_stat", &[], timeout)?;
    let free_pages = parse_vm_stat_free_pages(&out)?;

    let total = total_pages
        .checked_mul(page_size)
        .ok_or_else(|| SourceUnavailable::parse("sysconf", "physical memory overflows"))?;
    let free = free_pages.saturating_mul(page_size);
    Ok(ByteRange::from_free(total, free))
}
