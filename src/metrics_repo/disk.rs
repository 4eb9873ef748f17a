// Root filesystem usage via statvfs

use crate::error::{SampleResult, SourceUnavailable};
use crate::host::{FsStats, Host};
use crate::models::ByteRange;
use std::path::Path;

/// `total = blocks * frsize`, `used = (blocks - blocks_free) * frsize`.
/// Blocks reserved for root count as used.
pub fn usage_from_fs_stats(stats: &FsStats) -> SampleResult<ByteRange> {
    let total = stats
        .blocks
        .checked_mul(stats.fragment_size)
        .ok_or_else(|| SourceUnavailable::parse("statvfs", "filesystem size overflows"))?;
    let free = stats.blocks_free.saturating_mul(stats.fragment_size);
    Ok(ByteRange::from_free(total, free))
}

pub(super) fn usage(host: &dyn Host, root_path: &Path) -> SampleResult<ByteRange> {
    let stats = host
        .fs_stats(root_path)
        .map_err(|e| SourceUnavailable::io(root_path, e))?;
    usage_from_fs_stats(&stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_counts_scale_by_fragment_size() {
        let stats = FsStats {
            fragment_size: 4096,
            blocks: 1000,
            blocks_free: 250,
        };
        let usage = usage_from_fs_stats(&stats).unwrap();
        assert_eq!(usage.total, 4_096_000);
        assert_eq!(usage.used, 3_072_000);
    }

    #[test]
    fn overflowing_block_count_is_rejected() {
        let stats = FsStats {
            fragment_size: 4096,
            blocks: u64::MAX,
            blocks_free: 0,
        };
        assert!(usage_from_fs_stats(&stats).is_err());
    }
}
