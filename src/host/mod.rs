// OS access seam: every read, spawn and syscall the samplers make goes through `Host`

mod command;
mod mock;

pub use mock::MockHost;

use crate::error::SampleResult;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Block counts for one mounted filesystem (statvfs).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FsStats {
    /// Fundamental block size in bytes.
    pub fragment_size: u64,
    pub blocks: u64,
    pub blocks_free: u64,
}

/// Read-only access to the OS metric sources.
///
/// `RealHost` talks to the running system; `MockHost` serves canned data
/// so samplers can be exercised on any machine.
pub trait Host: Send + Sync {
    /// Reads a pseudo-file (e.g. `/proc/meminfo`) as text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Runs a diagnostic utility and returns its stdout. Non-zero exit,
    /// spawn failure and exceeding `timeout` are all errors.
    fn run_command(&self, program: &str, args: &[&str], timeout: Duration) -> SampleResult<String>;

    /// Page size in bytes (`_SC_PAGESIZE`).
    fn page_size(&self) -> Option<u64>;

    /// Physical memory in pages (`_SC_PHYS_PAGES`).
    fn physical_pages(&self) -> Option<u64>;

    fn fs_stats(&self, path: &Path) -> io::Result<FsStats>;

    /// 1-minute load average.
    fn load_average_one(&self) -> Option<f64>;
}

/// The running system.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealHost;

impl RealHost {
    pub fn new() -> Self {
        Self
    }
}

impl Host for RealHost {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn run_command(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> SampleResult<String> {
        command::run_with_timeout(program, args, timeout)
    }

    fn page_size(&self) -> Option<u64> {
        #[cfg(unix)]
        {
            sysconf(libc::_SC_PAGESIZE)
        }
        #[cfg(not(unix))]
        {
            None
        }
    }

    fn physical_pages(&self) -> Option<u64> {
        #[cfg(any(target_os = "linux", target_os = "macos"))]
        {
            sysconf(libc::_SC_PHYS_PAGES)
        }
        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            None
        }
    }

    #[cfg(unix)]
    #[allow(clippy::unnecessary_cast)]
    fn fs_stats(&self, path: &Path) -> io::Result<FsStats> {
        use std::os::unix::ffi::OsStrExt;

        let c_path = std::ffi::CString::new(path.as_os_str().as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let mut stat = std::mem::MaybeUninit::<libc::statvfs>::uninit();
        // SAFETY: `c_path` is NUL-terminated and `stat` points to writable storage
        // of the right type; statvfs fully initializes it on success.
        let rc = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: rc == 0, so statvfs filled the buffer.
        let stat = unsafe { stat.assume_init() };
        Ok(FsStats {
            fragment_size: stat.f_frsize as u64,
            blocks: stat.f_blocks as u64,
            blocks_free: stat.f_bfree as u64,
        })
    }

    #[cfg(not(unix))]
    fn fs_stats(&self, _path: &Path) -> io::Result<FsStats> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "statvfs is only available on unix",
        ))
    }

    fn load_average_one(&self) -> Option<f64> {
        #[cfg(unix)]
        {
            Some(sysinfo::System::load_average().one)
        }
        #[cfg(not(unix))]
        {
            None
        }
    }
}

#[cfg(unix)]
fn sysconf(name: libc::c_int) -> Option<u64> {
    // SAFETY: sysconf has no memory-safety preconditions.
    let value = unsafe { libc::sysconf(name) };
    u64::try_from(value).ok().filter(|v| *v > 0)
}
