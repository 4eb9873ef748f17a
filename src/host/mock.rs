// Canned host for tests: anything not registered behaves like a missing OS resource

use super::{FsStats, Host};
use crate::error::{SampleResult, SourceUnavailable};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
enum MockCommand {
    Output(String),
    TimesOut,
}

/// In-memory `Host`. Commands are keyed by the full command line
/// (`"top -l 1 -n 0"`); unregistered commands fail to spawn.
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    files: HashMap<PathBuf, String>,
    commands: HashMap<String, MockCommand>,
    page_size: Option<u64>,
    physical_pages: Option<u64>,
    filesystems: HashMap<PathBuf, FsStats>,
    load_average: Option<f64>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    pub fn with_command(mut self, command_line: &str, stdout: impl Into<String>) -> Self {
        self.commands
            .insert(command_line.to_string(), MockCommand::Output(stdout.into()));
        self
    }

    /// Registers a command that never finishes within its timeout.
    pub fn with_hanging_command(mut self, command_line: &str) -> Self {
        self.commands
            .insert(command_line.to_string(), MockCommand::TimesOut);
        self
    }

    pub fn with_sysconf(mut self, page_size: u64, physical_pages: u64) -> Self {
        self.page_size = Some(page_size);
        self.physical_pages = Some(physical_pages);
        self
    }

    pub fn with_fs(mut self, path: impl Into<PathBuf>, stats: FsStats) -> Self {
        self.filesystems.insert(path.into(), stats);
        self
    }

    pub fn with_load_average(mut self, one: f64) -> Self {
        self.load_average = Some(one);
        self
    }
}

impl Host for MockHost {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("mock: no file {}", path.display()),
            )
        })
    }

    fn run_command(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> SampleResult<String> {
        let mut command_line = program.to_string();
        for arg in args {
            command_line.push(' ');
            command_line.push_str(arg);
        }
        match self.commands.get(&command_line) {
            Some(MockCommand::Output(out)) => Ok(out.clone()),
            Some(MockCommand::TimesOut) => Err(SourceUnavailable::Timeout {
                program: program.to_string(),
                timeout,
            }),
            None => Err(SourceUnavailable::Spawn {
                program: program.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "mock: command not registered"),
            }),
        }
    }

    fn page_size(&self) -> Option<u64> {
        self.page_size
    }

    fn physical_pages(&self) -> Option<u64> {
        self.physical_pages
    }

    fn fs_stats(&self, path: &Path) -> io::Result<FsStats> {
        self.filesystems.get(path).copied().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("mock: no filesystem at {}", path.display()),
            )
        })
    }

    fn load_average_one(&self) -> Option<f64> {
        self.load_average
    }
}
