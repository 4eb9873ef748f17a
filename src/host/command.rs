// Subprocess execution with a hard deadline

use crate::error::{SampleResult, SourceUnavailable};
use std::io::Read;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// How long a killed process group gets to release the stdout pipe.
const KILL_GRACE: Duration = Duration::from_millis(500);

/// Spawns `program` in its own process group, collects stdout, and kills the
/// whole group if it outlives `timeout`.
/// stdout is drained on a separate thread so a chatty child cannot block on a full pipe.
pub(super) fn run_with_timeout(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> SampleResult<String> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }
    let mut child = command.spawn().map_err(|source| SourceUnavailable::Spawn {
        program: program.to_string(),
        source,
    })?;

    let reader = child.stdout.take().map(StdoutReader::spawn);
    let deadline = Instant::now() + timeout;

    let waited = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Ok(status),
            Ok(None) if Instant::now() >= deadline => {
                kill_group(&mut child);
                let _ = child.wait();
                tracing::debug!(program, ?timeout, "killed diagnostic utility after timeout");
                break Err(SourceUnavailable::Timeout {
                    program: program.to_string(),
                    timeout,
                });
            }
            Ok(None) => std::thread::sleep(POLL_INTERVAL),
            Err(source) => {
                kill_group(&mut child);
                let _ = child.wait();
                break Err(SourceUnavailable::Spawn {
                    program: program.to_string(),
                    source,
                });
            }
        }
    };

    let status = match waited {
        Ok(status) => status,
        Err(e) => {
            if let Some(reader) = reader {
                reader.finish(&mut child, KILL_GRACE);
            }
            return Err(e);
        }
    };

    let out = match reader {
        Some(reader) => {
            let remaining = deadline.saturating_duration_since(Instant::now());
            reader.finish(&mut child, remaining)
        }
        None => Some(Vec::new()),
    };

    if !status.success() {
        return Err(SourceUnavailable::Exit {
            program: program.to_string(),
            status,
        });
    }
    let out = out.ok_or_else(|| SourceUnavailable::Timeout {
        program: program.to_string(),
        timeout,
    })?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Background drain of a child's stdout.
struct StdoutReader {
    handle: JoinHandle<()>,
    rx: mpsc::Receiver<Vec<u8>>,
}

impl StdoutReader {
    fn spawn(mut stdout: ChildStdout) -> Self {
        let (tx, rx) = mpsc::channel();
        let handle = std::thread::spawn(move || {
            let mut out = Vec::new();
            let _ = stdout.read_to_end(&mut out);
            let _ = tx.send(out);
        });
        Self { handle, rx }
    }

    /// Waits up to `wait` for EOF. A pipe still open after that is held by a
    /// leftover descendant, so the group is killed and the reader joined.
    /// `None` only if the pipe outlives the kill as well.
    fn finish(self, child: &mut Child, wait: Duration) -> Option<Vec<u8>> {
        let out = match self.rx.recv_timeout(wait) {
            Ok(out) => out,
            Err(_) => {
                kill_group(child);
                self.rx.recv_timeout(KILL_GRACE).ok()?
            }
        };
        let _ = self.handle.join();
        Some(out)
    }
}

fn kill_group(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
            // SAFETY: kill has no memory-safety preconditions; the negative pid
            // addresses the group created for this child at spawn.
            unsafe {
                libc::kill(-pgid, libc::SIGKILL);
            }
        }
    }
    let _ = child.kill();
}
