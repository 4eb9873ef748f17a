// Failure of a single metric source

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

/// The one failure kind inside the samplers: a source could not be read,
/// spawned or parsed. Variants only say why, for logs; callers treat every
/// variant the same way and fall back to a zero value.
#[derive(Debug, thiserror::Error)]
pub enum SourceUnavailable {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Exit { program: String, status: ExitStatus },

    #[error("{program} did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("unexpected {source_name} format: {detail}")]
    Parse {
        source_name: &'static str,
        detail: String,
    },

    #[error("{what} is not available on this host")]
    Unsupported { what: &'static str },
}

impl SourceUnavailable {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(source_name: &'static str, detail: impl Into<String>) -> Self {
        Self::Parse {
            source_name,
            detail: detail.into(),
        }
    }
}

pub type SampleResult<T> = Result<T, SourceUnavailable>;
