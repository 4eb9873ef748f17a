use crate::metrics_repo::SamplerSettings;
use crate::models::{CpuMetric, PlatformKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when `CONFIG_FILE` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "hostmetrics.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
}

/// Used only when the binary runs as a standalone HTTP server (not under CGI).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

fn default_port() -> u16 {
    8081
}

fn default_host() -> String {
    "127.0.0.1".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "default_proc_path")]
    pub proc_path: String,
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Upper bound for each diagnostic utility run (macOS `top` / `vm_stat`).
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,
    /// `"percent"` (0-100) or `"load_average"` (raw 1-minute load).
    #[serde(default)]
    pub cpu_metric: CpuMetric,
    /// Forces a platform instead of detecting it ("linux" or "darwin").
    #[serde(default)]
    pub platform: Option<String>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            proc_path: default_proc_path(),
            root_path: default_root_path(),
            command_timeout_ms: default_command_timeout_ms(),
            cpu_metric: CpuMetric::default(),
            platform: None,
        }
    }
}

fn default_proc_path() -> String {
    "/proc".into()
}

fn default_root_path() -> String {
    "/".into()
}

fn default_command_timeout_ms() -> u64 {
    2000
}

impl AppConfig {
    /// `CONFIG_FILE` if set (must exist), else `hostmetrics.toml` if present, else defaults.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::load_from_path(Path::new(&path)),
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_from_path(Path::new(DEFAULT_CONFIG_FILE))
            }
            Err(_) => {
                tracing::debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("config {}: {}", path.display(), e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            !self.sampling.proc_path.is_empty(),
            "sampling.proc_path must be non-empty"
        );
        anyhow::ensure!(
            !self.sampling.root_path.is_empty(),
            "sampling.root_path must be non-empty"
        );
        anyhow::ensure!(
            self.sampling.command_timeout_ms > 0,
            "sampling.command_timeout_ms must be > 0, got {}",
            self.sampling.command_timeout_ms
        );
        if let Some(name) = &self.sampling.platform {
            anyhow::ensure!(
                PlatformKind::from_os_name(name) != PlatformKind::Unknown,
                "sampling.platform must be \"linux\" or \"darwin\", got {:?}",
                name
            );
        }
        Ok(())
    }

    pub fn sampler_settings(&self) -> SamplerSettings {
        SamplerSettings {
            proc_path: PathBuf::from(&self.sampling.proc_path),
            root_path: PathBuf::from(&self.sampling.root_path),
            command_timeout: Duration::from_millis(self.sampling.command_timeout_ms),
            cpu_metric: self.sampling.cpu_metric,
            platform_override: self
                .sampling
                .platform
                .as_deref()
                .map(PlatformKind::from_os_name),
        }
    }
}
