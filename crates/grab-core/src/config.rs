use crate::download::DownloadOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Backoff between retries (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Delay before the first retry in milliseconds; doubled for each later one.
    pub base_delay_ms: u64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 0,
            max_delay_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/grab/config.toml`.
///
/// Supplies defaults for the CLI; command-line flags override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrabConfig {
    /// Extra full attempts after a failed download.
    pub retry_budget: u32,
    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,
    /// Render a progress bar while transferring.
    pub progress: bool,
    /// Skip TLS certificate verification. Leave off unless the server is trusted.
    #[serde(default)]
    pub insecure_tls: bool,
    /// Optional retry backoff; if missing, retries are immediate.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Default file for `grab log`; if missing, `storage/logs/log.log`.
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self {
            retry_budget: 0,
            timeout_secs: 300,
            progress: false,
            insecure_tls: false,
            retry: None,
            log_path: None,
        }
    }
}

impl GrabConfig {
    /// Download options carrying these defaults.
    pub fn download_options(&self) -> DownloadOptions {
        let retry = self.retry.clone().unwrap_or_default();
        DownloadOptions {
            retry_budget: self.retry_budget,
            timeout_secs: self.timeout_secs,
            progress: self.progress,
            insecure_tls: self.insecure_tls,
            retry_delay: Duration::from_millis(retry.base_delay_ms),
            max_retry_delay: Duration::from_secs(retry.max_delay_secs),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("grab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GrabConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] with an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<GrabConfig> {
    if !path.exists() {
        let default_cfg = GrabConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: GrabConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
