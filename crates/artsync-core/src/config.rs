use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::remote::HttpOptions;

/// Global configuration loaded from `~/.config/artsync/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Base URL of the artifact server (e.g. `https://repo.example.com/artifactory`).
    #[serde(default)]
    pub server_url: Option<String>,
    /// Maximum number of artifacts downloaded concurrently.
    pub max_concurrent_downloads: usize,
    /// Default layout for artifacts that don't choose one: flat when true.
    #[serde(default)]
    pub flat_download: bool,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout in seconds.
    pub transfer_timeout_secs: u64,
    /// Extra HTTP headers sent with every artifact request.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            max_concurrent_downloads: 4,
            flat_download: false,
            connect_timeout_secs: 30,
            transfer_timeout_secs: 3600,
            headers: HashMap::new(),
        }
    }
}

impl SyncConfig {
    /// Concurrency actually used; never below 1.
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrent_downloads.max(1)
    }

    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            headers: self.headers.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.transfer_timeout_secs),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("artsync")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SyncConfig> {
    load_or_init_at(&config_path()?)
}

/// Like `load_or_init` for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<SyncConfig> {
    if !path.exists() {
        let default_cfg = SyncConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SyncConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
