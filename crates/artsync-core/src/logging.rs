//! Tracing setup for the `artsync` binary.
//!
//! Events go to `artsync.log` under the XDG state directory, appended across
//! runs. When that file can't be opened the caller falls back to stderr.
//! `RUST_LOG` overrides the default filter in both cases.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,artsync=debug,artsync_core=debug";
const LOG_FILE_NAME: &str = "artsync.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `~/.local/state/artsync/artsync.log` (or the `XDG_STATE_HOME` equivalent).
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("artsync")?;
    Ok(xdg_dirs.get_state_home().join(LOG_FILE_NAME))
}

/// Opens `path` for appending, creating it and its parent directory.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))
}

/// Installs the file subscriber and returns the log path.
/// Errors leave no subscriber installed, so `init_logging_stderr` can follow.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = open_log_file(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {}", e))?;

    tracing::info!("artsync logging initialized at {}", path.display());
    Ok(path)
}

/// Stderr-only subscriber, used when the log file is unavailable.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
