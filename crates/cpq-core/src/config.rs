use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/cpq/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpqConfig {
    /// Bytes copied per engine poll. Bounds the work done in one step.
    pub chunk_bytes: usize,
    /// Show the interactive status line (still subject to tty detection).
    pub status: bool,
    /// Minimum milliseconds between status line refreshes.
    pub status_interval_ms: u64,
    /// Sleep when every job stalls, in milliseconds.
    pub idle_wait_ms: u64,
    /// Verify each transfer against a streaming SHA-256 after completion.
    #[serde(default)]
    pub verify: bool,
    /// Overwrite existing destination files by default.
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for CpqConfig {
    fn default() -> Self {
        Self {
            chunk_bytes: 256 * 1024,
            status: true,
            status_interval_ms: 250,
            idle_wait_ms: 20,
            verify: false,
            overwrite: false,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cpq")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CpqConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CpqConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: CpqConfig = toml::from_str(&data)?;
    Ok(cfg)
}
