//! Application configuration
//!
//! Configuration loaded from `.diff-anchor.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Diffs larger than this are pruned to metadata only (100 KiB)
pub const DEFAULT_MAX_DIFF_BYTES: usize = 100 * 1024;

/// Application configuration loaded from `.diff-anchor.toml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// git executable used for content lookups
    #[serde(default = "default_git_command")]
    pub git_command: String,

    /// Repository working directory
    #[serde(default = "default_repository")]
    pub repository: PathBuf,

    /// Diffs whose raw text exceeds this many bytes are treated as too large
    #[serde(default = "default_max_diff_bytes")]
    pub max_diff_bytes: usize,

    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_git_command() -> String {
    "git".to_string()
}

fn default_repository() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_diff_bytes() -> usize {
    DEFAULT_MAX_DIFF_BYTES
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            git_command: default_git_command(),
            repository: default_repository(),
            max_diff_bytes: default_max_diff_bytes(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then the config directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Load config from an explicit path; a missing or invalid file is an error
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}
