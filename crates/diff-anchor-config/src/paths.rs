//! Configuration directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/diff-anchor/`
//! - macOS: `~/Library/Application Support/diff-anchor/`
//! - Windows: `%APPDATA%\diff-anchor\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "diff-anchor";

/// Get the application config directory (not created if missing)
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}

/// Get path to the global app config file
pub fn app_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_path() {
        // dirs may not resolve in minimal CI environments
        if let Ok(path) = app_config_path() {
            assert!(path.ends_with("config.toml"));
            assert!(path.parent().unwrap().ends_with(APP_NAME));
        }
    }
}
