use std::path::Path;

const CONFIG_FILE: &str = ".diff-anchor.toml";

/// Load config file content from CWD first, then the user config directory
///
/// Searches for:
/// 1. `.diff-anchor.toml` in the current working directory
/// 2. `config.toml` in the platform config directory (see [`crate::paths`])
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    // Try current directory first
    if let Some(content) = read_config(Path::new(CONFIG_FILE)) {
        return Some(content);
    }

    let global = crate::paths::app_config_path().ok()?;
    read_config(&global)
}

/// Read a config file, logging where it came from
pub fn read_config(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            log::debug!("Loaded config from {}", path.display());
            Some(content)
        }
        Err(_) => None,
    }
}
