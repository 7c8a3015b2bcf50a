//! Skillforge Configuration
//!
//! Loads and saves the core's configuration from `~/.skillforge/skillforge.json`.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::types::{default_config, ForgeConfig};

/// Config file name within the skillforge directory.
const CONFIG_FILENAME: &str = "skillforge.json";

/// Returns the skillforge home directory: `~/.skillforge`.
pub fn get_skillforge_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/root"))
        .join(".skillforge")
}

/// Returns the full path to the config file: `~/.skillforge/skillforge.json`.
pub fn get_config_path() -> PathBuf {
    get_skillforge_dir().join(CONFIG_FILENAME)
}

/// Load the config from disk.
///
/// Reads `~/.skillforge/skillforge.json` and merges missing fields with
/// defaults.
///
/// Returns `None` if the config file does not exist or cannot be parsed.
pub fn load_config() -> Option<ForgeConfig> {
    let config_path = get_config_path();
    if !config_path.exists() {
        return None;
    }

    let contents = fs::read_to_string(&config_path).ok()?;
    let mut config: ForgeConfig = serde_json::from_str(&contents).ok()?;

    // Merge defaults for unset fields
    let defaults = default_config();

    if config.skills_dir.is_empty() {
        config.skills_dir = defaults.skills_dir;
    }
    if config.shell_timeout_secs == 0 {
        config.shell_timeout_secs = defaults.shell_timeout_secs;
    }
    if config.version.is_empty() {
        config.version = defaults.version;
    }

    Some(config)
}

/// Save the config to disk at `~/.skillforge/skillforge.json`.
///
/// Creates the skillforge directory with mode 0o700 if it does not exist.
/// The config file is written with mode 0o600.
pub fn save_config(config: &ForgeConfig) -> Result<()> {
    let dir = get_skillforge_dir();
    if !dir.exists() {
        fs::create_dir_all(&dir).context("Failed to create skillforge directory")?;
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o700))?;
    }

    let config_path = get_config_path();
    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&config_path, &json).context("Failed to write config file")?;
    fs::set_permissions(&config_path, fs::Permissions::from_mode(0o600))?;

    Ok(())
}

/// Resolve a path that may start with `~` to an absolute path.
///
/// If the path starts with `~`, the tilde is replaced with the user's home
/// directory. Otherwise the path is returned as-is.
pub fn resolve_path(p: &str) -> String {
    if let Some(rest) = p.strip_prefix('~') {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/root"));
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        home.join(rest).to_string_lossy().to_string()
    } else {
        p.to_string()
    }
}
