//! Configuration loading and data directory resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// TOML configuration file contents (`aidex.toml`)
///
/// All fields optional; missing values fall back to compiled defaults so a
/// config file is never required for first run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Data directory holding the SQLite database
    pub data_dir: Option<String>,
    /// HTTP listen port
    pub port: Option<u16>,
    /// Database file name within the data directory
    pub database_file: Option<String>,
    /// Import source definitions
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// One configured import source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source name, unique among configured sources (e.g. "huggingface")
    pub name: String,
    /// Adapter kind: "huggingface" or "aggregator"
    pub kind: String,
    /// Base URL for the source's API
    pub base_url: String,
    /// Maximum candidates fetched per run
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: u32,
    /// Per-source HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_fetch_limit() -> u32 {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

/// Data directory resolution, priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&str>, env_var_name: &str) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config) = load_config_file() {
        if let Some(dir) = config.data_dir {
            return PathBuf::from(dir);
        }
    }

    // Priority 4: OS-dependent compiled default
    default_data_dir()
}

/// Load the TOML config file from the platform config directory
///
/// Looks for `~/.config/aidex/aidex.toml` (Linux), the platform equivalent
/// elsewhere, then `/etc/aidex/aidex.toml` as a system-wide fallback.
pub fn load_config_file() -> Result<TomlConfig> {
    let path = config_file_path()?;
    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Locate the config file for the platform
fn config_file_path() -> Result<PathBuf> {
    if let Some(user_config) = dirs::config_dir().map(|d| d.join("aidex").join("aidex.toml")) {
        if user_config.exists() {
            return Ok(user_config);
        }
    }

    let system_config = PathBuf::from("/etc/aidex/aidex.toml");
    if system_config.exists() {
        return Ok(system_config);
    }

    Err(Error::Config("No config file found".to_string()))
}

/// OS-dependent default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("aidex"))
        .unwrap_or_else(|| PathBuf::from("./aidex_data"))
}

/// Ensure the data directory exists, creating it if missing
pub fn ensure_data_dir(dir: &PathBuf) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        tracing::info!("Created data directory: {}", dir.display());
    }
    Ok(())
}
