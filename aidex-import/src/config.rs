//! Service configuration for aidex-import
//!
//! Resolution priority per setting: environment variable, then TOML config
//! file, then compiled default. A missing config file is not an error; the
//! service comes up with the default Hugging Face source.

use std::path::PathBuf;

use aidex_common::config::{self, SourceConfig, TomlConfig};

const DEFAULT_PORT: u16 = 5810;
const DEFAULT_DB_FILE: &str = "aidex.db";

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// HTTP listen port
    pub port: u16,
    /// Full path to the SQLite database file
    pub db_path: PathBuf,
    /// Configured import sources
    pub sources: Vec<SourceConfig>,
}

impl ServiceConfig {
    /// Load configuration from environment + TOML + defaults
    pub fn load() -> Self {
        let toml_config = config::load_config_file().unwrap_or_else(|e| {
            tracing::debug!("No config file loaded ({}), using defaults", e);
            TomlConfig::default()
        });

        Self::from_toml(toml_config)
    }

    fn from_toml(toml_config: TomlConfig) -> Self {
        let port = std::env::var("AIDEX_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .or(toml_config.port)
            .unwrap_or(DEFAULT_PORT);

        let data_dir = config::resolve_data_dir(None, "AIDEX_DATA_DIR");
        let db_file = toml_config
            .database_file
            .unwrap_or_else(|| DEFAULT_DB_FILE.to_string());
        let db_path = data_dir.join(db_file);

        let sources = if toml_config.sources.is_empty() {
            vec![default_huggingface_source()]
        } else {
            toml_config.sources
        };

        Self {
            port,
            db_path,
            sources,
        }
    }
}

fn default_huggingface_source() -> SourceConfig {
    SourceConfig {
        name: "huggingface".to_string(),
        kind: "huggingface".to_string(),
        base_url: "https://huggingface.co".to_string(),
        fetch_limit: 100,
        timeout_secs: 30,
    }
}
