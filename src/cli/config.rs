//! Advisor configuration
//!
//! ```json
//! { "index_file": "indexes.json", "log_events": true }
//! ```
//!
//! A relative `index_file` is resolved against the directory holding the
//! configuration file, not the working directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::index::IndexDefinitions;

use super::errors::{CliError, CliResult};

fn default_log_events() -> bool {
    true
}

/// Configuration loaded from JSON file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Index declaration document
    pub index_file: String,

    /// Emit lifecycle log lines on stderr
    #[serde(default = "default_log_events")]
    pub log_events: bool,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = serde_json::from_str(&content).map_err(|e| {
            CliError::config_error(format!("Invalid config JSON: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.index_file.trim().is_empty() {
            return Err(CliError::config_error("index_file is required"));
        }
        Ok(())
    }

    /// Location of the index file for a config read from `config_path`
    pub fn index_path(&self, config_path: &Path) -> PathBuf {
        let index_file = Path::new(&self.index_file);
        if index_file.is_absolute() {
            return index_file.to_path_buf();
        }
        match config_path.parent() {
            Some(dir) => dir.join(index_file),
            None => index_file.to_path_buf(),
        }
    }
}

/// Reads and validates the index declarations named by `config`.
pub fn load_index_definitions(config: &Config, config_path: &Path) -> CliResult<IndexDefinitions> {
    let path = config.index_path(config_path);
    let content = fs::read_to_string(&path).map_err(|e| {
        CliError::config_error(format!(
            "Failed to read index file '{}': {}",
            path.display(),
            e
        ))
    })?;
    Ok(IndexDefinitions::parse(&content)?)
}
