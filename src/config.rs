//! Configuration management for scratchsql.
//!
//! Handles loading configuration from a TOML file. Every field has a default,
//! so a missing file or an empty section is valid.

use crate::error::{ScratchError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Query shown in the editor when nothing else is provided.
pub const DEFAULT_QUERY: &str = "SELECT 'Welcome!' AS message;";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// SQL editor settings.
    #[serde(default)]
    pub editor: EditorConfig,

    /// File explorer settings.
    #[serde(default)]
    pub explorer: ExplorerConfig,
}

/// SQL editor configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorConfig {
    /// Text loaded into the editor at startup.
    #[serde(default = "default_initial_query")]
    pub initial_query: String,
}

fn default_initial_query() -> String {
    DEFAULT_QUERY.to_string()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_query: default_initial_query(),
        }
    }
}

/// File explorer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExplorerConfig {
    /// Directory the explorer starts in, and falls back to when the current
    /// directory becomes unreadable.
    #[serde(default = "default_start_dir")]
    pub start_dir: PathBuf,
}

fn default_start_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            start_dir: default_start_dir(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scratchsql")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ScratchError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ScratchError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
