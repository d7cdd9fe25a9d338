//! Organizer options and their TOML configuration file.
//!
//! The category table itself is fixed; what can be configured is which
//! entries count as eligible files.
//!
//! # Configuration File Format
//!
//! ```toml
//! [organizer]
//! hidden_prefix = "."
//! self_extension = ".rs"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".sortdirrc.toml";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration in {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
    /// IO error while reading configuration.
    #[error("IO error reading configuration {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which directory entries the organizer treats as eligible files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizerOptions {
    /// Names starting with this prefix are hidden and never moved.
    pub hidden_prefix: String,
    /// Files with this extension are the organizer's own sources and are
    /// never moved. Compared case-sensitively, with or without the dot.
    pub self_extension: String,
}

impl Default for OrganizerOptions {
    fn default() -> Self {
        Self {
            hidden_prefix: ".".to_string(),
            self_extension: ".rs".to_string(),
        }
    }
}

impl OrganizerOptions {
    /// Returns true if `file_name` is hidden under these options.
    pub fn is_hidden(&self, file_name: &str) -> bool {
        !self.hidden_prefix.is_empty() && file_name.starts_with(&self.hidden_prefix)
    }

    /// Returns true if `path` carries the organizer's own source extension.
    pub fn is_self_source(&self, path: &Path) -> bool {
        let wanted = self.self_extension.trim_start_matches('.');
        if wanted.is_empty() {
            return false;
        }
        path.extension().is_some_and(|ext| ext == wanted)
    }
}

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub organizer: OrganizerOptions,
}

impl Config {
    /// Load configuration, with fallback to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if provided
    /// 2. `.sortdirrc.toml` in the current directory
    /// 3. `~/.config/sortdir/config.toml`
    /// 4. Built-in defaults
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file is missing, or if any file
    /// found cannot be read or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sortdir")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        tracing::debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::parse(&content).map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}
