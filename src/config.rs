//! Application configuration.
//!
//! Loaded from `config.toml` in the config directory (see
//! [`crate::wikifind_dirs`]). Every section has defaults, so a missing file
//! or a partial file is fine.
//!
//! ```toml
//! [search]
//! debounce_ms = 300
//! timeout_seconds = 30
//! api_endpoint = "https://{lang}.wikipedia.org/w/api.php"
//!
//! [logging]
//! filter = "wikifind=info,wikifind_search=info"
//! file = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use wikifind_search::SearchConfig;

use crate::error::{AppError, Result};

/// Default `tracing` filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "wikifind=info,wikifind_search=info";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Search pipeline settings.
    pub search: SearchConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` env-filter directives. `RUST_LOG` takes precedence.
    pub filter: String,
    /// Write logs to a daily file under the logs directory instead of stderr.
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_owned(),
            file: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> PathBuf {
        crate::wikifind_dirs::config_file()
    }

    /// Load from `explicit` if given, else from the default path if that
    /// file exists, else defaults. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed, or if
    /// the search settings are invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::default_config_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    tracing::debug!(path = %path.display(), "no config file, using defaults");
                    Self::default()
                }
            }
        };
        config.search.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.search.validate().is_ok());
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
        assert!(config.logging.file);
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = AppConfig::from_file(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write");

        let result = AppConfig::from_file(&path);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.search.timeout_seconds = 10;
        config.logging.file = false;
        config.save_to_file(&path).expect("save");

        let loaded = AppConfig::from_file(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\nmax_results = 5\n").expect("write");

        let config = AppConfig::load(Some(&path)).expect("load");
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn load_rejects_invalid_search_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\ntimeout_seconds = 0\n").expect("write");

        let result = AppConfig::load(Some(&path));
        assert!(matches!(result, Err(AppError::Search(_))));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = AppConfig::default_config_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.ends_with("config.toml"));
    }
}
