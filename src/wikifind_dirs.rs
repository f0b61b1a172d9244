//! Centralized application directory paths for wikifind.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! # Directory Layout
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Data (logs) | `~/Library/Application Support/wikifind/` | `~/.local/share/wikifind/` |
//! | Config | `~/Library/Application Support/wikifind/` | `~/.config/wikifind/` |
//!
//! # Environment Overrides
//!
//! - `WIKIFIND_DATA_DIR` overrides [`data_dir`]
//! - `WIKIFIND_CONFIG_DIR` overrides [`config_dir`]

use std::path::PathBuf;

const APP_DIR: &str = "wikifind";

/// Application data root directory.
///
/// Resolves to `dirs::data_dir()/wikifind/` by default. Override with
/// the `WIKIFIND_DATA_DIR` environment variable.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("WIKIFIND_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| std::env::temp_dir().join("wikifind-data"))
}

/// Application config directory, holding `config.toml` and
/// `preferences.toml`.
///
/// Resolves to `dirs::config_dir()/wikifind/` by default. Override with
/// the `WIKIFIND_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("WIKIFIND_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| std::env::temp_dir().join("wikifind-config"))
}

/// Log file directory (`data_dir()/logs/`).
#[must_use]
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Stored user preferences (`config_dir()/preferences.toml`).
#[must_use]
pub fn preferences_file() -> PathBuf {
    config_dir().join("preferences.toml")
}
