//! Persisted user preferences.
//!
//! Only the search language is stored. It is read once at startup and
//! written back every time the user switches language.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wikifind_search::Language;

use crate::error::{AppError, Result};

/// User preferences stored in `preferences.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Language searched by default.
    pub language: Language,
}

impl Preferences {
    /// Read preferences from `path`.
    ///
    /// A missing file yields defaults. An unreadable or invalid file is
    /// logged and also yields defaults, so a bad preference never blocks
    /// startup.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read preferences");
                return Self::default();
            }
        };
        match toml::from_str(&content) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid preferences");
                Self::default()
            }
        }
    }

    /// Write preferences to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        tracing::debug!(language = %self.language, "preferences saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_defaults_to_english() {
        let dir = tempfile::tempdir().expect("tempdir");
        let prefs = Preferences::load(&dir.path().join("preferences.toml"));
        assert_eq!(prefs.language.as_str(), "en");
    }

    #[test]
    fn saved_language_is_read_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sub").join("preferences.toml");
        let prefs = Preferences {
            language: Language::new("id").expect("valid"),
        };
        prefs.save(&path).expect("save");
        assert_eq!(Preferences::load(&path), prefs);
    }

    #[test]
    fn invalid_language_falls_back_to_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.toml");
        std::fs::write(&path, "language = \"not a tag\"\n").expect("write");
        assert_eq!(Preferences::load(&path), Preferences::default());
    }

    #[test]
    fn garbage_file_falls_back_to_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.toml");
        std::fs::write(&path, "{{{").expect("write");
        assert_eq!(Preferences::load(&path), Preferences::default());
    }
}
