//! Error types for the wikifind application.

use wikifind_search::SearchError;

/// Top-level error type for the interactive client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration or preference file error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised by the search core.
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;
