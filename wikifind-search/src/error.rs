//! Error types for the wikifind-search crate.
//!
//! All errors use stable string messages suitable for logging. None of them
//! is shown verbatim to the user: the orchestrator folds every failure into a
//! generic failure view, keeping [`SearchError::Timeout`] distinct.

/// Errors that can occur while talking to the encyclopedia API.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The request could not be sent or the API answered with a non-success status.
    #[error("network error: {0}")]
    Network(String),

    /// The API answered, but the JSON did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The fetch chain did not finish before the deadline.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// Invalid search configuration or input.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Whether this error should be surfaced as the dedicated timeout state.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Convenience type alias for wikifind-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
