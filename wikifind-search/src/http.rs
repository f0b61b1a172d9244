//! Shared HTTP client for encyclopedia API requests.
//!
//! Provides a configured [`reqwest::Client`] with an identifying User-Agent,
//! compressed transfer and a per-request timeout matching the search deadline.

use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::SearchError;

/// Upper bound on redirects followed for a single API call.
const MAX_REDIRECTS: usize = 5;

/// Build a [`reqwest::Client`] for API requests.
///
/// The client has:
/// - The configured User-Agent (Wikimedia rejects anonymous clients)
/// - A per-request timeout equal to the search deadline, so abandoned
///   requests do not linger forever in the background
/// - Brotli and gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Network`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .map_err(|e| SearchError::Network(format!("failed to build HTTP client: {e}")))
}
