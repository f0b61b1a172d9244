//! # wikifind-search
//!
//! Search ranking and suggestion core for wikifind.
//!
//! Retrieval is delegated to a public encyclopedia API (Wikipedia's
//! MediaWiki action API); this crate merges, scores, ranks and caches what
//! the API returns and degrades gracefully when it is slow, empty or wrong.
//!
//! ## Design
//!
//! - Three dependent API calls per query (prefix titles, full-text hits,
//!   batched lead extracts) plus an independent suggestion fetch
//! - Client-side relevance scoring with a typo-tolerant edit-distance rule
//! - "Did you mean" recommendations for misspelled queries
//! - In-memory FIFO cache keyed by (language, query) with a 24 hour TTL
//! - Debounced input with logical cancellation of superseded requests
//! - A hard deadline on the whole fetch chain
//!
//! ## Security
//!
//! - Language tags are validated before they become part of a host name
//! - Search queries are logged only at trace level
//! - Search snippets are reduced to plain text

pub mod api;
pub mod cache;
pub mod config;
pub mod distance;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod types;
pub mod wikipedia;

pub use api::EncyclopediaApi;
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use orchestrator::pipeline::{CycleOutcome, ResultSink, ScheduledSearch, SearchOrchestrator};
pub use types::{CandidateResult, Language, Query, ResultView, SearchState};
pub use wikipedia::{article_url, WikipediaClient};

use tokio::sync::mpsc;

/// Run one search cycle for `query` against Wikipedia, without debouncing.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid. API failures and
/// timeouts are not errors here; they come back as
/// [`ResultView::Failed`] and [`ResultView::TimedOut`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> wikifind_search::Result<()> {
/// use wikifind_search::{Language, ResultView, SearchConfig};
///
/// let config = SearchConfig::default();
/// let view = wikifind_search::search("Albert Einstein", &Language::default(), &config).await?;
/// if let ResultView::Results { results, .. } = view {
///     for result in &results {
///         println!("{} ({})", result.title, result.score);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, language: &Language, config: &SearchConfig) -> Result<ResultView> {
    let client = WikipediaClient::new(config)?;
    search_with(client, query, language, config).await
}

/// Run one search cycle against any [`EncyclopediaApi`].
///
/// # Errors
///
/// Same as [`search`].
pub async fn search_with<A: EncyclopediaApi + 'static>(
    api: A,
    query: &str,
    language: &Language,
    config: &SearchConfig,
) -> Result<ResultView> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let orchestrator = SearchOrchestrator::new(api, tx, config.clone())?;
    let outcome = orchestrator.search_now(query, language).await;
    tracing::debug!(?outcome, "one-shot search finished");
    // A lone cycle always delivers exactly one view before returning.
    rx.try_recv()
        .map_err(|e| SearchError::Config(format!("search produced no view: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_validates_config_zero_max_results() {
        let config = SearchConfig {
            max_results: 0,
            ..Default::default()
        };
        let result = search("test", &Language::default(), &config).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("max_results"));
    }

    #[tokio::test]
    async fn search_validates_config_zero_timeout() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let result = search("test", &Language::default(), &config).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout"));
    }

    #[tokio::test]
    async fn blank_query_is_cleared_without_network() {
        let view = search("   ", &Language::default(), &SearchConfig::default())
            .await
            .expect("valid config");
        assert_eq!(view, ResultView::Cleared);
    }
}
