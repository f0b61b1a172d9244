//! Trait definition for the encyclopedia API the pipeline reads from.
//!
//! [`crate::wikipedia::WikipediaClient`] is the production implementation;
//! tests plug in in-memory fakes to drive the orchestrator without network.

use std::collections::BTreeMap;

use crate::error::SearchError;
use crate::types::{Language, PageData, SearchItem};

/// The three logical calls a search cycle makes.
///
/// All implementations must be `Send + Sync` because search cycles run as
/// spawned tokio tasks sharing one client.
pub trait EncyclopediaApi: Send + Sync {
    /// Fast title-prefix ("opensearch") lookup.
    ///
    /// Returns up to `limit` titles in the API's order.
    ///
    /// # Errors
    ///
    /// [`SearchError::Network`] if the request fails or the status is not a
    /// success, [`SearchError::MalformedResponse`] if the body has the wrong shape.
    fn prefix_search(
        &self,
        query: &str,
        language: &Language,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<String>, SearchError>> + Send;

    /// Relevance-ranked full-text search returning titles with snippets.
    ///
    /// # Errors
    ///
    /// Same as [`EncyclopediaApi::prefix_search`].
    fn full_text_search(
        &self,
        query: &str,
        language: &Language,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<SearchItem>, SearchError>> + Send;

    /// Batched lead-extract lookup for `titles`, keyed by page id.
    ///
    /// # Errors
    ///
    /// Same as [`EncyclopediaApi::prefix_search`].
    fn fetch_extracts(
        &self,
        titles: &[String],
        language: &Language,
    ) -> impl std::future::Future<Output = Result<BTreeMap<i64, PageData>, SearchError>> + Send;
}
