//! Typo-tolerant suggestions.
//!
//! Candidate titles come from the API's prefix endpoint; only those within
//! the typo tolerance of the query (ignoring case) survive. The single
//! closest survivor is offered as a "did you mean" recommendation.

use crate::api::EncyclopediaApi;
use crate::distance::distance_ignore_case;
use crate::error::SearchError;
use crate::types::Language;

use super::scoring::DEFAULT_TYPO_TOLERANCE;

/// The suggestion closest to a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosestMatch {
    /// The suggested title.
    pub term: String,
    /// Case-insensitive edit distance from the query.
    pub distance: usize,
}

/// Fetches and filters suggestion candidates.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionEngine {
    limit: usize,
    typo_tolerance: usize,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new(15, DEFAULT_TYPO_TOLERANCE)
    }
}

impl SuggestionEngine {
    /// Create an engine fetching up to `limit` candidates and keeping those
    /// within `typo_tolerance` edits.
    pub fn new(limit: usize, typo_tolerance: usize) -> Self {
        Self {
            limit,
            typo_tolerance,
        }
    }

    /// Fetch candidate titles for `query` and keep the close ones, in API order.
    ///
    /// # Errors
    ///
    /// Propagates the API error if the candidate fetch fails.
    pub async fn suggest<A: EncyclopediaApi>(
        &self,
        api: &A,
        query: &str,
        language: &Language,
    ) -> Result<Vec<String>, SearchError> {
        let candidates = api.prefix_search(query, language, self.limit).await?;
        let suggestions = self.filter(candidates, query);
        tracing::debug!(count = suggestions.len(), "suggestions filtered");
        Ok(suggestions)
    }

    /// Keep the titles within the typo tolerance of `query`.
    pub fn filter(&self, candidates: Vec<String>, query: &str) -> Vec<String> {
        candidates
            .into_iter()
            .filter(|title| distance_ignore_case(title, query) <= self.typo_tolerance)
            .collect()
    }

    /// The closest suggestion, but only if it is within the typo tolerance.
    pub fn recommend(&self, suggestions: &[String], query: &str) -> Option<ClosestMatch> {
        closest_match(suggestions, query).filter(|m| m.distance <= self.typo_tolerance)
    }
}

/// The suggestion with the smallest case-insensitive edit distance to
/// `query`. The earliest entry wins ties. `None` for an empty list.
pub fn closest_match(suggestions: &[String], query: &str) -> Option<ClosestMatch> {
    let mut best: Option<ClosestMatch> = None;
    for term in suggestions {
        let distance = distance_ignore_case(term, query);
        if best.as_ref().is_none_or(|b| distance < b.distance) {
            best = Some(ClosestMatch {
                term: term.clone(),
                distance,
            });
        }
    }
    best
}
