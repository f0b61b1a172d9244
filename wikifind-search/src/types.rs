//! Core types: languages, queries, API payloads, ranked results and the
//! views delivered to the presentation layer.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Maximum length accepted for a language tag (e.g. `zh-min-nan`).
const MAX_LANGUAGE_TAG_LEN: usize = 12;

/// A validated encyclopedia language tag such as `en` or `id`.
///
/// The tag becomes part of the API host name, so only lowercase ASCII
/// letters separated by single hyphens are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(String);

impl Language {
    /// The language used when no preference has been stored.
    pub const DEFAULT_TAG: &'static str = "en";

    /// Parse and validate a language tag. Surrounding whitespace is ignored
    /// and the tag is lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the tag is empty, too long, or
    /// contains anything other than ASCII letters and inner hyphens.
    pub fn new(tag: &str) -> Result<Self, SearchError> {
        let tag = tag.trim().to_ascii_lowercase();
        let valid = !tag.is_empty()
            && tag.len() <= MAX_LANGUAGE_TAG_LEN
            && tag
                .split('-')
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_lowercase()));
        if !valid {
            return Err(SearchError::Config(format!("invalid language tag: {tag:?}")));
        }
        Ok(Self(tag))
    }

    /// The tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Language {
    fn default() -> Self {
        Self(Self::DEFAULT_TAG.to_owned())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Language {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Language {
    type Error = SearchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        value.0
    }
}

/// A trimmed, non-empty search text plus the language it is searched in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    text: String,
    language: Language,
}

impl Query {
    /// Build a query from raw input. Returns `None` when the input is empty
    /// or whitespace only.
    pub fn new(text: &str, language: Language) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_owned(),
            language,
        })
    }

    /// The trimmed query text, case preserved.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The language to search in.
    pub fn language(&self) -> &Language {
        &self.language
    }
}

/// One entry of the API's full-text search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    /// Article title.
    pub title: String,
    /// Plain-text snippet around the match, if the API sent one.
    pub snippet: Option<String>,
}

/// Lead-section data for a single article page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageData {
    /// Article title as the API normalised it.
    pub title: String,
    /// Plain-text lead extract. `None` when the API returned none or an empty one.
    pub extract: Option<String>,
    /// The requested title does not exist.
    pub missing: bool,
}

/// Everything fetched from the API for one query.
///
/// Built once per fetch and then shared read-only between the ranker, the
/// exact-match check and the cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPayload {
    /// Full-text search results in the API's relevance order.
    pub search_items: Vec<SearchItem>,
    /// Page extracts keyed by page id (missing pages have negative ids).
    pub pages: BTreeMap<i64, PageData>,
    /// Prefix-search titles in the API's order.
    pub titles: Vec<String>,
}

impl SearchPayload {
    /// True when neither the prefix search nor the full-text search found anything.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty() && self.search_items.is_empty()
    }

    /// Whether `query` equals (ignoring case) any returned title or search item title.
    pub fn is_exact_match(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.titles.iter().any(|t| t.to_lowercase() == query)
            || self
                .search_items
                .iter()
                .any(|item| item.title.to_lowercase() == query)
    }
}

/// A scored, ranked result ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateResult {
    /// Article title.
    pub title: String,
    /// Lead extract; the presenter substitutes a placeholder when `None`.
    pub extract: Option<String>,
    /// Relevance score, higher is better.
    pub score: i64,
}

/// What the presentation layer receives at the end of a search cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultView {
    /// Ranked results.
    Results {
        /// The query these results answer.
        query: String,
        /// At most `max_results` entries, best first.
        results: Vec<CandidateResult>,
        /// Wall-clock duration of the cycle in seconds.
        timing_secs: f64,
        /// The query matched a returned title exactly (ignoring case).
        exact_match: bool,
        /// A "did you mean" term, offered only when there was no exact match.
        recommendation: Option<String>,
    },
    /// Nothing matched, but there are close titles to choose from.
    Suggestions {
        /// The query that produced no results.
        query: String,
        /// Candidate titles within the typo tolerance.
        suggestions: Vec<String>,
    },
    /// Nothing matched and there is nothing to suggest.
    Empty {
        /// The query that produced no results.
        query: String,
    },
    /// The fetch chain exceeded the deadline.
    TimedOut {
        /// The query that timed out.
        query: String,
    },
    /// The API failed or answered with something unusable.
    Failed {
        /// The query that failed.
        query: String,
    },
    /// The input was cleared; reset the display.
    Cleared,
}

/// Orchestrator state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchState {
    /// Waiting for input.
    Idle,
    /// A cycle is fetching.
    Pending,
    /// The last cycle delivered results, suggestions or an empty view.
    Succeeded,
    /// The last cycle hit the deadline.
    TimedOut,
    /// The last cycle failed.
    Failed,
}

impl SearchState {
    /// Short lowercase name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::TimedOut => "timed_out",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
