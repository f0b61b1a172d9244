//! MediaWiki action API client (Wikipedia).
//!
//! Issues the three calls a search cycle needs against
//! `https://{lang}.wikipedia.org/w/api.php`:
//!
//! - `action=opensearch` for the fast title-prefix list
//! - `action=query&list=search` for full-text results with snippets
//! - `action=query&prop=extracts` for plain-text lead extracts, batched by title
//!
//! Response parsing lives in standalone functions so it can be tested
//! against captured JSON without a server.

use std::collections::BTreeMap;

use scraper::Html;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use url::Url;

use crate::api::EncyclopediaApi;
use crate::config::{SearchConfig, LANGUAGE_PLACEHOLDER};
use crate::error::SearchError;
use crate::http;
use crate::types::{Language, PageData, SearchItem};

/// TextExtracts returns at most this many intro extracts per request.
const MAX_TITLES_PER_REQUEST: usize = 20;

/// HTTP client for one MediaWiki installation family.
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    client: reqwest::Client,
    api_endpoint: String,
}

impl WikipediaClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid, or
    /// [`SearchError::Network`] if the HTTP client cannot be constructed.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            client: http::build_client(config)?,
            api_endpoint: config.api_endpoint.clone(),
        })
    }

    fn endpoint(&self, language: &Language, params: &[(&str, &str)]) -> Result<Url, SearchError> {
        let base = self
            .api_endpoint
            .replace(LANGUAGE_PLACEHOLDER, language.as_str());
        Url::parse_with_params(&base, params)
            .map_err(|e| SearchError::Config(format!("invalid api_endpoint {base:?}: {e}")))
    }

    /// GET `params` against the API for `language` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        language: &Language,
        params: &[(&str, &str)],
    ) -> Result<T, SearchError> {
        let url = self.endpoint(language, params)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout(format!("request timed out: {e}"))
                } else {
                    SearchError::Network(format!("request failed: {e}"))
                }
            })?
            .error_for_status()
            .map_err(|e| SearchError::Network(format!("HTTP error: {e}")))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| SearchError::Network(format!("response read failed: {e}")))?;

        tracing::trace!(bytes = body.len(), "API response received");

        serde_json::from_slice(&body)
            .map_err(|e| SearchError::MalformedResponse(format!("invalid JSON: {e}")))
    }
}

impl EncyclopediaApi for WikipediaClient {
    async fn prefix_search(
        &self,
        query: &str,
        language: &Language,
        limit: usize,
    ) -> Result<Vec<String>, SearchError> {
        tracing::trace!(query, %language, "prefix search");
        let limit = limit.to_string();
        let body: serde_json::Value = self
            .get_json(
                language,
                &[
                    ("action", "opensearch"),
                    ("search", query),
                    ("limit", limit.as_str()),
                    ("namespace", "0"),
                    ("format", "json"),
                ],
            )
            .await?;
        parse_opensearch(&body)
    }

    async fn full_text_search(
        &self,
        query: &str,
        language: &Language,
        limit: usize,
    ) -> Result<Vec<SearchItem>, SearchError> {
        tracing::trace!(query, %language, "full-text search");
        let limit = limit.to_string();
        let body: QueryResponse<SearchQuery> = self
            .get_json(
                language,
                &[
                    ("action", "query"),
                    ("list", "search"),
                    ("srsearch", query),
                    ("srlimit", limit.as_str()),
                    ("format", "json"),
                ],
            )
            .await?;
        parse_full_text(body)
    }

    async fn fetch_extracts(
        &self,
        titles: &[String],
        language: &Language,
    ) -> Result<BTreeMap<i64, PageData>, SearchError> {
        let mut pages = BTreeMap::new();
        for batch in titles.chunks(MAX_TITLES_PER_REQUEST) {
            let joined = batch.join("|");
            tracing::trace!(count = batch.len(), %language, "fetching extracts");
            let body: QueryResponse<PagesQuery> = self
                .get_json(
                    language,
                    &[
                        ("action", "query"),
                        ("prop", "extracts"),
                        ("exintro", "1"),
                        ("explaintext", "1"),
                        ("exlimit", "max"),
                        ("titles", joined.as_str()),
                        ("format", "json"),
                    ],
                )
                .await?;
            pages.extend(parse_extracts(body)?);
        }
        Ok(pages)
    }
}

/// Link to the article `title` on the `language` wiki.
///
/// Returns `None` if `article_base` is not a valid base URL.
pub fn article_url(config: &SearchConfig, language: &Language, title: &str) -> Option<String> {
    let base = config
        .article_base
        .replace(LANGUAGE_PLACEHOLDER, language.as_str());
    let mut url = Url::parse(&base).ok()?;
    url.path_segments_mut().ok()?.pop_if_empty().push(title);
    Some(url.into())
}

// ── Wire format ─────────────────────────────────────────────────────────────

/// Envelope of every `action=query` response.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse<T> {
    query: Option<T>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    search: Vec<WireSearchItem>,
}

#[derive(Debug, Deserialize)]
struct WireSearchItem {
    title: String,
    #[serde(default)]
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PagesQuery {
    #[serde(default)]
    pages: BTreeMap<i64, WirePage>,
}

#[derive(Debug, Deserialize)]
struct WirePage {
    #[serde(default)]
    title: String,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    missing: Option<IgnoredAny>,
    #[serde(default)]
    invalid: Option<IgnoredAny>,
}

impl<T> QueryResponse<T> {
    fn into_query(self, what: &str) -> Result<T, SearchError> {
        if let Some(err) = self.error {
            return Err(SearchError::Network(format!(
                "API error {}: {}",
                err.code, err.info
            )));
        }
        self.query
            .ok_or_else(|| SearchError::MalformedResponse(format!("{what}: missing `query` object")))
    }
}

/// Parse an opensearch response: `[query, [titles...], [descriptions...], [urls...]]`.
pub(crate) fn parse_opensearch(body: &serde_json::Value) -> Result<Vec<String>, SearchError> {
    let titles = body
        .as_array()
        .and_then(|parts| parts.get(1))
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| {
            SearchError::MalformedResponse("opensearch: expected [query, [titles], ...]".into())
        })?;

    titles
        .iter()
        .map(|title| {
            title.as_str().map(str::to_owned).ok_or_else(|| {
                SearchError::MalformedResponse("opensearch: non-string title".into())
            })
        })
        .collect()
}

pub(crate) fn parse_full_text(
    body: QueryResponse<SearchQuery>,
) -> Result<Vec<SearchItem>, SearchError> {
    let query = body.into_query("full-text search")?;
    Ok(query
        .search
        .into_iter()
        .map(|item| SearchItem {
            title: item.title,
            snippet: item.snippet.as_deref().and_then(snippet_to_text),
        })
        .collect())
}

pub(crate) fn parse_extracts(
    body: QueryResponse<PagesQuery>,
) -> Result<BTreeMap<i64, PageData>, SearchError> {
    let query = body.into_query("extracts")?;
    Ok(query
        .pages
        .into_iter()
        .map(|(id, page)| {
            let missing = page.missing.is_some() || page.invalid.is_some();
            let extract = page.extract.filter(|e| !e.trim().is_empty());
            (
                id,
                PageData {
                    title: page.title,
                    extract,
                    missing,
                },
            )
        })
        .collect())
}

/// Strip the highlight markup the search endpoint wraps around matches.
fn snippet_to_text(html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}
