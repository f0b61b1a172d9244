//! The search cycle state machine.
//!
//! ```text
//! Idle -> Pending -> {Succeeded, TimedOut, Failed} -> Idle
//! ```
//!
//! Input arrives through [`SearchOrchestrator::on_query_changed`]; every
//! finished cycle is reported exactly once through a [`ResultSink`]. Work
//! belonging to a superseded request is dropped before it touches the sink,
//! the cache or the state.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::api::EncyclopediaApi;
use crate::cache::{CacheKey, ResultCache};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{Language, Query, ResultView, SearchItem, SearchPayload, SearchState};

use super::debounce::{Debouncer, RequestTicket};
use super::ranker::rank;
use super::scoring::Scorer;
use super::suggest::SuggestionEngine;

/// Output port receiving one view per completed cycle.
pub trait ResultSink: Send + Sync + 'static {
    /// Deliver a view to the presentation layer.
    fn on_result(&self, view: ResultView);
}

impl ResultSink for UnboundedSender<ResultView> {
    fn on_result(&self, view: ResultView) {
        if self.send(view).is_err() {
            tracing::debug!("result receiver dropped, view discarded");
        }
    }
}

/// How a scheduled request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The query was empty; the display was reset.
    Cleared,
    /// A newer request arrived within the quiet window; nothing ran.
    Coalesced,
    /// The cycle ran but a newer request had started by the time it
    /// finished, so its result was discarded.
    Superseded,
    /// A view was delivered and the cycle ended in this state.
    Delivered(SearchState),
}

/// Handle to a request submitted through
/// [`SearchOrchestrator::on_query_changed`].
///
/// Dropping it does not cancel the request.
#[derive(Debug)]
pub struct ScheduledSearch {
    handle: Option<JoinHandle<Option<CycleOutcome>>>,
}

impl ScheduledSearch {
    /// Wait for the request to finish.
    pub async fn outcome(self) -> CycleOutcome {
        let Some(handle) = self.handle else {
            return CycleOutcome::Cleared;
        };
        match handle.await {
            Ok(Some(outcome)) => outcome,
            Ok(None) => CycleOutcome::Coalesced,
            Err(e) => {
                tracing::error!(error = %e, "search task did not complete");
                CycleOutcome::Delivered(SearchState::Failed)
            }
        }
    }
}

/// Debounced, cache-aware, timeout-bounded search over an [`EncyclopediaApi`].
///
/// Cheap to share: cycles run as spawned tasks holding an `Arc` of the
/// orchestrator's internals.
pub struct SearchOrchestrator<A, S> {
    inner: Arc<Inner<A, S>>,
    debouncer: Debouncer,
}

struct Inner<A, S> {
    api: A,
    sink: S,
    config: SearchConfig,
    scorer: Scorer,
    suggester: SuggestionEngine,
    cache: Mutex<ResultCache>,
    state: Mutex<SearchState>,
    last_outcome: Mutex<Option<SearchState>>,
}

impl<A, S> SearchOrchestrator<A, S>
where
    A: EncyclopediaApi + 'static,
    S: ResultSink,
{
    /// Create an orchestrator in the `Idle` state with an empty cache.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` fails validation.
    pub fn new(api: A, sink: S, config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let debouncer = Debouncer::new(config.debounce());
        let inner = Inner {
            scorer: Scorer::new(config.typo_tolerance),
            suggester: SuggestionEngine::new(config.fetch_limit, config.typo_tolerance),
            cache: Mutex::new(ResultCache::new(config.cache_capacity, config.cache_ttl())),
            state: Mutex::new(SearchState::Idle),
            last_outcome: Mutex::new(None),
            api,
            sink,
            config,
        };
        Ok(Self {
            inner: Arc::new(inner),
            debouncer,
        })
    }

    /// Input port: the query text changed.
    ///
    /// An empty or whitespace-only `text` supersedes pending work and emits
    /// [`ResultView::Cleared`] immediately. Anything else is debounced and
    /// then run as a full cycle.
    pub fn on_query_changed(&self, text: &str, language: &Language) -> ScheduledSearch {
        let Some(query) = Query::new(text, language.clone()) else {
            self.clear();
            return ScheduledSearch { handle: None };
        };

        let inner = Arc::clone(&self.inner);
        let handle = self
            .debouncer
            .schedule(move |ticket| async move { inner.run_cycle(query, ticket).await });
        ScheduledSearch {
            handle: Some(handle),
        }
    }

    /// Run a cycle for `text` right away, skipping the quiet window.
    ///
    /// Still supersedes, and can be superseded by, debounced requests.
    pub async fn search_now(&self, text: &str, language: &Language) -> CycleOutcome {
        let Some(query) = Query::new(text, language.clone()) else {
            self.clear();
            return CycleOutcome::Cleared;
        };
        let ticket = self.debouncer.issue();
        self.inner.run_cycle(query, ticket).await
    }

    /// Supersede pending work and reset the display.
    pub fn clear(&self) {
        self.debouncer.cancel_pending();
        self.inner.set_state(SearchState::Idle);
        tracing::debug!("query cleared");
        self.inner.sink.on_result(ResultView::Cleared);
    }

    /// Current state of the machine.
    pub fn state(&self) -> SearchState {
        *self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Terminal state of the most recent applied cycle, if any.
    pub fn last_outcome(&self) -> Option<SearchState> {
        *self.inner.last_outcome.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether a payload for `(language, text)` occupies a cache slot.
    pub fn is_cached(&self, language: &Language, text: &str) -> bool {
        self.inner
            .cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&CacheKey::new(language.clone(), text))
    }

    /// Number of occupied cache slots.
    pub fn cache_len(&self) -> usize {
        self.inner.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// The configuration in use.
    pub fn config(&self) -> &SearchConfig {
        &self.inner.config
    }
}

impl<A, S> Inner<A, S>
where
    A: EncyclopediaApi,
    S: ResultSink,
{
    async fn run_cycle(&self, query: Query, ticket: RequestTicket) -> CycleOutcome {
        self.set_state(SearchState::Pending);
        tracing::trace!(query = query.text(), language = %query.language(), "search cycle started");

        let started = Instant::now();
        let key = CacheKey::for_query(&query);
        let cached = self
            .cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_at(&key, started.into_std());

        let fetched = tokio::time::timeout(self.config.timeout(), self.fetch(&query, cached)).await;

        if !ticket.is_current() {
            tracing::debug!(ticket = ticket.id(), "discarding superseded response");
            return CycleOutcome::Superseded;
        }

        let text = query.text().to_owned();
        let (state, view) = match fetched {
            Err(_) => {
                tracing::warn!(timeout_secs = self.config.timeout_seconds, "search timed out");
                (SearchState::TimedOut, ResultView::TimedOut { query: text })
            }
            Ok((Err(e), _)) if e.is_timeout() => {
                tracing::warn!(error = %e, "request timed out");
                (SearchState::TimedOut, ResultView::TimedOut { query: text })
            }
            Ok((Err(e), _)) => {
                tracing::warn!(error = %e, "search failed");
                (SearchState::Failed, ResultView::Failed { query: text })
            }
            Ok((Ok(fetch), suggestions)) => {
                if fetch.fresh {
                    self.cache
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .put_at(key, Arc::clone(&fetch.payload), Instant::now().into_std());
                }
                let view = self.build_view(text, &fetch.payload, suggestions, started);
                (SearchState::Succeeded, view)
            }
        };

        self.finish(state);
        self.sink.on_result(view);
        CycleOutcome::Delivered(state)
    }

    /// Payload (cached or fetched) joined with the suggestion set.
    ///
    /// On a cache hit the suggestions are derived from the cached prefix
    /// titles, which come from the same endpoint with the same limit.
    async fn fetch(
        &self,
        query: &Query,
        cached: Option<Arc<SearchPayload>>,
    ) -> (Result<Fetched, SearchError>, Vec<String>) {
        if let Some(payload) = cached {
            tracing::debug!(language = %query.language(), "cache hit");
            let suggestions = self.suggester.filter(payload.titles.clone(), query.text());
            return (
                Ok(Fetched {
                    payload,
                    fresh: false,
                }),
                suggestions,
            );
        }

        tracing::debug!(language = %query.language(), "cache miss");
        let payload = async {
            fetch_payload(&self.api, query, self.config.fetch_limit)
                .await
                .map(|payload| Fetched {
                    payload: Arc::new(payload),
                    fresh: true,
                })
        };
        let suggestions = async {
            match self
                .suggester
                .suggest(&self.api, query.text(), query.language())
                .await
            {
                Ok(suggestions) => suggestions,
                Err(e) => {
                    tracing::warn!(error = %e, "suggestion fetch failed, continuing without");
                    Vec::new()
                }
            }
        };
        tokio::join!(payload, suggestions)
    }

    fn build_view(
        &self,
        query: String,
        payload: &SearchPayload,
        suggestions: Vec<String>,
        started: Instant,
    ) -> ResultView {
        let results = rank(payload, &query, &self.scorer, self.config.max_results);

        if results.is_empty() {
            return if suggestions.is_empty() {
                ResultView::Empty { query }
            } else {
                ResultView::Suggestions { query, suggestions }
            };
        }

        let exact_match = payload.is_exact_match(&query);
        let recommendation = if exact_match {
            None
        } else {
            self.suggester
                .recommend(&suggestions, &query)
                .map(|m| m.term)
        };

        ResultView::Results {
            query,
            results,
            timing_secs: started.elapsed().as_secs_f64(),
            exact_match,
            recommendation,
        }
    }

    fn set_state(&self, state: SearchState) {
        let mut current = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let previous = *current;
        if previous != state {
            tracing::debug!(from = %previous, to = %state, "state transition");
            *current = state;
        }
    }

    /// Record the terminal state and return to `Idle`.
    fn finish(&self, state: SearchState) {
        self.set_state(state);
        *self.last_outcome.lock().unwrap_or_else(|e| e.into_inner()) = Some(state);
        self.set_state(SearchState::Idle);
    }
}

struct Fetched {
    payload: Arc<SearchPayload>,
    /// Came from the network rather than the cache.
    fresh: bool,
}

/// Run the dependent fetch chain for `query` without touching any cache.
///
/// prefix search, then full-text search, then one batched extract lookup for
/// the union of both title lists. The extract call is skipped when there is
/// nothing to look up.
///
/// # Errors
///
/// Propagates the first API error.
pub async fn fetch_payload<A: EncyclopediaApi>(
    api: &A,
    query: &Query,
    limit: usize,
) -> Result<SearchPayload, SearchError> {
    let language = query.language();
    let titles = api.prefix_search(query.text(), language, limit).await?;
    let search_items = api.full_text_search(query.text(), language, limit).await?;

    let union = title_union(&titles, &search_items);
    let pages = if union.is_empty() {
        BTreeMap::new()
    } else {
        api.fetch_extracts(&union, language).await?
    };

    Ok(SearchPayload {
        search_items,
        pages,
        titles,
    })
}

/// Prefix titles followed by full-text titles, first occurrence kept.
fn title_union(titles: &[String], search_items: &[SearchItem]) -> Vec<String> {
    let mut seen = HashSet::new();
    titles
        .iter()
        .chain(search_items.iter().map(|item| &item.title))
        .filter(|&title| seen.insert(title.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::mpsc;

    use super::*;
    use crate::types::PageData;

    #[derive(Default)]
    struct FakeApi {
        titles: Vec<String>,
        items: Vec<String>,
        fail: bool,
        extract_calls: AtomicUsize,
    }

    impl EncyclopediaApi for FakeApi {
        async fn prefix_search(
            &self,
            _query: &str,
            _language: &Language,
            _limit: usize,
        ) -> Result<Vec<String>, SearchError> {
            if self.fail {
                return Err(SearchError::Network("down".into()));
            }
            Ok(self.titles.clone())
        }

        async fn full_text_search(
            &self,
            _query: &str,
            _language: &Language,
            _limit: usize,
        ) -> Result<Vec<SearchItem>, SearchError> {
            Ok(self
                .items
                .iter()
                .map(|t| SearchItem {
                    title: t.clone(),
                    snippet: None,
                })
                .collect())
        }

        async fn fetch_extracts(
            &self,
            titles: &[String],
            _language: &Language,
        ) -> Result<BTreeMap<i64, PageData>, SearchError> {
            self.extract_calls.fetch_add(1, Ordering::SeqCst);
            Ok(titles
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    (
                        i as i64 + 1,
                        PageData {
                            title: t.clone(),
                            extract: None,
                            missing: false,
                        },
                    )
                })
                .collect())
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    fn orchestrator(
        api: FakeApi,
    ) -> (
        SearchOrchestrator<FakeApi, UnboundedSender<ResultView>>,
        mpsc::UnboundedReceiver<ResultView>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let orch = SearchOrchestrator::new(api, tx, SearchConfig::default()).expect("valid config");
        (orch, rx)
    }

    #[test]
    fn title_union_keeps_first_seen_order() {
        let items: Vec<SearchItem> = ["B", "C", "A"]
            .iter()
            .map(|t| SearchItem {
                title: (*t).to_owned(),
                snippet: None,
            })
            .collect();
        assert_eq!(
            title_union(&strings(&["A", "B"]), &items),
            strings(&["A", "B", "C"])
        );
    }

    #[test]
    fn invalid_config_rejected() {
        let (tx, _rx) = mpsc::unbounded_channel::<ResultView>();
        let config = SearchConfig {
            max_results: 0,
            ..Default::default()
        };
        assert!(SearchOrchestrator::new(FakeApi::default(), tx, config).is_err());
    }

    #[tokio::test]
    async fn empty_fetch_skips_extract_call() {
        let api = FakeApi::default();
        let query = Query::new("nothing", Language::default()).expect("non-empty");
        let payload = fetch_payload(&api, &query, 15).await.expect("ok");
        assert!(payload.is_empty());
        assert_eq!(api.extract_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn whitespace_query_clears_without_network() {
        let (orch, mut rx) = orchestrator(FakeApi {
            fail: true,
            ..Default::default()
        });
        let outcome = orch.on_query_changed("   ", &Language::default()).outcome().await;
        assert_eq!(outcome, CycleOutcome::Cleared);
        assert_eq!(rx.try_recv().expect("view"), ResultView::Cleared);
        assert_eq!(orch.state(), SearchState::Idle);
        assert_eq!(orch.last_outcome(), None);
    }

    #[tokio::test]
    async fn search_now_delivers_results_and_returns_to_idle() {
        let (orch, mut rx) = orchestrator(FakeApi {
            titles: strings(&["Rust", "Rust Belt"]),
            ..Default::default()
        });
        let outcome = orch.search_now("rust", &Language::default()).await;
        assert_eq!(outcome, CycleOutcome::Delivered(SearchState::Succeeded));
        assert_eq!(orch.state(), SearchState::Idle);
        assert_eq!(orch.last_outcome(), Some(SearchState::Succeeded));

        match rx.try_recv().expect("view") {
            ResultView::Results {
                results,
                exact_match,
                recommendation,
                ..
            } => {
                assert_eq!(results[0].title, "Rust");
                assert!(exact_match);
                assert!(recommendation.is_none());
            }
            other => panic!("unexpected view: {other:?}"),
        }
        assert!(orch.is_cached(&Language::default(), "rust"));
    }

    #[tokio::test]
    async fn failure_reports_failed_and_caches_nothing() {
        let (orch, mut rx) = orchestrator(FakeApi {
            fail: true,
            ..Default::default()
        });
        let outcome = orch.search_now("rust", &Language::default()).await;
        assert_eq!(outcome, CycleOutcome::Delivered(SearchState::Failed));
        assert_eq!(
            rx.try_recv().expect("view"),
            ResultView::Failed {
                query: "rust".into()
            }
        );
        assert_eq!(orch.cache_len(), 0);
        assert_eq!(orch.state(), SearchState::Idle);
    }
}
