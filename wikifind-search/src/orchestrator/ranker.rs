//! Merge, deduplicate, score and sort the two result lists.
//!
//! The prefix endpoint and the full-text endpoint return overlapping but
//! different title sets, each in its own relevance order. Prefix titles are
//! processed first, so when a title appears in both lists the prefix
//! occurrence wins and ties keep prefix order.

use std::collections::BTreeMap;

use crate::types::{CandidateResult, PageData, SearchItem, SearchPayload};

use super::scoring::Scorer;

/// Default cap on the number of ranked results.
pub const DEFAULT_MAX_RESULTS: usize = 15;

/// Rank `payload` against `query`, keeping at most `max_results` entries.
pub fn rank(
    payload: &SearchPayload,
    query: &str,
    scorer: &Scorer,
    max_results: usize,
) -> Vec<CandidateResult> {
    rank_lists(
        &payload.search_items,
        &payload.pages,
        &payload.titles,
        query,
        scorer,
        max_results,
    )
}

/// Rank the raw lists of a payload.
///
/// # Pipeline
///
/// 1. Every prefix title with a present, non-missing page is scored and appended
/// 2. Every full-text item whose title is not already present (ignoring case)
///    is looked up, scored and appended the same way
/// 3. Stable sort by descending score, so equal scores keep discovery order
/// 4. Truncate to `max_results`
pub fn rank_lists(
    search_items: &[SearchItem],
    pages: &BTreeMap<i64, PageData>,
    titles: &[String],
    query: &str,
    scorer: &Scorer,
    max_results: usize,
) -> Vec<CandidateResult> {
    let mut results: Vec<CandidateResult> = Vec::with_capacity(titles.len() + search_items.len());

    for title in titles {
        results.extend(score_page(pages, title, query, scorer));
    }

    for item in search_items {
        let lower = item.title.to_lowercase();
        if !results.iter().any(|r| r.title.to_lowercase() == lower) {
            results.extend(score_page(pages, &item.title, query, scorer));
        }
    }

    // `sort_by` is stable.
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results.truncate(max_results);

    tracing::debug!(count = results.len(), "ranked results");
    results
}

/// Score the page titled exactly `title`, unless it is absent or missing.
fn score_page(
    pages: &BTreeMap<i64, PageData>,
    title: &str,
    query: &str,
    scorer: &Scorer,
) -> Option<CandidateResult> {
    let page = pages
        .values()
        .find(|page| page.title == title)
        .filter(|page| !page.missing)?;
    Some(CandidateResult {
        title: title.to_owned(),
        extract: page.extract.clone(),
        score: scorer.score(title, page.extract.as_deref(), query),
    })
}
