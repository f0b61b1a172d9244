//! Plain-text rendering of search views for the terminal.

use std::fmt::Write as _;

use wikifind_search::{CandidateResult, Language, ResultView, SearchConfig, article_url};

use crate::messages::Messages;
use crate::session::SuggestionCursor;

/// Longest extract shown per result, in characters.
const MAX_EXTRACT_CHARS: usize = 280;

/// Turns [`ResultView`]s into text.
#[derive(Debug, Clone)]
pub struct Presenter {
    config: SearchConfig,
}

impl Presenter {
    /// A presenter linking articles according to `config.article_base`.
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Render `view` for `language`. `cursor` supplies the suggestion
    /// highlight; pass `None` when there is nothing to highlight.
    pub fn render(
        &self,
        view: &ResultView,
        language: &Language,
        cursor: Option<&SuggestionCursor>,
    ) -> String {
        let messages = Messages::for_language(language);
        let mut out = String::new();

        match view {
            ResultView::Results {
                query,
                results,
                timing_secs,
                exact_match,
                recommendation,
            } => {
                let _ = writeln!(
                    out,
                    "{}",
                    messages.results_header(query, *timing_secs, *exact_match)
                );
                if let Some(term) = recommendation {
                    let _ = writeln!(out, "{}", messages.recommend(term));
                }
                for (i, result) in results.iter().enumerate() {
                    out.push('\n');
                    self.render_result(&mut out, i + 1, result, language, &messages);
                }
            }
            ResultView::Suggestions { suggestions, .. } => {
                let _ = writeln!(out, "{}", messages.suggestions_heading());
                let highlighted = cursor.and_then(SuggestionCursor::index);
                for (i, suggestion) in suggestions.iter().enumerate() {
                    let marker = if highlighted == Some(i) { '>' } else { ' ' };
                    let _ = writeln!(out, "{marker} {}. {suggestion}", i + 1);
                }
            }
            ResultView::Empty { .. } => {
                let _ = writeln!(out, "{}", messages.no_results());
            }
            ResultView::TimedOut { .. } => {
                let _ = writeln!(out, "{}", messages.timeout_warning());
                let _ = writeln!(out, "{}", messages.failed_search());
            }
            ResultView::Failed { .. } => {
                let _ = writeln!(out, "{}", messages.failed_search());
            }
            ResultView::Cleared => {}
        }
        out
    }

    fn render_result(
        &self,
        out: &mut String,
        position: usize,
        result: &CandidateResult,
        language: &Language,
        messages: &Messages,
    ) {
        let _ = writeln!(out, "{position}. {}", result.title);
        let extract = result
            .extract
            .as_deref()
            .map_or_else(|| messages.no_results().to_owned(), truncate);
        let _ = writeln!(out, "   {extract}");
        if let Some(url) = article_url(&self.config, language, &result.title) {
            let _ = writeln!(out, "   {url}");
        }
    }
}

/// Shorten `text` to [`MAX_EXTRACT_CHARS`] characters, ending in an ellipsis
/// when cut.
fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_EXTRACT_CHARS) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_owned(),
    }
}
