//! Relevance scoring for a (title, description, query) triple.
//!
//! Scores are additive integers; higher is more relevant. All comparisons
//! are case-insensitive.
//!
//! | Rule | Condition | Points |
//! |------|-----------|--------|
//! | 1 | title equals query | 2000, nothing else applies |
//! | 2 | edit distance `d` <= tolerance | `1500 - 200 * d` |
//! | 3 | title starts with query | 1000 |
//! | 4 | title contains query | 500 |
//! | 5 | description contains query | 200 |
//! | 6 | per query word found inside some title word | 100 each |
//!
//! Rules 2-6 are independent and can all fire for the same title. In rule 6
//! every query word is counted at most once, however many title words
//! contain it.

use crate::distance::distance;

/// Default maximum edit distance treated as a typo.
pub const DEFAULT_TYPO_TOLERANCE: usize = 2;

/// Score of an exact (case-insensitive) title match.
pub const EXACT_MATCH_SCORE: i64 = 2000;

const TYPO_BASE: i64 = 1500;
const TYPO_PENALTY_PER_EDIT: i64 = 200;
const PREFIX_BONUS: i64 = 1000;
const TITLE_CONTAINS_BONUS: i64 = 500;
const DESCRIPTION_CONTAINS_BONUS: i64 = 200;
const WORD_MATCH_BONUS: i64 = 100;

/// Relevance scorer with a configurable typo tolerance.
#[derive(Debug, Clone, Copy)]
pub struct Scorer {
    typo_tolerance: usize,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(DEFAULT_TYPO_TOLERANCE)
    }
}

impl Scorer {
    /// Create a scorer that treats titles within `typo_tolerance` edits as typos.
    pub fn new(typo_tolerance: usize) -> Self {
        Self { typo_tolerance }
    }

    /// Score `title` (with optional `description`) against `query`.
    pub fn score(&self, title: &str, description: Option<&str>, query: &str) -> i64 {
        let title = title.to_lowercase();
        let query = query.to_lowercase();

        if title == query {
            return EXACT_MATCH_SCORE;
        }

        let mut score = 0;

        let edits = distance(&title, &query);
        if edits <= self.typo_tolerance {
            score += TYPO_BASE - TYPO_PENALTY_PER_EDIT * edits as i64;
        }
        if title.starts_with(&query) {
            score += PREFIX_BONUS;
        }
        if title.contains(&query) {
            score += TITLE_CONTAINS_BONUS;
        }
        if description.unwrap_or("").to_lowercase().contains(&query) {
            score += DESCRIPTION_CONTAINS_BONUS;
        }

        score + WORD_MATCH_BONUS * matched_words(&title, &query) as i64
    }
}

/// Score with the default typo tolerance.
pub fn score(title: &str, description: Option<&str>, query: &str) -> i64 {
    Scorer::default().score(title, description, query)
}

/// Number of query words that occur inside at least one title word.
/// Both inputs are expected lowercased.
fn matched_words(title: &str, query: &str) -> usize {
    let title_words: Vec<&str> = title.split_whitespace().collect();
    query
        .split_whitespace()
        .filter(|qw| title_words.iter().any(|tw| tw.contains(qw)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_short_circuits() {
        assert_eq!(score("Albert Einstein", None, "albert einstein"), 2000);
        assert_eq!(
            score("Albert Einstein", Some("physicist albert einstein"), "ALBERT EINSTEIN"),
            2000
        );
    }

    #[test]
    fn exact_match_ignores_description() {
        let with = score("Rust", Some("rust rust rust"), "rust");
        let without = score("Rust", None, "rust");
        assert_eq!(with, without);
        assert_eq!(with, EXACT_MATCH_SCORE);
    }

    #[test]
    fn typo_within_tolerance() {
        // d = 2: 1500 - 400 = 1100; no prefix/contains; words "albrt"/"einsten"
        // are not substrings of "albert"/"einstein".
        assert_eq!(score("Albert Einstein", None, "Albrt Einsten"), 1100);
    }

    #[test]
    fn typo_outside_tolerance_scores_nothing_for_rule_two() {
        assert_eq!(score("Mathematics", None, "physics"), 0);
    }

    #[test]
    fn prefix_contains_and_words_accumulate() {
        // "Rust (programming language)" vs "rust":
        // prefix 1000 + contains 500 + word "rust" 100; distance far above 2.
        assert_eq!(score("Rust (programming language)", None, "rust"), 1600);
    }

    #[test]
    fn description_match_adds_two_hundred() {
        let base = score("Ferris", None, "crab");
        let with_desc = score("Ferris", Some("The Rust mascot is a CRAB."), "crab");
        assert_eq!(with_desc - base, 200);
    }

    #[test]
    fn contains_without_prefix() {
        // contains 500 + word "einstein" 100.
        assert_eq!(score("Hans Albert Einstein", None, "einstein"), 600);
    }

    #[test]
    fn each_query_word_counts_once() {
        // "new" is inside both "newark," and "new", but counts once.
        assert_eq!(matched_words("new york newark", "new york"), 2);
        assert_eq!(score("Newark, New Jersey", None, "jersey new"), 200);
    }

    #[test]
    fn repeated_query_words_count_per_occurrence() {
        assert_eq!(matched_words("paris", "paris paris"), 2);
    }

    #[test]
    fn single_edit_scores_higher_than_two() {
        assert_eq!(score("Einstein", None, "einstei"), 1300 + 1000 + 500 + 100);
        // A swapped pair is two substitutions.
        assert_eq!(score("Einstein", None, "einstien"), 1100);
    }

    #[test]
    fn near_prefix_title_outranks_exact_match() {
        let exact = score("Topic 1", None, "topic 1");
        let longer = score("Topic 10", None, "topic 1");
        assert_eq!(exact, EXACT_MATCH_SCORE);
        assert_eq!(longer, 1300 + 1000 + 500 + 200);
        assert!(longer > exact);
    }

    #[test]
    fn custom_tolerance_disables_typo_rule() {
        let strict = Scorer::new(0);
        assert_eq!(strict.score("Einstein", None, "einstien"), 0);
    }
}
