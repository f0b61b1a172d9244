//! Search orchestrator: debouncing, cache-aware fetching, ranking and
//! suggestions.
//!
//! A cycle fetches prefix titles, full-text hits and lead extracts for a
//! query, scores and ranks them, computes typo-tolerant suggestions and
//! hands one view to the presentation layer.

pub mod debounce;
pub mod pipeline;
pub mod ranker;
pub mod scoring;
pub mod suggest;
