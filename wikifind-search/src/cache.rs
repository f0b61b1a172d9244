//! In-memory FIFO cache for raw search payloads.
//!
//! Caches the payload fetched for a (language, query) pair. Entries older
//! than the TTL are treated as misses but keep their slot; once the cache
//! grows past its capacity the oldest *inserted* entry is evicted, whether
//! it is stale or not.
//!
//! The cache itself is not synchronised. The orchestrator owns one behind a
//! mutex and only writes to it after a successful, current fetch.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::types::{Language, Query, SearchPayload};

/// Composite cache key: language + trimmed query text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    language: Language,
    /// Trimmed query text, case preserved.
    query: String,
}

impl CacheKey {
    /// Build a cache key from a language and raw query text.
    pub fn new(language: Language, query: &str) -> Self {
        Self {
            language,
            query: query.trim().to_owned(),
        }
    }

    /// The key identifying `query`.
    pub fn for_query(query: &Query) -> Self {
        Self::new(query.language().clone(), query.text())
    }

    /// The language component.
    pub fn language(&self) -> &Language {
        &self.language
    }

    /// The query component.
    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Debug)]
struct CacheEntry {
    payload: Arc<SearchPayload>,
    inserted_at: Instant,
}

/// Size- and age-bounded payload cache with insertion-order eviction.
#[derive(Debug)]
pub struct ResultCache {
    capacity: usize,
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
    /// Keys in insertion order, oldest first.
    order: VecDeque<CacheKey>,
}

impl ResultCache {
    /// Create an empty cache holding at most `capacity` entries, each fresh
    /// for `ttl`.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            entries: HashMap::with_capacity(capacity.saturating_add(1)),
            order: VecDeque::with_capacity(capacity.saturating_add(1)),
        }
    }

    /// Look up a fresh payload for `key`.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<SearchPayload>> {
        self.get_at(key, Instant::now())
    }

    /// Look up a payload for `key` as of `now`. Stale entries are misses.
    pub fn get_at(&self, key: &CacheKey, now: Instant) -> Option<Arc<SearchPayload>> {
        let entry = self.entries.get(key)?;
        let age = now.saturating_duration_since(entry.inserted_at);
        if age >= self.ttl {
            tracing::debug!(language = %key.language, age_secs = age.as_secs(), "cache entry stale");
            return None;
        }
        Some(Arc::clone(&entry.payload))
    }

    /// Store `payload` for `key`, timestamped now.
    pub fn put(&mut self, key: CacheKey, payload: Arc<SearchPayload>) {
        self.put_at(key, payload, Instant::now());
    }

    /// Store `payload` for `key` with an explicit timestamp.
    ///
    /// Replacing an existing key refreshes its payload and timestamp but
    /// keeps its position in the eviction order. A new key that pushes the
    /// cache past capacity evicts exactly one entry, the oldest inserted.
    pub fn put_at(&mut self, key: CacheKey, payload: Arc<SearchPayload>, now: Instant) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.payload = payload;
            entry.inserted_at = now;
            return;
        }

        self.order.push_back(key.clone());
        self.entries.insert(
            key,
            CacheEntry {
                payload,
                inserted_at: now,
            },
        );

        if self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                tracing::debug!(language = %oldest.language, "evicted oldest cache entry");
            }
        }
    }

    /// Whether `key` physically occupies a slot, fresh or stale.
    pub fn contains_key(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of occupied slots, including stale entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no slots are occupied.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SearchItem;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn key(query: &str) -> CacheKey {
        CacheKey::new(Language::default(), query)
    }

    fn payload(title: &str) -> Arc<SearchPayload> {
        Arc::new(SearchPayload {
            titles: vec![title.to_owned()],
            search_items: vec![SearchItem {
                title: title.to_owned(),
                snippet: None,
            }],
            ..Default::default()
        })
    }

    #[test]
    fn cache_key_trims_whitespace() {
        assert_eq!(key("  rust  "), key("rust"));
    }

    #[test]
    fn cache_key_preserves_case() {
        assert_ne!(key("Rust"), key("rust"));
    }

    #[test]
    fn cache_key_differs_by_language() {
        let en = CacheKey::new(Language::default(), "java");
        let id = CacheKey::new(Language::new("id").expect("valid"), "java");
        assert_ne!(en, id);
    }

    #[test]
    fn cache_key_has_no_delimiter_collisions() {
        // A flat "lang:query" string would make these two collide.
        let a = CacheKey::new(Language::new("en").expect("valid"), "id:x");
        let b = CacheKey::new(Language::new("id").expect("valid"), "x");
        assert_ne!(a, b);
    }

    #[test]
    fn cache_miss_returns_none() {
        let cache = ResultCache::new(100, DAY);
        assert!(cache.get(&key("nothing")).is_none());
    }

    #[test]
    fn cache_insert_and_retrieve() {
        let mut cache = ResultCache::new(100, DAY);
        cache.put(key("einstein"), payload("Albert Einstein"));
        let cached = cache.get(&key("einstein")).expect("should be cached");
        assert_eq!(cached.titles, vec!["Albert Einstein".to_owned()]);
    }

    #[test]
    fn overwrite_same_key_updates_value_without_duplicate() {
        let mut cache = ResultCache::new(100, DAY);
        cache.put(key("q"), payload("Old"));
        cache.put(key("q"), payload("New"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key("q")).expect("cached").titles[0], "New");
    }

    #[test]
    fn stale_entry_is_a_miss_but_keeps_its_slot() {
        let mut cache = ResultCache::new(100, DAY);
        let t0 = Instant::now();
        cache.put_at(key("q"), payload("A"), t0);

        assert!(cache.get_at(&key("q"), t0 + DAY - Duration::from_secs(1)).is_some());
        assert!(cache.get_at(&key("q"), t0 + DAY).is_none());
        assert!(cache.contains_key(&key("q")));
        assert_eq!(cache.len(), 1);

        // Refreshing the stale key reuses the slot rather than duplicating it.
        cache.put_at(key("q"), payload("B"), t0 + DAY);
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get_at(&key("q"), t0 + DAY).expect("fresh again").titles[0],
            "B"
        );
    }

    #[test]
    fn inserting_past_capacity_evicts_oldest_inserted() {
        let mut cache = ResultCache::new(100, DAY);
        for i in 0..100 {
            cache.put(key(&format!("q{i}")), payload("x"));
        }
        assert_eq!(cache.len(), 100);

        cache.put(key("q100"), payload("x"));
        assert_eq!(cache.len(), 100);
        assert!(!cache.contains_key(&key("q0")));
        for i in 1..=100 {
            assert!(cache.contains_key(&key(&format!("q{i}"))), "q{i} evicted");
        }
    }

    #[test]
    fn overwrite_does_not_move_entry_to_back() {
        let mut cache = ResultCache::new(2, DAY);
        cache.put(key("a"), payload("a"));
        cache.put(key("b"), payload("b"));
        cache.put(key("a"), payload("a2"));
        cache.put(key("c"), payload("c"));
        assert!(!cache.contains_key(&key("a")));
        assert!(cache.contains_key(&key("b")));
        assert!(cache.contains_key(&key("c")));
    }

    #[test]
    fn stale_entries_are_evicted_in_order_too() {
        let mut cache = ResultCache::new(2, DAY);
        let t0 = Instant::now();
        cache.put_at(key("old"), payload("old"), t0);
        cache.put_at(key("mid"), payload("mid"), t0 + DAY);
        cache.put_at(key("new"), payload("new"), t0 + DAY);
        assert!(!cache.contains_key(&key("old")));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn clear_empties_cache() {
        let mut cache = ResultCache::new(10, DAY);
        cache.put(key("a"), payload("a"));
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&key("a")).is_none());
        assert_eq!(cache.capacity(), 10);
    }
}
