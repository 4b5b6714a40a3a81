//! LRU cache for rewritten text

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Cache usage counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
    pub capacity: usize,
}

/// Bounded input -> output cache with least-recently-used eviction.
///
/// Lookups promote entries, so both `get` and `put` take the lock.
/// A capacity of zero disables caching.
pub struct TextCache {
    entries: Option<Mutex<lru::LruCache<String, String>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TextCache {
    /// Create a new cache with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(lru::LruCache::new(cap))),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn disabled() -> Self {
        Self::new(0)
    }

    fn lock(&self) -> Option<MutexGuard<'_, lru::LruCache<String, String>>> {
        self.entries
            .as_ref()
            .map(|m| m.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Look up rewritten text
    pub fn get(&self, input: &str) -> Option<String> {
        let found = self.lock().and_then(|mut cache| cache.get(input).cloned());
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Store rewritten text, evicting the least recently used entry when full
    pub fn put(&self, input: String, output: String) {
        if let Some(mut cache) = self.lock() {
            cache.put(input, output);
        }
    }

    pub fn contains(&self, input: &str) -> bool {
        self.lock().is_some_and(|cache| cache.contains(input))
    }

    /// Clear the cache
    pub fn clear(&self) {
        if let Some(mut cache) = self.lock() {
            cache.clear();
        }
    }

    /// Get cache size
    pub fn len(&self) -> usize {
        self.lock().map_or(0, |cache| cache.len())
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().map_or(0, |cache| cache.cap().get())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len: self.len(),
            capacity: self.capacity(),
        }
    }
}

impl std::fmt::Debug for TextCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextCache")
            .field("stats", &self.stats())
            .finish()
    }
}
