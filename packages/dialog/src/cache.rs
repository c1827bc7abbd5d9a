use crate::history::HistoryEntry;
use crate::trigger::FragmentSource;
use std::collections::HashMap;

/// Composite key identifying one cached rendered fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: String,
    pub target: String,
}

impl CacheKey {
    pub fn new(source: &FragmentSource, target: &str) -> Self {
        Self {
            source: source.cache_source().to_string(),
            target: target.to_string(),
        }
    }

    pub fn from_entry(entry: &HistoryEntry) -> Self {
        Self::new(&entry.source, &entry.target)
    }
}

/// Memoized rendered fragments. Pure lookup table: no capacity bound, no
/// expiry, no invalidation. A fragment's rendering is assumed immutable for
/// the session, so a remote source that changes after first fetch serves
/// stale content until restart.
#[derive(Debug, Default)]
pub struct FragmentCache {
    entries: HashMap<CacheKey, String>,
}

impl FragmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: CacheKey, rendered: String) {
        self.entries.insert(key, rendered);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
