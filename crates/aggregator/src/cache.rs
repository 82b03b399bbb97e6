//! Time-expiring key-value cache.
//!
//! Backed by `DashMap` so concurrent lookups never contend on a single
//! lock. Expiry is lazy: a stale entry
//! reads as a miss but stays in the map until the next write replaces it.
//! Writes are whole-value replacements, so readers never observe a
//! partially updated entry.

use std::time::{Duration, Instant};

use dashmap::DashMap;

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
}

/// String-keyed TTL cache. Keys are built by the aggregator
/// (`"resorts:" + query`, `"resort:" + id`, or the literal `"countries"`).
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    entries: DashMap<String, CacheEntry<T>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    /// The cached value, or `None` on a miss or once
    /// `now - stored_at >= ttl`. Stale entries are left in place; the
    /// next `set` for the key overwrites them.
    pub fn get(&self, key: &str) -> Option<T> {
        let entry = self.entries.get(key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Store a value, replacing any previous entry wholesale.
    pub fn set(&self, key: &str, value: T) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Number of entries currently held, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
