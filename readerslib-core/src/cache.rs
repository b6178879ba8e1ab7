//! Time-boxed snapshot of the last full catalog listing
//!
//! The cache is an offline fallback, not a performance cache: it is only
//! consulted before the first fetch or when a live fetch fails.

use crate::storage::{get_json, set_json, KeyValueStore, StorageResult, BOOKS_CACHE_KEY};
use crate::types::BookSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How long a cached listing stays usable, in milliseconds
pub const CACHE_EXPIRY_MS: i64 = 24 * 60 * 60 * 1000;

/// Persisted cache entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCacheEntry {
    pub books: Vec<BookSummary>,

    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl CatalogCacheEntry {
    /// Whether the entry is still inside the expiry window at `now`
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis()
            .checked_sub(self.timestamp)
            .is_some_and(|age| age < CACHE_EXPIRY_MS)
    }
}

#[derive(Clone)]
pub struct CatalogCache {
    store: Arc<dyn KeyValueStore>,
}

impl CatalogCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Cached books, or `None` if never written, unreadable or expired
    pub fn read(&self) -> Option<Vec<BookSummary>> {
        self.read_at(Utc::now())
    }

    /// Same as [`CatalogCache::read`] with an explicit clock
    pub fn read_at(&self, now: DateTime<Utc>) -> Option<Vec<BookSummary>> {
        let entry: CatalogCacheEntry = get_json(self.store.as_ref(), BOOKS_CACHE_KEY)?;
        if entry.is_fresh_at(now) {
            Some(entry.books)
        } else {
            tracing::debug!("Ignoring expired catalog cache from {}", entry.timestamp);
            None
        }
    }

    /// Replace the cache with `books`, stamped now
    pub fn write(&self, books: &[BookSummary]) -> StorageResult<()> {
        self.write_at(books, Utc::now())
    }

    /// Same as [`CatalogCache::write`] with an explicit timestamp
    pub fn write_at(&self, books: &[BookSummary], at: DateTime<Utc>) -> StorageResult<()> {
        let entry = CatalogCacheEntry {
            books: books.to_vec(),
            timestamp: at.timestamp_millis(),
        };
        set_json(self.store.as_ref(), BOOKS_CACHE_KEY, &entry).inspect_err(|e| {
            tracing::warn!("Failed to cache books: {}", e);
        })
    }
}
