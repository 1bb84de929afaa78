//! In-process response caching.
//!
//! # Responsibilities
//! - Store successful responses keyed by the exact inbound request
//! - Replay hits with their original status, headers and body
//! - Expire entries after the configured edge TTL
//!
//! # Design Decisions
//! - DashMap for lock-free concurrent access; no cross-request
//!   coordination beyond the map itself
//! - Writes are best-effort: at capacity the write is skipped, never
//!   an error
//! - Expired entries are removed lazily on lookup and swept when the
//!   map is full

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::observability::metrics;

/// A cached response ready for replay.
#[derive(Debug, Clone)]
pub struct CachedEntry {
    pub status: u16,
    /// Header name/value pairs captured from the original response.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    stored_at: Instant,
}

impl CachedEntry {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
            stored_at: Instant::now(),
        }
    }
}

/// A thread-safe response cache with TTL and a capacity cap.
#[derive(Clone)]
pub struct ResponseCache {
    inner: Arc<DashMap<String, CachedEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl ResponseCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
            max_entries,
        }
    }

    /// Cache key for an inbound request.
    pub fn key(method: &str, path: &str) -> String {
        format!("{} {}", method, path)
    }

    /// Look up a fresh entry; expired entries are evicted on the spot.
    pub fn lookup(&self, key: &str) -> Option<CachedEntry> {
        let entry = self.inner.get(key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            drop(entry);
            self.inner.remove(key);
            metrics::record_cache_size(self.inner.len());
            return None;
        }
        Some(entry.clone())
    }

    /// Store an entry, best-effort.
    ///
    /// When the cache is full, expired entries are swept first; if it
    /// is still full the write is dropped (replacing an existing key
    /// is always allowed).
    pub fn store(&self, key: String, entry: CachedEntry) {
        if self.inner.len() >= self.max_entries && !self.inner.contains_key(&key) {
            self.sweep_expired();
            if self.inner.len() >= self.max_entries {
                tracing::debug!(key = %key, "Response cache full, skipping write");
                return;
            }
        }
        self.inner.insert(key, entry);
        metrics::record_cache_size(self.inner.len());
    }

    /// Number of live entries (expired-but-unswept included).
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn sweep_expired(&self) {
        let ttl = self.ttl;
        self.inner.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        metrics::record_cache_size(self.inner.len());
    }
}
