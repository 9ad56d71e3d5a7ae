//! In-memory resolution cache.
//!
//! Entries expire a fixed TTL after insertion and are evicted lazily on
//! lookup. Keys are ASCII-lowercased, so `Example.COM` and `example.com`
//! share one entry.

use crate::dns::resolve::ResolutionResult;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Cached resolution for one domain.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub addresses: ResolutionResult,
    pub expires: Instant,
}

impl CacheEntry {
    pub fn new(addresses: ResolutionResult, ttl: Duration) -> Self {
        Self {
            addresses,
            expires: Instant::now() + ttl,
        }
    }

    /// An entry is stale from its expiration instant onwards.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    fn is_expired_at(&self, now: Instant) -> bool {
        self.expires <= now
    }
}

/// Thread-safe resolution cache.
///
/// A disabled cache never stores anything and always misses.
#[derive(Debug, Clone)]
pub struct HostCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    enabled: bool,
}

impl Default for HostCache {
    fn default() -> Self {
        Self::new(true)
    }
}

impl HostCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            enabled,
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn key(domain: &str) -> String {
        domain.to_ascii_lowercase()
    }

    /// Cached addresses for `domain`, or `None` on a miss. An expired entry
    /// is removed as part of the lookup.
    pub fn lookup(&self, domain: &str) -> Option<ResolutionResult> {
        if !self.enabled {
            return None;
        }

        let key = Self::key(domain);
        let now = Instant::now();
        {
            let entry = self.entries.get(&key)?;
            if !entry.is_expired_at(now) {
                return Some(entry.addresses.clone());
            }
        }

        // Re-check under the shard lock so a fresh insert racing with us survives.
        if self
            .entries
            .remove_if(&key, |_, entry| entry.is_expired_at(now))
            .is_some()
        {
            tracing::debug!(domain = %domain, "cache entry expired");
        }
        None
    }

    /// Store `addresses` for `domain`, replacing any previous entry.
    pub fn insert(&self, domain: &str, addresses: ResolutionResult, ttl: Duration) {
        if !self.enabled {
            return;
        }
        self.entries
            .insert(Self::key(domain), CacheEntry::new(addresses, ttl));
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Remove expired entries without waiting for a lookup to find them.
    /// Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        let now = Instant::now();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let count = before.saturating_sub(self.entries.len());
        if count > 0 {
            tracing::debug!(count, "purged expired cache entries");
        }
        count
    }

    /// Expiration instant of the entry for `domain`, expired or not.
    pub fn expires_at(&self, domain: &str) -> Option<Instant> {
        self.entries.get(&Self::key(domain)).map(|e| e.expires)
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
