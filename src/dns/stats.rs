//! Resolver counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters updated by the resolver on every call.
#[derive(Debug, Default)]
pub struct ResolverStats {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    primary_failures: AtomicU64,
    fallback_successes: AtomicU64,
    resolution_failures: AtomicU64,
}

/// Point-in-time copy of [`ResolverStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStatsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub primary_failures: u64,
    pub fallback_successes: u64,
    pub resolution_failures: u64,
}

impl ResolverStats {
    pub(crate) fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_primary_failure(&self) {
        self.primary_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fallback_success(&self) {
        self.fallback_successes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_resolution_failure(&self) {
        self.resolution_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ResolverStatsSnapshot {
        ResolverStatsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            primary_failures: self.primary_failures.load(Ordering::Relaxed),
            fallback_successes: self.fallback_successes.load(Ordering::Relaxed),
            resolution_failures: self.resolution_failures.load(Ordering::Relaxed),
        }
    }
}

impl ResolverStatsSnapshot {
    /// Fraction of cache lookups that hit, or 0.0 before any lookup.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = ResolverStats::default();
        stats.record_cache_hit();
        stats.record_cache_hit();
        stats.record_cache_miss();
        stats.record_primary_failure();

        let snap = stats.snapshot();
        assert_eq!(snap.cache_hits, 2);
        assert_eq!(snap.cache_misses, 1);
        assert_eq!(snap.primary_failures, 1);
        assert_eq!(snap.fallback_successes, 0);
        assert!((snap.hit_ratio() - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_ratio_empty() {
        assert_eq!(ResolverStatsSnapshot::default().hit_ratio(), 0.0);
    }
}
