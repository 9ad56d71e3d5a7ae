//! DoH resolver with caching and primary/fallback failover.
//!
//! Each call to [`DohResolver::resolve`] runs a small state machine:
//!
//! ```text
//! CheckCache ──hit──────────────────────────────► Done(Ok)
//!     │ miss
//!     ▼
//! QueryPrimary ──ok──► StoreResult ──► Done(Ok)
//!     │ err/empty            ▲
//!     ▼                      │ ok
//! QueryFallback ─────────────┘
//!     │ err/empty
//!     ▼
//! Done(NameNotResolvedFor)
//! ```
//!
//! The primary is always attempted before the fallback. There is no
//! deadline across both attempts, so a call can take up to twice the
//! configured query timeout.

use crate::base::neterror::NetError;
use crate::dns::cache::HostCache;
use crate::dns::config::ResolverConfig;
use crate::dns::doh::DohClient;
use crate::dns::provider::Provider;
use crate::dns::resolve::{Name, Resolve, ResolutionResult, Resolving};
use crate::dns::stats::{ResolverStats, ResolverStatsSnapshot};
use crate::dns::transport::{DohTransport, HttpsTransport};
use std::sync::Arc;

/// Internal state machine states.
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    CheckCache,
    QueryPrimary,
    QueryFallback,
    StoreResult {
        provider: Provider,
        result: ResolutionResult,
    },
}

struct Inner {
    config: ResolverConfig,
    client: DohClient,
    cache: HostCache,
    stats: ResolverStats,
}

/// Resolves domains over DoH.
///
/// Cheap to clone; clones share the cache and counters.
///
/// # Example
///
/// ```rust,ignore
/// use dohbypass::dns::{DohResolver, ResolverConfig};
///
/// let resolver = DohResolver::new(ResolverConfig::default());
/// let addrs = resolver.resolve("example.com").await?;
/// println!("{}", addrs.first());
/// ```
#[derive(Clone)]
pub struct DohResolver {
    inner: Arc<Inner>,
}

impl DohResolver {
    /// Creates a resolver that talks to providers over HTTPS.
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpsTransport::new()))
    }

    /// Creates a resolver that sends its queries through `transport`.
    pub fn with_transport(config: ResolverConfig, transport: Arc<dyn DohTransport>) -> Self {
        let cache = HostCache::new(config.cache_enabled);
        Self {
            inner: Arc::new(Inner {
                config,
                client: DohClient::new(transport),
                cache,
                stats: ResolverStats::default(),
            }),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.inner.config
    }

    pub fn cache(&self) -> &HostCache {
        &self.inner.cache
    }

    pub fn stats(&self) -> ResolverStatsSnapshot {
        self.inner.stats.snapshot()
    }

    /// Drops every cached resolution.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
        tracing::info!("DNS cache cleared");
    }

    /// Resolve `domain` to its A-record addresses.
    ///
    /// Fails only with [`NetError::NameNotResolvedFor`], after both the
    /// primary and the fallback provider failed or returned no addresses.
    /// Nothing is cached on failure.
    pub async fn resolve(&self, domain: &str) -> Result<ResolutionResult, NetError> {
        let inner = &*self.inner;
        let config = &inner.config;
        let mut state = State::CheckCache;

        loop {
            state = match state {
                State::CheckCache => {
                    if !inner.cache.is_enabled() {
                        State::QueryPrimary
                    } else if let Some(hit) = inner.cache.lookup(domain) {
                        inner.stats.record_cache_hit();
                        tracing::debug!(domain = %domain, addrs = %hit, "cache hit");
                        return Ok(hit);
                    } else {
                        inner.stats.record_cache_miss();
                        State::QueryPrimary
                    }
                }
                State::QueryPrimary => {
                    let provider = config.primary_provider;
                    match inner.client.query(provider, domain, config.query_timeout).await {
                        Ok(result) => State::StoreResult { provider, result },
                        Err(e) => {
                            inner.stats.record_primary_failure();
                            tracing::warn!(
                                domain = %domain,
                                error = %e,
                                fallback = %config.fallback_provider,
                                "primary provider failed, trying fallback"
                            );
                            State::QueryFallback
                        }
                    }
                }
                State::QueryFallback => {
                    let provider = config.fallback_provider;
                    match inner.client.query(provider, domain, config.query_timeout).await {
                        Ok(result) => {
                            inner.stats.record_fallback_success();
                            State::StoreResult { provider, result }
                        }
                        Err(e) => {
                            inner.stats.record_resolution_failure();
                            tracing::warn!(domain = %domain, error = %e, "fallback provider failed");
                            return Err(NetError::NameNotResolvedFor {
                                domain: domain.to_string(),
                            });
                        }
                    }
                }
                State::StoreResult { provider, result } => {
                    tracing::debug!(
                        domain = %domain,
                        provider = %provider,
                        addrs = %result,
                        "resolved"
                    );
                    if inner.cache.is_enabled() {
                        inner.cache.insert(domain, result.clone(), config.cache_ttl);
                        tracing::debug!(domain = %domain, ttl = ?config.cache_ttl, "cached");
                    }
                    return Ok(result);
                }
            };
        }
    }
}

impl Resolve for DohResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let resolver = self.clone();
        Box::pin(async move { DohResolver::resolve(&resolver, name.as_str()).await })
    }
}

impl std::fmt::Debug for DohResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DohResolver")
            .field("config", &self.inner.config)
            .field("cached", &self.inner.cache.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::transport::{DohRequest, DohResponse};
    use bytes::Bytes;
    use futures::future::BoxFuture;
    use http::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers every query with the same A record and counts calls.
    struct CountingTransport {
        calls: AtomicUsize,
    }

    impl DohTransport for CountingTransport {
        fn get(&self, _request: DohRequest) -> BoxFuture<'static, Result<DohResponse, NetError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async {
                Ok(DohResponse {
                    status: StatusCode::OK,
                    body: Bytes::from_static(
                        br#"{"Status":0,"Answer":[{"name":"a.","type":1,"TTL":30,"data":"192.0.2.10"}]}"#,
                    ),
                })
            })
        }
    }

    fn counting() -> Arc<CountingTransport> {
        Arc::new(CountingTransport {
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_machine_caches_primary_result() {
        let transport = counting();
        let resolver = DohResolver::with_transport(ResolverConfig::default(), transport.clone());

        let first = resolver.resolve("example.com").await.unwrap();
        let second = resolver.resolve("example.com").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        let stats = resolver.stats();
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.primary_failures, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trait_object_resolution() {
        let resolver: Arc<dyn Resolve> = Arc::new(DohResolver::with_transport(
            ResolverConfig::default(),
            counting(),
        ));
        let result = resolver.resolve(Name::new("example.com")).await.unwrap();
        assert_eq!(result.first(), "192.0.2.10");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_cache() {
        let transport = counting();
        let resolver = DohResolver::with_transport(ResolverConfig::default(), transport.clone());
        let clone = resolver.clone();

        resolver.resolve("example.com").await.unwrap();
        clone.resolve("example.com").await.unwrap();

        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_cache_skips_lookup_counters() {
        let transport = counting();
        let config = ResolverConfig::default().with_cache_enabled(false);
        let resolver = DohResolver::with_transport(config, transport.clone());

        resolver.resolve("example.com").await.unwrap();
        resolver.resolve("example.com").await.unwrap();

        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
        assert_eq!(resolver.stats().cache_misses, 0);
        assert!(resolver.cache().is_empty());
    }
}
