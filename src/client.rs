//! Bypass client with builder pattern.
//!
//! Bundles a [`DohResolver`] with a [`BypassRequestBuilder`] that shares it,
//! so one object covers resolution, request building and cache control.
//!
//! # Example
//!
//! ```rust,ignore
//! use dohbypass::{BypassClient, dns::Provider};
//!
//! let client = BypassClient::builder()
//!     .primary(Provider::Quad9)
//!     .fallback(Provider::Google)
//!     .build();
//!
//! let req = client.build_bypassed_request("https://example.com/feed").await?;
//! println!("{} (Host: {:?})", req.url(), req.headers().get("host"));
//! ```

use crate::base::neterror::NetError;
use crate::dns::{
    DohResolver, DohTransport, Provider, ResolutionResult, ResolverConfig, ResolverStatsSnapshot,
};
use crate::urlrequest::{BypassRequestBuilder, BypassedRequest};
use std::sync::Arc;
use std::time::Duration;

/// Client for DoH resolution and bypassed request building.
///
/// Use [`BypassClient::builder()`] to configure and create a client. Clones
/// share the resolver and its cache.
#[derive(Clone, Debug)]
pub struct BypassClient {
    resolver: DohResolver,
    requests: BypassRequestBuilder,
}

impl Default for BypassClient {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl BypassClient {
    /// Create a client that queries providers over HTTPS.
    pub fn new(config: ResolverConfig) -> Self {
        Self::from_resolver(DohResolver::new(config))
    }

    /// Create a new client builder.
    pub fn builder() -> BypassClientBuilder {
        BypassClientBuilder::default()
    }

    fn from_resolver(resolver: DohResolver) -> Self {
        let config = resolver.config();
        tracing::info!(
            primary = %config.primary_provider,
            fallback = %config.fallback_provider,
            cache_enabled = config.cache_enabled,
            "DoH client initialized"
        );
        let requests = BypassRequestBuilder::new(Arc::new(resolver.clone()));
        Self { resolver, requests }
    }

    /// Resolve `domain` to its IPv4 addresses.
    pub async fn resolve(&self, domain: &str) -> Result<ResolutionResult, NetError> {
        self.resolver.resolve(domain).await
    }

    /// Build a request for `url` addressed to its resolved IP.
    ///
    /// See [`BypassRequestBuilder::build`] for the degradation rules.
    pub async fn build_bypassed_request(&self, url: &str) -> Result<BypassedRequest, NetError> {
        self.requests.build(url).await
    }

    /// Drop every cached resolution.
    pub fn clear_cache(&self) {
        self.resolver.clear_cache();
    }

    pub fn stats(&self) -> ResolverStatsSnapshot {
        self.resolver.stats()
    }

    pub fn config(&self) -> &ResolverConfig {
        self.resolver.config()
    }

    /// The underlying resolver, e.g. to hand to another component as a
    /// [`Resolve`](crate::dns::Resolve) implementation.
    pub fn resolver(&self) -> &DohResolver {
        &self.resolver
    }
}

/// Builder for creating a [`BypassClient`].
#[derive(Default)]
pub struct BypassClientBuilder {
    config: ResolverConfig,
    transport: Option<Arc<dyn DohTransport>>,
}

impl BypassClientBuilder {
    /// Replace the whole configuration.
    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the provider queried first.
    pub fn primary(mut self, provider: Provider) -> Self {
        self.config.primary_provider = provider;
        self
    }

    /// Set the provider queried when the primary fails.
    pub fn fallback(mut self, provider: Provider) -> Self {
        self.config.fallback_provider = provider;
        self
    }

    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.config.cache_enabled = enabled;
        self
    }

    /// Set how long resolutions stay cached.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    /// Set the per-provider query timeout.
    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.config.query_timeout = timeout;
        self
    }

    /// Send queries through a custom transport instead of HTTPS.
    pub fn transport(mut self, transport: Arc<dyn DohTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> BypassClient {
        let resolver = match self.transport {
            Some(transport) => DohResolver::with_transport(self.config, transport),
            None => DohResolver::new(self.config),
        };
        BypassClient::from_resolver(resolver)
    }
}

impl std::fmt::Debug for BypassClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BypassClientBuilder")
            .field("config", &self.config)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}
