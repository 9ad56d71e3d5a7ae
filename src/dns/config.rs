//! Resolver configuration.

use crate::base::neterror::NetError;
use crate::dns::provider::Provider;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for a [`DohResolver`](crate::dns::DohResolver), fixed at
/// construction.
///
/// Durations are (de)serialized as whole seconds:
///
/// ```json
/// {
///   "primary_provider": "Cloudflare",
///   "fallback_provider": "Google",
///   "cache_enabled": true,
///   "cache_ttl_secs": 300,
///   "query_timeout_secs": 5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Provider queried first.
    pub primary_provider: Provider,
    /// Provider queried when the primary fails or has no answer.
    pub fallback_provider: Provider,
    /// Whether successful resolutions are cached.
    pub cache_enabled: bool,
    /// How long a cached resolution stays valid.
    #[serde(rename = "cache_ttl_secs", with = "secs")]
    pub cache_ttl: Duration,
    /// Bound on each individual provider query.
    #[serde(rename = "query_timeout_secs", with = "secs")]
    pub query_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            primary_provider: Provider::Cloudflare,
            fallback_provider: Provider::Google,
            cache_enabled: true,
            cache_ttl: Duration::from_secs(300),
            query_timeout: Duration::from_secs(5),
        }
    }
}

impl ResolverConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, NetError> {
        serde_json::from_str(json).map_err(|e| {
            tracing::warn!(error = %e, "invalid resolver configuration");
            NetError::JsonParseError
        })
    }

    pub fn with_primary(mut self, provider: Provider) -> Self {
        self.primary_provider = provider;
        self
    }

    pub fn with_fallback(mut self, provider: Provider) -> Self {
        self.fallback_provider = provider;
        self
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}

mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
