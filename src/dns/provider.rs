//! Registry of public DoH providers.
//!
//! The endpoint table is compiled in and never changes at runtime, so it
//! can be read from any task without synchronization.

use crate::base::neterror::NetError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A public DNS-over-HTTPS provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    Cloudflare,
    CloudflareAlt,
    Google,
    Quad9,
    AdGuard,
}

impl Provider {
    /// Every known provider, in declaration order.
    pub const ALL: [Provider; 5] = [
        Provider::Cloudflare,
        Provider::CloudflareAlt,
        Provider::Google,
        Provider::Quad9,
        Provider::AdGuard,
    ];

    /// JSON query endpoint for this provider.
    pub const fn endpoint(self) -> &'static str {
        match self {
            Provider::Cloudflare => "https://1.1.1.1/dns-query",
            Provider::CloudflareAlt => "https://1.0.0.1/dns-query",
            Provider::Google => "https://dns.google/resolve",
            Provider::Quad9 => "https://dns.quad9.net/dns-query",
            Provider::AdGuard => "https://dns.adguard.com/dns-query",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Provider::Cloudflare => "Cloudflare",
            Provider::CloudflareAlt => "CloudflareAlt",
            Provider::Google => "Google",
            Provider::Quad9 => "Quad9",
            Provider::AdGuard => "AdGuard",
        }
    }
}

/// Looks up the DoH endpoint URL for `provider`.
#[inline]
pub const fn endpoint_for(provider: Provider) -> &'static str {
    provider.endpoint()
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| NetError::InvalidProvider(s.to_string()))
    }
}
