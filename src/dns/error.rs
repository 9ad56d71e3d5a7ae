//! Failure kinds for a single DoH provider query.
//!
//! These never leave the resolver: any of them makes the resolver move on
//! to the fallback provider, and exhausting both becomes
//! [`NetError::NameNotResolvedFor`].

use crate::base::neterror::NetError;
use crate::dns::provider::Provider;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The provider answered with a non-2xx HTTP status.
    #[error("{provider} answered with HTTP status {status}")]
    ProviderError { provider: Provider, status: u16 },

    /// Timeout, connection or TLS failure, or an unparseable body.
    #[error("transport error querying {provider}: {source}")]
    TransportError {
        provider: Provider,
        #[source]
        source: NetError,
    },

    /// Well-formed response without any usable A record.
    #[error("{provider} returned no A records for {domain}")]
    NoAnswer { provider: Provider, domain: String },
}

impl QueryError {
    pub fn provider(&self) -> Provider {
        match self {
            QueryError::ProviderError { provider, .. }
            | QueryError::TransportError { provider, .. }
            | QueryError::NoAnswer { provider, .. } => *provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_transport_error_keeps_source() {
        let err = QueryError::TransportError {
            provider: Provider::Quad9,
            source: NetError::DnsTimedOut,
        };
        assert_eq!(err.provider(), Provider::Quad9);
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some(NetError::DnsTimedOut.to_string())
        );
    }

    #[test]
    fn test_messages_name_provider() {
        let err = QueryError::ProviderError {
            provider: Provider::Google,
            status: 503,
        };
        assert_eq!(err.to_string(), "Google answered with HTTP status 503");

        let err = QueryError::NoAnswer {
            provider: Provider::Cloudflare,
            domain: "example.com".into(),
        };
        assert!(err.to_string().contains("example.com"));
    }
}
