//! DNS-over-HTTPS query client (JSON API).
//!
//! Sends `GET <endpoint>?name=<domain>&type=A` with
//! `Accept: application/dns-json` and extracts the A-record addresses from
//! the answer section.

use crate::base::neterror::NetError;
use crate::dns::error::QueryError;
use crate::dns::provider::{endpoint_for, Provider};
use crate::dns::resolve::ResolutionResult;
use crate::dns::transport::{DohRequest, DohTransport, HttpsTransport};
use http::{header, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Media type of the JSON DoH API.
pub const DNS_JSON: &str = "application/dns-json";

/// DNS record type code for an IPv4 address record.
pub const RECORD_TYPE_A: u16 = 1;

/// Body of a JSON DoH response. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DnsJsonResponse {
    #[serde(rename = "Status", default)]
    pub status: u32,
    #[serde(rename = "Answer", default)]
    pub answer: Option<Vec<DnsAnswer>>,
}

/// One record in the answer section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DnsAnswer {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub record_type: u16,
    /// Parsed but not used for cache expiry.
    #[serde(rename = "TTL", default)]
    pub ttl: i64,
    #[serde(default)]
    pub data: String,
}

impl DnsJsonResponse {
    /// Parse a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, NetError> {
        serde_json::from_slice(body).map_err(|e| {
            tracing::debug!(error = %e, "malformed DoH body");
            NetError::DnsMalformedResponse
        })
    }

    /// `data` of every A record, in answer order.
    pub fn a_records(&self) -> Vec<String> {
        self.answer
            .iter()
            .flatten()
            .filter(|a| a.record_type == RECORD_TYPE_A)
            .map(|a| a.data.clone())
            .collect()
    }
}

/// Builds the query URL for `domain` against `provider`'s endpoint.
pub fn query_url(provider: Provider, domain: &str) -> Result<Url, NetError> {
    let mut url = Url::parse(endpoint_for(provider)).map_err(|_| NetError::InvalidUrl)?;
    url.query_pairs_mut()
        .append_pair("name", domain)
        .append_pair("type", "A");
    Ok(url)
}

/// Issues single DoH queries through a [`DohTransport`].
#[derive(Clone)]
pub struct DohClient {
    transport: Arc<dyn DohTransport>,
}

impl Default for DohClient {
    fn default() -> Self {
        Self::new(Arc::new(HttpsTransport::new()))
    }
}

impl DohClient {
    pub fn new(transport: Arc<dyn DohTransport>) -> Self {
        Self { transport }
    }

    /// Query `provider` for the A records of `domain`, giving up after
    /// `timeout`. Every failure comes back as a [`QueryError`].
    pub async fn query(
        &self,
        provider: Provider,
        domain: &str,
        timeout: Duration,
    ) -> Result<ResolutionResult, QueryError> {
        let transport_err = |source: NetError| QueryError::TransportError { provider, source };

        let url = query_url(provider, domain).map_err(transport_err)?;
        tracing::debug!(provider = %provider, domain = %domain, "querying DoH provider");

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(DNS_JSON));

        let request = DohRequest { url, headers };
        let response = tokio::time::timeout(timeout, self.transport.get(request))
            .await
            .map_err(|_| transport_err(NetError::DnsTimedOut))?
            .map_err(transport_err)?;

        if !response.status.is_success() {
            return Err(QueryError::ProviderError {
                provider,
                status: response.status.as_u16(),
            });
        }

        let parsed = DnsJsonResponse::from_slice(&response.body).map_err(transport_err)?;
        tracing::trace!(
            provider = %provider,
            domain = %domain,
            status = parsed.status,
            "DoH response parsed"
        );

        ResolutionResult::new(parsed.a_records()).ok_or_else(|| QueryError::NoAnswer {
            provider,
            domain: domain.to_string(),
        })
    }
}

impl std::fmt::Debug for DohClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DohClient").finish_non_exhaustive()
    }
}
