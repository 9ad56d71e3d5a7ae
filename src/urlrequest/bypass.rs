//! Builds requests that target a DoH-resolved IP instead of a hostname.
//!
//! The URL's host is swapped for the first resolved address and the
//! original name travels in the `Host` header, so the server can still route
//! by name. When resolution fails the request falls back to the original
//! URL untouched: callers always get something they can send.

use crate::base::neterror::NetError;
use crate::dns::transport::host_header;
use crate::dns::{Name, Resolve};
use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Method, Request};
use http_body_util::Empty;
use std::net::IpAddr;
use std::sync::Arc;
use url::{Host, Position, Url};

/// Request descriptor produced by [`BypassRequestBuilder`]. Not sent.
#[derive(Debug, Clone)]
pub struct BypassedRequest {
    url: String,
    parsed: Url,
    headers: HeaderMap,
    original_host: String,
    bypassed: bool,
}

impl BypassedRequest {
    fn direct(input: &str, parsed: Url, original_host: String) -> Self {
        Self {
            url: input.to_string(),
            parsed,
            headers: HeaderMap::new(),
            original_host,
            bypassed: false,
        }
    }

    /// URL to request. When bypassed, the IP-substituted URL; otherwise the
    /// caller's input exactly as given, without `url` crate normalization.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Parsed form of [`url`](Self::url).
    pub fn parsed_url(&self) -> &Url {
        &self.parsed
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Add caller headers (auth, content type, ...) before sending.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Host of the URL the caller asked for.
    pub fn original_host(&self) -> &str {
        &self.original_host
    }

    /// True if the host was replaced by a resolved address.
    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Convert into a GET request for the caller's HTTP stack.
    pub fn into_http_request(self) -> Result<Request<Empty<Bytes>>, NetError> {
        let mut req = Request::builder()
            .method(Method::GET)
            .uri(&self.parsed[..Position::AfterQuery])
            .body(Empty::<Bytes>::new())
            .map_err(|_| NetError::InvalidUrl)?;
        *req.headers_mut() = self.headers;
        Ok(req)
    }
}

/// Resolves a URL's host and rewrites the URL to target the address directly.
#[derive(Clone)]
pub struct BypassRequestBuilder {
    resolver: Arc<dyn Resolve>,
}

impl BypassRequestBuilder {
    pub fn new(resolver: Arc<dyn Resolve>) -> Self {
        Self { resolver }
    }

    /// Build a bypassed request for `url`.
    ///
    /// Fails only when `url` cannot be parsed or has no host. A resolution
    /// failure is not an error: the returned request then targets the
    /// original URL and carries no extra header.
    pub async fn build(&self, url: &str) -> Result<BypassedRequest, NetError> {
        let parsed = Url::parse(url).map_err(|_| NetError::InvalidUrl)?;

        let domain = match parsed.host() {
            Some(Host::Domain(domain)) => Some(domain.to_string()),
            Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => None,
            None => return Err(NetError::InvalidUrl),
        };
        let Some(domain) = domain else {
            // Already an address, nothing to resolve.
            let host = parsed.host_str().unwrap_or_default().to_string();
            return Ok(BypassedRequest::direct(url, parsed, host));
        };

        let addrs = match self.resolver.resolve(Name::new(domain.as_str())).await {
            Ok(addrs) => addrs,
            Err(e) => {
                tracing::warn!(
                    domain = %domain,
                    error = %e,
                    "failed to resolve, falling back to normal request"
                );
                return Ok(BypassedRequest::direct(url, parsed, domain));
            }
        };

        let ip = match addrs.first().parse::<IpAddr>() {
            Ok(ip) => ip,
            Err(_) => {
                tracing::warn!(
                    domain = %domain,
                    addr = %addrs.first(),
                    "provider returned an unusable address, falling back to normal request"
                );
                return Ok(BypassedRequest::direct(url, parsed, domain));
            }
        };

        let host_value = host_header(&parsed)
            .and_then(|h| HeaderValue::from_str(&h).ok())
            .ok_or(NetError::InvalidUrl)?;

        let mut bypassed_url = parsed.clone();
        if bypassed_url.set_ip_host(ip).is_err() {
            tracing::warn!(url = %parsed, "cannot substitute host, falling back to normal request");
            return Ok(BypassedRequest::direct(url, parsed, domain));
        }

        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, host_value);

        tracing::debug!(url = %bypassed_url, host = %domain, "created bypassed request");
        Ok(BypassedRequest {
            url: bypassed_url.to_string(),
            parsed: bypassed_url,
            headers,
            original_host: domain,
            bypassed: true,
        })
    }
}

impl std::fmt::Debug for BypassRequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BypassRequestBuilder").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{ResolutionResult, Resolving};
    use std::sync::Mutex;

    struct FixedResolver {
        addrs: Vec<String>,
        asked: Mutex<Vec<String>>,
    }

    impl FixedResolver {
        fn new(addrs: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                addrs: addrs.iter().map(|s| s.to_string()).collect(),
                asked: Mutex::new(Vec::new()),
            })
        }
    }

    impl Resolve for FixedResolver {
        fn resolve(&self, name: Name) -> Resolving {
            self.asked.lock().unwrap().push(name.to_string());
            let addrs = self.addrs.clone();
            Box::pin(async move {
                ResolutionResult::new(addrs).ok_or(NetError::NameNotResolvedFor {
                    domain: name.to_string(),
                })
            })
        }
    }

    #[tokio::test]
    async fn test_substitutes_first_address() {
        let resolver = FixedResolver::new(&["203.0.113.5", "203.0.113.6"]);
        let builder = BypassRequestBuilder::new(resolver.clone());

        let req = builder.build("https://example.com/path?x=1").await.unwrap();

        assert!(req.is_bypassed());
        assert_eq!(req.url(), "https://203.0.113.5/path?x=1");
        assert_eq!(req.headers()[header::HOST], "example.com");
        assert_eq!(req.original_host(), "example.com");
        assert_eq!(*resolver.asked.lock().unwrap(), vec!["example.com"]);
    }

    #[tokio::test]
    async fn test_keeps_port_and_fragment() {
        let builder = BypassRequestBuilder::new(FixedResolver::new(&["198.51.100.1"]));

        let req = builder
            .build("http://api.example.com:8080/v1/models?limit=5#top")
            .await
            .unwrap();

        assert_eq!(
            req.url(),
            "http://198.51.100.1:8080/v1/models?limit=5#top"
        );
        assert_eq!(req.headers()[header::HOST], "api.example.com:8080");
    }

    #[tokio::test]
    async fn test_resolution_failure_degrades() {
        let builder = BypassRequestBuilder::new(FixedResolver::new(&[]));

        let req = builder.build("https://blocked.example/feed").await.unwrap();

        assert!(!req.is_bypassed());
        assert_eq!(req.url(), "https://blocked.example/feed");
        assert!(req.headers().is_empty());
    }

    #[tokio::test]
    async fn test_degraded_url_is_not_normalized() {
        let builder = BypassRequestBuilder::new(FixedResolver::new(&[]));

        let req = builder.build("HTTPS://Blocked.Example:443/feed").await.unwrap();

        assert!(!req.is_bypassed());
        assert_eq!(req.url(), "HTTPS://Blocked.Example:443/feed");
        assert_eq!(req.parsed_url().as_str(), "https://blocked.example/feed");
        assert_eq!(req.original_host(), "blocked.example");
    }

    #[tokio::test]
    async fn test_unusable_address_degrades() {
        let builder = BypassRequestBuilder::new(FixedResolver::new(&["not-an-ip"]));

        let req = builder.build("https://example.com/").await.unwrap();

        assert!(!req.is_bypassed());
        assert_eq!(req.url(), "https://example.com/");
        assert!(req.headers().get(header::HOST).is_none());
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let builder = BypassRequestBuilder::new(FixedResolver::new(&["203.0.113.5"]));

        assert_eq!(
            builder.build("not a url").await.unwrap_err(),
            NetError::InvalidUrl
        );
        assert_eq!(
            builder.build("mailto:someone@example.com").await.unwrap_err(),
            NetError::InvalidUrl
        );
    }

    #[tokio::test]
    async fn test_ip_host_is_not_resolved() {
        let resolver = FixedResolver::new(&["203.0.113.5"]);
        let builder = BypassRequestBuilder::new(resolver.clone());

        let req = builder.build("https://192.0.2.9/status").await.unwrap();

        assert!(!req.is_bypassed());
        assert_eq!(req.url(), "https://192.0.2.9/status");
        assert!(resolver.asked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_into_http_request() {
        let builder = BypassRequestBuilder::new(FixedResolver::new(&["203.0.113.5"]));
        let mut req = builder.build("https://example.com/a?b=c#frag").await.unwrap();
        req.headers_mut()
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));

        let http_req = req.into_http_request().unwrap();

        assert_eq!(http_req.method(), Method::GET);
        assert_eq!(http_req.uri(), "https://203.0.113.5/a?b=c");
        assert_eq!(http_req.headers()[header::HOST], "example.com");
        assert_eq!(http_req.headers()[header::AUTHORIZATION], "Bearer t");
    }
}
