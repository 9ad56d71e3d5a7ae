//! HTTP transport used to reach DoH providers.
//!
//! [`DohTransport`] is the seam between the query client and the network.
//! [`HttpsTransport`] is the production implementation: a fresh
//! HTTP/1.1 connection per query over BoringSSL, driven by hyper.

use crate::base::neterror::NetError;
use crate::socket::connectjob::ConnectJob;
use crate::socket::tls::TlsConfig;
use bytes::Bytes;
use futures::future::BoxFuture;
use http::{header, HeaderMap, Method, Request, StatusCode};
use http_body_util::{BodyExt, Empty, Limited};
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use url::{Position, Url};

/// Upper bound on a DoH JSON body. Real answers are a few hundred bytes.
pub const MAX_RESPONSE_BYTES: usize = 64 * 1024;

/// A GET request to a DoH endpoint.
#[derive(Debug, Clone)]
pub struct DohRequest {
    pub url: Url,
    pub headers: HeaderMap,
}

/// Status and fully-read body of a DoH response.
#[derive(Debug, Clone)]
pub struct DohResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Executes a single DoH GET.
///
/// Implementations report every failure as a `NetError`; they never panic
/// on network conditions. Timeouts are applied by the caller.
pub trait DohTransport: Send + Sync {
    fn get(&self, request: DohRequest) -> BoxFuture<'static, Result<DohResponse, NetError>>;
}

impl<T: DohTransport + ?Sized> DohTransport for Arc<T> {
    fn get(&self, request: DohRequest) -> BoxFuture<'static, Result<DohResponse, NetError>> {
        (**self).get(request)
    }
}

/// Value for a `Host` header addressing `url`: the host, plus `:port` when
/// the URL names a non-default port.
pub fn host_header(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Production transport: one HTTP/1.1 connection per query.
#[derive(Debug, Clone, Default)]
pub struct HttpsTransport {
    tls: Arc<TlsConfig>,
}

impl HttpsTransport {
    pub fn new() -> Self {
        Self::default()
    }

    async fn execute(tls: Arc<TlsConfig>, request: DohRequest) -> Result<DohResponse, NetError> {
        let DohRequest { url, headers } = request;

        let socket = ConnectJob::connect(&url, &tls).await?;
        tracing::trace!(
            url = %url,
            peer = ?socket.peer_addr().ok(),
            tls = socket.is_tls(),
            "connected to DoH provider"
        );
        let io = TokioIo::new(socket);

        let (mut sender, conn) = http1::handshake(io)
            .await
            .map_err(|_| NetError::ConnectionFailed)?;

        // Drive the connection until the response is read.
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "DoH connection ended with error");
            }
        });

        let host = host_header(&url).ok_or(NetError::InvalidUrl)?;
        let mut req = Request::builder()
            .method(Method::GET)
            .uri(&url[Position::BeforePath..Position::AfterQuery])
            .header(header::HOST, host)
            .body(Empty::<Bytes>::new())
            .map_err(|_| NetError::InvalidUrl)?;
        req.headers_mut().extend(headers);

        let resp = sender.send_request(req).await.map_err(|e| {
            tracing::debug!(url = %url, error = %e, "DoH request failed");
            NetError::ConnectionClosed
        })?;

        let (parts, body) = resp.into_parts();
        let body = Limited::new(body, MAX_RESPONSE_BYTES)
            .collect()
            .await
            .map_err(|e| {
                tracing::debug!(url = %url, error = %e, "failed reading DoH body");
                NetError::HttpBodyError
            })?
            .to_bytes();

        Ok(DohResponse {
            status: parts.status,
            body,
        })
    }
}

impl DohTransport for HttpsTransport {
    fn get(&self, request: DohRequest) -> BoxFuture<'static, Result<DohResponse, NetError>> {
        Box::pin(Self::execute(self.tls.clone(), request))
    }
}
