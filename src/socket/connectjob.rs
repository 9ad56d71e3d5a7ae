use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use crate::socket::client::SocketType;
use crate::socket::tls::TlsConfig;
use boring::ssl::{SslConnector, SslMethod};
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpStream;
use url::Url;

/// Manages the connection process to a DoH endpoint: bootstrap DNS -> TCP -> SSL.
/// Roughly equivalent to net::ConnectJob.
pub struct ConnectJob;

impl ConnectJob {
    pub async fn connect(url: &Url, tls: &TlsConfig) -> Result<SocketType, NetError> {
        let host = url.host_str().ok_or(NetError::InvalidUrl)?;
        let port = url.port_or_known_default().ok_or(NetError::InvalidUrl)?;

        // 1. Bootstrap resolution. IP-literal endpoints skip it entirely.
        let addrs = Self::endpoint_addrs(host, port).await?;

        // 2. TCP Connect
        let mut last_err = NetError::ConnectionFailed;
        let mut stream = None;
        for addr in addrs {
            match TcpStream::connect(addr).await.connection_context(host, port) {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => last_err = e,
            }
        }
        let stream = stream.ok_or(last_err)?;

        // 3. SSL Handshake (if https)
        match url.scheme() {
            "https" => {
                let mut builder = SslConnector::builder(SslMethod::tls())
                    .map_err(|_| NetError::SslProtocolError)?;
                tls.apply_to_builder(&mut builder)?;

                let connector = builder.build();
                let mut config = connector
                    .configure()
                    .map_err(|_| NetError::SslProtocolError)?;
                config.set_use_server_name_indication(TlsConfig::should_set_sni(host));

                let tls_host = host.trim_start_matches('[').trim_end_matches(']');
                let tls_stream = tokio_boring::connect(config, tls_host, stream)
                    .await
                    .map_err(|e| {
                        tracing::debug!(host = %host, error = ?e, "TLS handshake failed");
                        NetError::SslProtocolError
                    })?;

                Ok(SocketType::Ssl(tls_stream))
            }
            "http" => Ok(SocketType::Tcp(stream)),
            _ => Err(NetError::DisallowedUrlScheme),
        }
    }

    async fn endpoint_addrs(host: &str, port: u16) -> Result<Vec<SocketAddr>, NetError> {
        let bare = host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = bare.parse::<IpAddr>() {
            return Ok(vec![SocketAddr::new(ip, port)]);
        }

        let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, port))
            .await
            .dns_context(host)?
            .collect();
        if addrs.is_empty() {
            return Err(NetError::NameResolutionFailed);
        }
        Ok(addrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_ip_literal_skips_bootstrap() {
        let addrs = ConnectJob::endpoint_addrs("1.1.1.1", 443).await.unwrap();
        assert_eq!(addrs, vec!["1.1.1.1:443".parse::<SocketAddr>().unwrap()]);

        let addrs = ConnectJob::endpoint_addrs("[::1]", 8443).await.unwrap();
        assert_eq!(addrs, vec!["[::1]:8443".parse::<SocketAddr>().unwrap()]);
    }

    #[tokio::test]
    async fn test_plain_http_connect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = Url::parse(&format!("http://127.0.0.1:{}/dns-query", port)).unwrap();

        let tls = TlsConfig::doh();
        let (socket, _) = tokio::join!(
            ConnectJob::connect(&url, &tls),
            listener.accept()
        );
        assert!(!socket.unwrap().is_tls());
    }

    #[tokio::test]
    async fn test_refused_connection() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
        let err = ConnectJob::connect(&url, &TlsConfig::doh()).await.unwrap_err();
        assert_eq!(err, NetError::ConnectionRefused);
    }

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = Url::parse(&format!("ftp://127.0.0.1:{}/", port)).unwrap();

        let tls = TlsConfig::doh();
        let (res, _) = tokio::join!(
            ConnectJob::connect(&url, &tls),
            listener.accept()
        );
        assert_eq!(res.unwrap_err(), NetError::DisallowedUrlScheme);
    }
}
