//! TLS configuration for DoH provider connections.
//!
//! DoH queries go out over HTTP/1.1, so ALPN only offers `http/1.1`. Peer
//! verification is always on; a provider that cannot present a valid
//! certificate is treated as a transport failure and triggers fallback.

use crate::base::neterror::NetError;
use boring::ssl::{SslConnectorBuilder, SslVerifyMode, SslVersion};

/// Client TLS settings applied to every provider connection.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub min_version: Option<SslVersion>,
    pub max_version: Option<SslVersion>,
    pub cipher_list: String,
    pub alpn_protos: Vec<String>,
    pub curves: Vec<String>,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self::doh()
    }
}

impl TlsConfig {
    /// Settings used for DoH endpoints: TLS 1.2+, AEAD suites, HTTP/1.1.
    pub fn doh() -> Self {
        Self {
            min_version: Some(SslVersion::TLS1_2),
            max_version: Some(SslVersion::TLS1_3),
            cipher_list: "ECDHE-ECDSA-AES128-GCM-SHA256:ECDHE-RSA-AES128-GCM-SHA256:\
                ECDHE-ECDSA-AES256-GCM-SHA384:ECDHE-RSA-AES256-GCM-SHA384:\
                ECDHE-ECDSA-CHACHA20-POLY1305:ECDHE-RSA-CHACHA20-POLY1305"
                .to_string(),
            alpn_protos: vec!["http/1.1".to_string()],
            curves: vec![
                "X25519".to_string(),
                "P-256".to_string(),
                "P-384".to_string(),
            ],
        }
    }

    /// Apply this configuration to an SSL connector builder.
    pub fn apply_to_builder(&self, builder: &mut SslConnectorBuilder) -> Result<(), NetError> {
        if let Some(min) = self.min_version {
            builder
                .set_min_proto_version(Some(min))
                .map_err(|_| NetError::SslProtocolError)?;
        }
        if let Some(max) = self.max_version {
            builder
                .set_max_proto_version(Some(max))
                .map_err(|_| NetError::SslProtocolError)?;
        }

        builder
            .set_cipher_list(&self.cipher_list)
            .map_err(|_| NetError::SslProtocolError)?;

        let alpn_wire = Self::alpn_wire(&self.alpn_protos)?;
        if !alpn_wire.is_empty() {
            builder
                .set_alpn_protos(&alpn_wire)
                .map_err(|_| NetError::SslProtocolError)?;
        }

        if !self.curves.is_empty() {
            builder
                .set_curves_list(&self.curves.join(":"))
                .map_err(|_| NetError::SslProtocolError)?;
        }

        builder.set_verify(SslVerifyMode::PEER);

        Ok(())
    }

    /// Encode ALPN protocol names as length-prefixed wire format.
    pub fn alpn_wire(protos: &[String]) -> Result<Vec<u8>, NetError> {
        let mut wire = Vec::new();
        for proto in protos {
            let len = u8::try_from(proto.len()).map_err(|_| NetError::SslProtocolError)?;
            wire.push(len);
            wire.extend_from_slice(proto.as_bytes());
        }
        Ok(wire)
    }

    /// Check if SNI should be set for this host.
    /// Per RFC 6066, SNI MUST NOT be set for raw IP addresses.
    pub fn should_set_sni(host: &str) -> bool {
        host.trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<std::net::IpAddr>()
            .is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sni_skipped_for_ip_endpoints() {
        assert!(!TlsConfig::should_set_sni("1.1.1.1"));
        assert!(!TlsConfig::should_set_sni("[2606:4700:4700::1111]"));
        assert!(TlsConfig::should_set_sni("dns.google"));
    }

    #[test]
    fn test_alpn_wire_format() {
        let wire = TlsConfig::alpn_wire(&["http/1.1".to_string()]).unwrap();
        assert_eq!(wire, b"\x08http/1.1");
    }

    #[test]
    fn test_alpn_rejects_oversized_protocol() {
        let long = "x".repeat(256);
        assert_eq!(
            TlsConfig::alpn_wire(&[long]),
            Err(NetError::SslProtocolError)
        );
    }

    #[test]
    fn test_doh_config_applies() {
        use boring::ssl::{SslConnector, SslMethod};

        let mut builder = SslConnector::builder(SslMethod::tls()).unwrap();
        TlsConfig::doh().apply_to_builder(&mut builder).unwrap();
    }
}
