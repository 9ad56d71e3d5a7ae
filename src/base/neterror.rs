use thiserror::Error;

/// Network error codes, numbered after Chromium's `net_error_list.h`.
///
/// Most variants are plain codes. A few carry context (`NameNotResolvedFor`,
/// `InvalidProvider`) and map back onto the closest Chromium code.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NetError {
    // Connection Errors
    #[error("Connection closed (TCP FIN)")]
    ConnectionClosed,
    #[error("Connection reset (TCP RST)")]
    ConnectionReset,
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection aborted")]
    ConnectionAborted,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Could not resolve {domain} via any DoH provider")]
    NameNotResolvedFor { domain: String },
    #[error("SSL protocol error")]
    SslProtocolError,
    #[error("Connection timed out")]
    ConnectionTimedOut,
    #[error("Name resolution failed")]
    NameResolutionFailed,
    #[error("Network access denied")]
    NetworkAccessDenied,

    // URL / body errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Disallowed URL scheme")]
    DisallowedUrlScheme,

    // DNS Errors
    #[error("DNS response was malformed")]
    DnsMalformedResponse,
    #[error("DNS query timed out")]
    DnsTimedOut,

    // Custom codes, outside the Chromium list
    #[error("HTTP body error")]
    HttpBodyError,
    #[error("JSON parse error")]
    JsonParseError,
    #[error("Unknown DoH provider: {0}")]
    InvalidProvider(String),

    #[error("Unknown network error ({0})")]
    Unknown(i32),
}

impl NetError {
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::ConnectionClosed => -100,
            NetError::ConnectionReset => -101,
            NetError::ConnectionRefused => -102,
            NetError::ConnectionAborted => -103,
            NetError::ConnectionFailed => -104,
            NetError::NameNotResolved | NetError::NameNotResolvedFor { .. } => -105,
            NetError::SslProtocolError => -107,
            NetError::ConnectionTimedOut => -118,
            NetError::NameResolutionFailed => -137,
            NetError::NetworkAccessDenied => -138,

            NetError::InvalidUrl => -300,
            NetError::DisallowedUrlScheme => -301,

            NetError::DnsMalformedResponse => -800,
            NetError::DnsTimedOut => -803,

            NetError::HttpBodyError => -905,
            NetError::JsonParseError => -907,
            NetError::InvalidProvider(_) => -908,
            NetError::Unknown(code) => *code,
        }
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -100 => NetError::ConnectionClosed,
            -101 => NetError::ConnectionReset,
            -102 => NetError::ConnectionRefused,
            -103 => NetError::ConnectionAborted,
            -104 => NetError::ConnectionFailed,
            -105 => NetError::NameNotResolved,
            -107 => NetError::SslProtocolError,
            -118 => NetError::ConnectionTimedOut,
            -137 => NetError::NameResolutionFailed,
            -138 => NetError::NetworkAccessDenied,
            -300 => NetError::InvalidUrl,
            -301 => NetError::DisallowedUrlScheme,
            -800 => NetError::DnsMalformedResponse,
            -803 => NetError::DnsTimedOut,
            -905 => NetError::HttpBodyError,
            -907 => NetError::JsonParseError,
            _ => NetError::Unknown(code),
        }
    }
}
