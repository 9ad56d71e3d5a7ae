//! Ergonomic error context helpers.
//!
//! Provides extension traits for adding context to `Result` types,
//! converting IO errors into `NetError` codes while logging the host or
//! domain that was involved.

use crate::base::neterror::NetError;
use std::io::{self, ErrorKind};

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Map an IO error from connecting to `host:port` into a `NetError`.
    ///
    /// # Example
    /// ```ignore
    /// use dohbypass::base::context::IoResultExt;
    ///
    /// let stream = TcpStream::connect(addr).await
    ///     .connection_context("dns.google", 443)?;
    /// ```
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError>;

    /// Map an IO error from bootstrapping the address of `domain`.
    fn dns_context(self, domain: &str) -> Result<T, NetError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError> {
        self.map_err(|e| {
            tracing::debug!(host = %host, port, error = %e, "connection failed");
            match e.kind() {
                ErrorKind::ConnectionRefused => NetError::ConnectionRefused,
                ErrorKind::ConnectionReset => NetError::ConnectionReset,
                ErrorKind::ConnectionAborted => NetError::ConnectionAborted,
                ErrorKind::TimedOut => NetError::ConnectionTimedOut,
                ErrorKind::PermissionDenied => NetError::NetworkAccessDenied,
                ErrorKind::UnexpectedEof => NetError::ConnectionClosed,
                _ => NetError::ConnectionFailed,
            }
        })
    }

    fn dns_context(self, domain: &str) -> Result<T, NetError> {
        self.map_err(|e| {
            tracing::debug!(domain = %domain, error = %e, "bootstrap lookup failed");
            NetError::NameResolutionFailed
        })
    }
}
