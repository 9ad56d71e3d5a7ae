//! Socket handling for DoH provider connections.
//!
//! Mirrors the connection half of Chromium's `net/socket/`:
//! - [`connectjob`]: bootstrap DNS → TCP → TLS connection flow
//! - [`client`]: the connected socket type
//! - [`tls`]: TLS configuration with BoringSSL

pub mod client;
pub mod connectjob;
pub mod tls;
