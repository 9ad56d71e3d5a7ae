//! # dohbypass
//!
//! DNS-over-HTTPS resolution and DNS-bypassed request building.
//!
//! Domains are resolved through public DoH providers (Cloudflare, Google,
//! Quad9, AdGuard) instead of the system resolver, with a primary/fallback
//! pair and a TTL-bounded cache. A resolved address can then be spliced into
//! a URL so the request goes straight to the IP, with the original hostname
//! kept in the `Host` header.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dohbypass::BypassClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = BypassClient::default();
//!     let addrs = client.resolve("example.com").await.unwrap();
//!     println!("example.com -> {}", addrs);
//!
//!     let req = client
//!         .build_bypassed_request("https://example.com/path?x=1")
//!         .await
//!         .unwrap();
//!     println!("GET {}", req.url());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error codes and I/O error context
//! - [`dns`] - Providers, DoH queries, cache and resolver
//! - [`socket`] - TCP/TLS connection setup for DoH endpoints
//! - [`urlrequest`] - Bypassed request building
//! - [`client`] - High-level client tying it together

pub mod base;
pub mod client;
pub mod dns;
pub mod socket;
pub mod urlrequest;

pub use base::neterror::NetError;
pub use client::{BypassClient, BypassClientBuilder};
