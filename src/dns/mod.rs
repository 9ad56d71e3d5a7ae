//! DNS-over-HTTPS Resolution Module
//!
//! Resolves names through public DoH providers instead of the system
//! resolver:
//! - [`provider`]: registry of provider endpoints
//! - [`doh`]: single JSON DoH query against one provider
//! - [`cache`]: TTL-bounded in-memory resolution cache
//! - [`resolver`]: cache + primary/fallback orchestration
//!
//! # Architecture
//!
//! This module mirrors Chromium's `HostResolver` concept. The `Resolve`
//! trait is the abstraction consumers depend on; [`DohResolver`] is the
//! implementation, and [`DohTransport`] is the seam below it that performs
//! the actual HTTPS exchange.
//!
//! # Example
//!
//! ```rust,ignore
//! use dohbypass::dns::{DohResolver, ResolverConfig};
//!
//! let resolver = DohResolver::new(ResolverConfig::default());
//! let addrs = resolver.resolve("example.com").await?;
//! for addr in addrs.iter() {
//!     println!("Resolved: {}", addr);
//! }
//! ```

pub mod cache;
pub mod config;
pub mod doh;
pub mod error;
pub mod provider;
mod resolve;
pub mod resolver;
pub mod stats;
pub mod transport;

pub use cache::HostCache;
pub use config::ResolverConfig;
pub use doh::DohClient;
pub use error::QueryError;
pub use provider::{endpoint_for, Provider};
pub use resolve::{Name, Resolve, ResolutionResult, Resolving};
pub use resolver::DohResolver;
pub use stats::ResolverStatsSnapshot;
pub use transport::{DohRequest, DohResponse, DohTransport, HttpsTransport};
