//! Core DNS resolution types and traits.
//!
//! This module defines the `Resolve` trait and supporting types that form
//! the foundation of the DNS abstraction layer.

use crate::base::neterror::NetError;
use std::{fmt, future::Future, ops::Deref, pin::Pin, sync::Arc};

/// A domain name to resolve into IP addresses.
///
/// This is a lightweight wrapper around a hostname string that provides
/// a type-safe way to pass domain names to resolvers.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct Name {
    host: Box<str>,
}

impl Name {
    /// Creates a new [`Name`] from any string-like type.
    #[inline]
    pub fn new(host: impl Into<Box<str>>) -> Self {
        Self { host: host.into() }
    }

    /// View the hostname as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.host
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::new(value)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.host, f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.host, f)
    }
}

/// Ordered, non-empty list of IPv4 addresses returned for a name.
///
/// Addresses are kept exactly as the provider sent them in its A records.
/// The list is shared and immutable: cloning a result (for example on a
/// cache hit) hands out a snapshot that nobody can modify.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ResolutionResult {
    addrs: Arc<[String]>,
}

impl ResolutionResult {
    /// Wraps a list of addresses. Returns `None` for an empty list, since a
    /// resolution with zero addresses counts as a failure.
    pub fn new(addrs: Vec<String>) -> Option<Self> {
        if addrs.is_empty() {
            None
        } else {
            Some(Self { addrs: addrs.into() })
        }
    }

    /// The address a bypassed request should target.
    pub fn first(&self) -> &str {
        // Non-empty by construction.
        &self.addrs[0]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.addrs
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.addrs.to_vec()
    }

    /// True if `other` points at the same shared allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.addrs, &other.addrs)
    }
}

impl Deref for ResolutionResult {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.addrs
    }
}

impl fmt::Debug for ResolutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.addrs.iter()).finish()
    }
}

impl fmt::Display for ResolutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.addrs.join(", "))
    }
}

/// Alias for the `Future` type returned by a DNS resolver.
pub type Resolving = Pin<Box<dyn Future<Output = Result<ResolutionResult, NetError>> + Send>>;

/// Trait for DNS resolution.
///
/// This is the seam between request building and name resolution,
/// equivalent to Chromium's `HostResolver`. Implementations must be
/// thread-safe.
///
/// # Design Notes
///
/// - Uses `&self` for concurrent resolution without mutable access.
/// - Returns boxed futures for trait object compatibility.
/// - The only error a resolver reports for an unresolvable name is
///   [`NetError::NameNotResolvedFor`].
pub trait Resolve: Send + Sync {
    /// Resolves a domain name to its A-record addresses.
    fn resolve(&self, name: Name) -> Resolving;
}

/// Blanket implementation for Arc-wrapped resolvers.
impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    fn resolve(&self, name: Name) -> Resolving {
        (**self).resolve(name)
    }
}
