//! Core DNS resolution types and traits.
//!
//! This module defines the `Resolve` trait and supporting types that the
//! unicast tier is built on. Multicast resolution does not go through this
//! trait; it owns its socket directly (see [`crate::dns::llmnr`]).

use crate::base::neterror::NetError;
use std::{collections::HashMap, fmt, future::Future, net::IpAddr, pin::Pin, sync::Arc};

/// A host name to resolve into IP addresses.
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

/// Alias for an `Iterator` trait object over resolved addresses.
pub type Addrs = Box<dyn Iterator<Item = IpAddr> + Send>;

/// Alias for the `Future` type returned by a resolver.
pub type Resolving = Pin<Box<dyn Future<Output = Result<Addrs, NetError>> + Send>>;

/// Trait for unicast name resolution.
///
/// Implementations must be thread-safe. Deadlines are applied by the
/// caller, so a resolver may take as long as its backend needs; dropping
/// the returned future abandons the lookup.
pub trait Resolve: Send + Sync {
    /// Resolves a host name to IP addresses.
    fn resolve(&self, name: Name) -> Resolving;
}

/// Blanket implementation for Arc-wrapped resolvers.
impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    fn resolve(&self, name: Name) -> Resolving {
        (**self).resolve(name)
    }
}

/// Resolver wrapper with a static host table.
///
/// Names in the table (matched case-insensitively) resolve to their
/// configured addresses without touching the inner resolver. Useful for
/// hosts that neither DNS nor LLMNR can find, and for tests.
///
/// # Example
///
/// ```rust,ignore
/// use smbreach::dns::{GaiResolver, ResolverWithOverrides};
/// use std::collections::HashMap;
///
/// let mut overrides = HashMap::new();
/// overrides.insert("nas".to_string(), vec!["192.168.1.20".parse().unwrap()]);
///
/// let resolver = ResolverWithOverrides::new(Arc::new(GaiResolver::new()), overrides);
/// ```
pub struct ResolverWithOverrides {
    inner: Arc<dyn Resolve>,
    overrides: Arc<HashMap<String, Vec<IpAddr>>>,
}

impl ResolverWithOverrides {
    /// Creates a new resolver with the given overrides.
    pub fn new(inner: Arc<dyn Resolve>, overrides: HashMap<String, Vec<IpAddr>>) -> Self {
        let overrides = overrides
            .into_iter()
            .map(|(name, addrs)| (name.to_ascii_lowercase(), addrs))
            .collect();
        Self {
            inner,
            overrides: Arc::new(overrides),
        }
    }

    /// Returns the number of configured overrides.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

impl Resolve for ResolverWithOverrides {
    fn resolve(&self, name: Name) -> Resolving {
        if let Some(addrs) = self.overrides.get(&name.as_str().to_ascii_lowercase()) {
            tracing::debug!(host = %name, count = addrs.len(), "resolved from host overrides");
            let addrs: Addrs = Box::new(addrs.clone().into_iter());
            return Box::pin(std::future::ready(Ok(addrs)));
        }
        self.inner.resolve(name)
    }
}

impl fmt::Debug for ResolverWithOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverWithOverrides")
            .field("override_count", &self.overrides.len())
            .finish_non_exhaustive()
    }
}
