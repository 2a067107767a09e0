//! System resolver using getaddrinfo.
//!
//! This resolver uses the operating system's native name resolution via
//! `getaddrinfo`, executed in a thread pool to avoid blocking the async
//! runtime. On most desktops this also covers `*.local` names through the
//! system's mDNS integration (nss-mdns, mDNSResponder), which is why the
//! engine tries it before falling back to LLMNR.

use super::{Addrs, Name, Resolve, Resolving};
use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use std::net::{IpAddr, ToSocketAddrs};

/// System resolver using `getaddrinfo` in a thread pool.
///
/// Each resolution spawns a blocking task. If the caller's deadline fires
/// first the task is abandoned rather than interrupted; it finishes on the
/// blocking pool and its result is discarded.
#[derive(Clone, Debug, Default)]
pub struct GaiResolver;

impl GaiResolver {
    /// Creates a new `GaiResolver`.
    pub fn new() -> Self {
        Self
    }
}

impl Resolve for GaiResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let host = name.as_str().to_string();
            let domain = host.clone();

            let result = tokio::task::spawn_blocking(move || {
                tracing::debug!(host = %host, "resolving via getaddrinfo");
                (host.as_str(), 0u16)
                    .to_socket_addrs()
                    .map(|iter| iter.map(|addr| addr.ip()).collect::<Vec<IpAddr>>())
            })
            .await;

            // Handle task join error (cancellation, panic)
            let addrs = result
                .map_err(|e| {
                    tracing::error!(error = %e, "name resolution task failed");
                    NetError::dns_failed(&domain, std::io::Error::other(e.to_string()))
                })?
                .dns_context(&domain)
                .inspect_err(|e| tracing::debug!(domain = %domain, error = %e, "getaddrinfo failed"))?;

            tracing::debug!(domain = %domain, count = addrs.len(), "getaddrinfo complete");
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}
