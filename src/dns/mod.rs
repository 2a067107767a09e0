//! Host resolution.
//!
//! Turns a server host into addresses to dial, even on networks where the
//! file server is only reachable by a multicast-announced name:
//! - System resolver (getaddrinfo via thread pool) or hickory-dns for unicast
//! - LLMNR multicast queries as a fallback
//! - Hostname-to-IP override table
//!
//! # Architecture
//!
//! [`ResolutionEngine`] owns the fallback order and the shared deadline.
//! Unicast backends plug in through the [`Resolve`] trait; the LLMNR client
//! ([`MulticastResolver`]) is configured with its groups at construction so
//! tests can point it at a loopback responder.
//!
//! # Example
//!
//! ```rust,ignore
//! use smbreach::dns::{ResolutionEngine, ResolverConfig};
//! use std::time::Duration;
//!
//! let engine = ResolutionEngine::new(ResolverConfig::default());
//! let addrs = engine.resolve("fileserver", Duration::from_secs(3)).await?;
//! for addr in addrs {
//!     println!("Resolved: {}", addr);
//! }
//! ```

mod budget;
mod config;
mod engine;
mod gai;
mod hickory;
pub mod ipset;
pub mod llmnr;
mod resolve;
mod unicast;

pub use budget::ResolutionBudget;
pub use config::{
    MulticastConfig, ResolverConfig, UnicastBackend, LLMNR_IPV4_GROUP, LLMNR_IPV6_GROUP,
    LLMNR_PORT,
};
pub use engine::{ResolutionEngine, Strategy, Tier};
pub use gai::GaiResolver;
pub use hickory::HickoryResolver;
pub use ipset::{dedupe, dedupe_present, IpSet};
pub use llmnr::MulticastResolver;
pub use resolve::{Addrs, Name, Resolve, ResolverWithOverrides, Resolving};
pub use unicast::UnicastResolver;
