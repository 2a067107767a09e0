//! Resolver configuration.

use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    time::Duration,
};

/// LLMNR IPv4 link-scope multicast group (RFC 4795).
pub const LLMNR_IPV4_GROUP: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 252);
/// LLMNR IPv6 link-scope multicast group (RFC 4795).
pub const LLMNR_IPV6_GROUP: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 1, 3);
/// LLMNR port.
pub const LLMNR_PORT: u16 = 5355;

/// Multicast (LLMNR) resolver settings.
#[derive(Debug, Clone)]
pub struct MulticastConfig {
    /// IPv4 destination for queries
    pub ipv4_group: SocketAddr,
    /// IPv6 destination for queries, sent best-effort
    pub ipv6_group: SocketAddr,
    /// Local address the query socket binds to. The unspecified IPv6
    /// address opens a dual-stack socket that reaches both groups.
    pub bind_addr: SocketAddr,
    /// Floor applied to non-positive collection windows
    pub min_timeout: Duration,
    /// Receive buffer size per datagram
    pub max_datagram: usize,
}

impl Default for MulticastConfig {
    fn default() -> Self {
        Self {
            ipv4_group: SocketAddr::new(IpAddr::V4(LLMNR_IPV4_GROUP), LLMNR_PORT),
            ipv6_group: SocketAddr::new(IpAddr::V6(LLMNR_IPV6_GROUP), LLMNR_PORT),
            bind_addr: SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
            min_timeout: Duration::from_millis(500),
            max_datagram: 1500,
        }
    }
}

impl MulticastConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the IPv4 query destination.
    pub fn ipv4_group(mut self, addr: SocketAddr) -> Self {
        self.ipv4_group = addr;
        self
    }

    /// Set the IPv6 query destination.
    pub fn ipv6_group(mut self, addr: SocketAddr) -> Self {
        self.ipv6_group = addr;
        self
    }

    /// Set the local bind address.
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the minimum collection window.
    pub fn min_timeout(mut self, timeout: Duration) -> Self {
        self.min_timeout = timeout;
        self
    }
}

/// Which unicast lookup backend the engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnicastBackend {
    /// getaddrinfo on the blocking pool
    #[default]
    System,
    /// hickory-dns async resolver
    Hickory,
}

/// Resolution engine settings.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Budget used when the caller passes a zero timeout
    pub timeout: Duration,
    /// Suffix tried after the exact name
    pub local_suffix: String,
    /// Unicast lookup backend
    pub backend: UnicastBackend,
    /// Static name to address table consulted before the backend
    pub overrides: HashMap<String, Vec<IpAddr>>,
    /// Whether the LLMNR tiers run at all
    pub multicast_enabled: bool,
    /// LLMNR settings
    pub multicast: MulticastConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3),
            local_suffix: ".local".to_string(),
            backend: UnicastBackend::System,
            overrides: HashMap::new(),
            multicast_enabled: true,
            multicast: MulticastConfig::default(),
        }
    }
}

impl ResolverConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the unicast backend.
    pub fn backend(mut self, backend: UnicastBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Add a static host entry.
    pub fn host_override(mut self, name: impl Into<String>, addrs: Vec<IpAddr>) -> Self {
        self.overrides.insert(name.into(), addrs);
        self
    }

    /// Enable or disable the LLMNR tiers.
    pub fn multicast_enabled(mut self, enable: bool) -> Self {
        self.multicast_enabled = enable;
        self
    }

    /// Set LLMNR settings.
    pub fn multicast(mut self, multicast: MulticastConfig) -> Self {
        self.multicast = multicast;
        self
    }
}
