//! Server address parsing.
//!
//! Splits a user supplied `host`, `host:port`, `[v6]` or `[v6]:port`
//! string into a [`HostSpec`], defaulting the port to SMB's 445.

use crate::base::neterror::NetError;
use std::{fmt, net::IpAddr};

const MISSING_PORT: &str = "missing port in address";
const TOO_MANY_COLONS: &str = "too many colons in address";

/// A server address split into host and port.
///
/// `host` is either an IP literal (without brackets) or a name that still
/// needs resolving. The port is always populated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostSpec {
    host: String,
    port: u16,
}

impl HostSpec {
    /// Port used when the address does not carry one.
    pub const DEFAULT_PORT: u16 = 445;

    /// Parses a raw server address.
    ///
    /// # Example
    ///
    /// ```rust
    /// use smbreach::target::HostSpec;
    ///
    /// let spec = HostSpec::parse("fileserver:1445").unwrap();
    /// assert_eq!(spec.host(), "fileserver");
    /// assert_eq!(spec.port(), 1445);
    ///
    /// let spec = HostSpec::parse("[2001:db8::1]").unwrap();
    /// assert_eq!(spec.host(), "2001:db8::1");
    /// assert_eq!(spec.port(), 445);
    /// ```
    pub fn parse(address: &str) -> Result<Self, NetError> {
        if address.is_empty() {
            return Err(NetError::EmptyAddress);
        }

        if address.starts_with('[') && address.ends_with(']') {
            return Self::with_default_port(address, trim_brackets(address));
        }

        match split_host_port(address) {
            Ok((host, port)) => {
                let port = if port.is_empty() {
                    Self::DEFAULT_PORT
                } else {
                    port.parse::<u16>().map_err(|e| {
                        NetError::address_parse(address, format!("invalid port {port:?}: {e}"))
                    })?
                };
                Self::new_checked(address, host, port)
            }
            Err(MISSING_PORT) => {
                if address.starts_with('[') {
                    Self::with_default_port(address, trim_brackets(address))
                } else {
                    Self::with_default_port(address, address)
                }
            }
            Err(reason) => {
                // Bare IPv6 literals trip the colon check but are unambiguous.
                if address.parse::<IpAddr>().is_ok() {
                    return Self::with_default_port(address, address);
                }
                Err(NetError::address_parse(address, reason))
            }
        }
    }

    fn with_default_port(address: &str, host: &str) -> Result<Self, NetError> {
        Self::new_checked(address, host, Self::DEFAULT_PORT)
    }

    fn new_checked(address: &str, host: &str, port: u16) -> Result<Self, NetError> {
        if host.is_empty() {
            return Err(NetError::address_parse(address, "missing host"));
        }
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the host as an IP address when it is a literal.
    pub fn ip_literal(&self) -> Option<IpAddr> {
        self.host.parse().ok()
    }
}

impl fmt::Display for HostSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl std::str::FromStr for HostSpec {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Strips every leading and trailing bracket, so `[[::1]]` yields `::1`.
fn trim_brackets(s: &str) -> &str {
    s.trim_matches(|c| c == '[' || c == ']')
}

/// Splits `host:port` / `[host]:port` on the last colon.
///
/// Follows the usual host:port grammar: bracketed hosts must be followed by
/// `:port`, unbracketed hosts may not contain a colon, and stray brackets are
/// rejected. The port is returned unvalidated and may be empty.
fn split_host_port(hostport: &str) -> Result<(&str, &str), &'static str> {
    let i = hostport.rfind(':').ok_or(MISSING_PORT)?;

    let (host, j, k) = if hostport.starts_with('[') {
        let end = hostport.find(']').ok_or("missing ']' in address")?;
        if end + 1 == hostport.len() {
            return Err(MISSING_PORT);
        }
        if end + 1 != i {
            if hostport.as_bytes()[end + 1] == b':' {
                return Err(TOO_MANY_COLONS);
            }
            return Err(MISSING_PORT);
        }
        (&hostport[1..end], 1, end + 1)
    } else {
        let host = &hostport[..i];
        if host.contains(':') {
            return Err(TOO_MANY_COLONS);
        }
        (host, 0, 0)
    };

    if hostport[j..].contains('[') {
        return Err("unexpected '[' in address");
    }
    if hostport[k..].contains(']') {
        return Err("unexpected ']' in address");
    }

    Ok((host, &hostport[i + 1..]))
}
