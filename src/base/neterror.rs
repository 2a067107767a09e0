use std::{io, sync::Arc};
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum NetError {
    // Address Errors
    #[error("server address is required")]
    EmptyAddress,
    #[error("parse server address {address:?}: {reason}")]
    AddressParse { address: String, reason: String },

    // Resolution Errors
    #[error("name not resolved: {domain}: {source}")]
    NameNotResolvedFor {
        domain: String,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("no IP addresses returned for {host}")]
    NoAddresses { host: String },
    #[error("no LLMNR responses for {host}")]
    NoResponses { host: String },
    #[error("resolution of {host} cancelled: deadline exceeded")]
    Cancelled { host: String },
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },
    #[error("no IP addresses found for {host}")]
    NotFound { host: String },
    #[error("resolve host {host}: {source}")]
    ResolutionFailed {
        host: String,
        #[source]
        source: Box<NetError>,
    },

    // Socket Errors
    #[error("socket {op} failed: {source}")]
    Socket {
        op: &'static str,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("connection to {host}:{port} failed: {source}")]
    ConnectionFailedTo {
        host: String,
        port: u16,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("connection to {host}:{port} timed out")]
    ConnectionTimedOut { host: String, port: u16 },
}

impl NetError {
    pub(crate) fn dns_failed(domain: &str, e: io::Error) -> Self {
        NetError::NameNotResolvedFor {
            domain: domain.to_string(),
            source: Arc::new(e),
        }
    }

    pub(crate) fn socket(op: &'static str, e: io::Error) -> Self {
        NetError::Socket {
            op,
            source: Arc::new(e),
        }
    }

    pub(crate) fn connection_failed_to(host: &str, port: u16, e: io::Error) -> Self {
        NetError::ConnectionFailedTo {
            host: host.to_string(),
            port,
            source: Arc::new(e),
        }
    }

    pub(crate) fn address_parse(address: &str, reason: impl Into<String>) -> Self {
        NetError::AddressParse {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// True for the "nothing answered" family of failures, as opposed to
    /// a concrete error from the resolver or the socket layer.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            NetError::NoAddresses { .. } | NetError::NoResponses { .. } | NetError::NotFound { .. }
        )
    }

    /// Chromium-style numeric code, used as a structured log field.
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::Cancelled { .. } => -3,
            NetError::ConnectionTimedOut { .. } => -118,
            NetError::ConnectionFailedTo { .. } => -104,
            NetError::NameNotResolvedFor { .. } => -105,
            NetError::EmptyAddress | NetError::AddressParse { .. } => -108,
            NetError::InvalidName { .. } => -300,
            NetError::NoAddresses { .. } | NetError::NotFound { .. } => -105,
            NetError::NoResponses { .. } => -105,
            NetError::ResolutionFailed { .. } => -137,
            NetError::Socket { .. } => -15,
        }
    }
}
