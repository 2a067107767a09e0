//! User-facing target parsing.
//!
//! - [`HostSpec`]: `host[:port]` / `[v6][:port]` server addresses
//! - [`RemotePath`]: share-relative paths in canonical form

pub mod hostspec;
pub mod remotepath;

pub use hostspec::HostSpec;
pub use remotepath::{normalize, RemotePath};
