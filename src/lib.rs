//! # smbreach
//!
//! Finding an SMB file server on a small network.
//!
//! Home and small office file servers frequently have no entry in any DNS
//! server; they announce themselves only by multicast name resolution.
//! `smbreach` takes the address a user typed and produces something an SMB
//! client can dial, and normalizes the share paths it will be asked for.
//!
//! ## Features
//!
//! - **Address parsing**: `host`, `host:port`, `[v6]`, `[v6]:port`, default port 445
//! - **Tiered resolution**: unicast lookup, `.local` suffix, LLMNR multicast fallback,
//!   all under one deadline
//! - **Path normalization**: Windows or POSIX input to a share-relative path
//! - **Connect job**: dial resolved candidates in preference order
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use smbreach::dns::{ResolutionEngine, ResolverConfig};
//! use smbreach::socket::ConnectJob;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = ResolutionEngine::new(ResolverConfig::default());
//!     let connected = ConnectJob::new(&engine, Duration::from_secs(10))
//!         .connect_address("fileserver")
//!         .await
//!         .unwrap();
//!     println!("Connected to {}", connected.peer);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error type and error context helpers
//! - [`target`] - Server address and remote path parsing
//! - [`dns`] - Unicast and LLMNR resolution engine
//! - [`socket`] - Connection setup

pub mod base;
pub mod dns;
pub mod socket;
pub mod target;

pub use base::neterror::NetError;
