//! Base types and error handling.
//!
//! - [`NetError`](neterror::NetError): every failure surfaced by parsing, resolution and connection setup
//! - [`IoResultExt`](context::IoResultExt): IO error context helpers

pub mod context;
pub mod neterror;
