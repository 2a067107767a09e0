//! Connection setup.
//!
//! - [`connectjob`]: server address → resolution → TCP, dialing candidates in order

pub mod connectjob;

pub use connectjob::{ConnectJob, Connected};
