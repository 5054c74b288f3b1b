//! Commands
//!
//! Entry points for the glue layer (HTTP handlers, IPC, jobs). Each takes
//! the shared [`LocaleLend`](crate::LocaleLend) state plus raw
//! document-store records, runs them through the record boundary and hands
//! typed values to the core.
//!
//! - **trust**: score a user record
//! - **ranking**: nearby and search listings
//! - **verification**: issue and check one-time email codes

pub mod ranking;
pub mod trust;
pub mod verification;
