//! Locale Lend Core Modules
//!
//! Pure computation (trust scoring, distance, ranking) plus the one stateful
//! piece: an injected expiring store and the one-time code ledger built on it.

pub mod expiring;
pub mod geo;
pub mod otp;
pub mod ranking;
pub mod trust;

pub use expiring::{Clock, ExpiringStore, Lookup, ManualClock, SystemClock, Take};
pub use otp::OneTimeCodes;
pub use ranking::RankOptions;
pub use trust::TrustEngine;
