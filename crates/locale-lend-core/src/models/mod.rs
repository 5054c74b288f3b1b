//! Locale Lend Data Models
//!
//! Typed values consumed and produced by the core, plus the loose
//! document-store record shapes they are validated from.

pub mod geo;
pub mod item;
pub mod record;
pub mod trust;

pub use geo::*;
pub use item::*;
pub use record::*;
pub use trust::*;
