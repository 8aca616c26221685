//! Domain models
//!
//! Records of the competition scoring engine and the aggregates derived from them.

pub mod competition;
pub mod entry;
pub mod principal;
pub mod rating;
pub mod rubric;

pub use competition::*;
pub use entry::*;
pub use principal::*;
pub use rating::*;
pub use rubric::*;
