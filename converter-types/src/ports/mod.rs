//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The session layer depends on these traits, not concrete implementations.

mod catalog;
mod exchange;

pub use catalog::CatalogProvider;
pub use exchange::RateProvider;
