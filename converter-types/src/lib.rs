//! # Converter Types
//!
//! Domain types and port traits for the currency converter.
//! This crate has ZERO external IO dependencies - only data structures,
//! invariants, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (CurrencyCode, Amount, RateTable, CurrencyCatalog)
//! - `ports/` - Trait definitions that provider adapters must implement
//! - `error/` - Domain, provider, catalog and configuration error types

pub mod domain;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Amount, ConversionInput, ConversionResult, CurrencyCatalog, CurrencyCode, CurrencyInfo,
    RatePoint, RateTable,
};
pub use error::{CatalogError, ConfigError, DomainError, ProviderError};
pub use ports::{CatalogProvider, RateProvider};
