//! Exchange rate provider port.
//!
//! This trait defines the interface for exchange rate services.
//! Implementations can be HTTP clients, mock providers, etc.

use crate::domain::{CurrencyCode, RateTable};
use crate::error::ProviderError;

/// Port trait for exchange rate providers.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetch every rate the provider knows relative to `base`.
    ///
    /// `base` is passed through as-is; it is not checked against a list of
    /// known codes. On error no partial table is returned.
    async fn fetch_rates(&self, base: &CurrencyCode) -> Result<RateTable, ProviderError>;
}
