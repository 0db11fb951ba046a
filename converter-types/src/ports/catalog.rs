//! Currency metadata provider port.

use crate::domain::CurrencyCatalog;
use crate::error::CatalogError;

/// Port trait for currency metadata sources.
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch the code → {name, country} lookup, first occurrence winning.
    async fn fetch_catalog(&self) -> Result<CurrencyCatalog, CatalogError>;
}
