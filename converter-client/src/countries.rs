//! Currency metadata from a REST Countries style endpoint.

use std::collections::BTreeMap;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use converter_types::{CatalogError, CatalogProvider, CurrencyCatalog, CurrencyCode, CurrencyInfo};

/// Default endpoint listing every country with its name and currencies.
pub const DEFAULT_COUNTRIES_URL: &str = "https://restcountries.com/v3.1/all?fields=name,currencies";

#[derive(Debug, Deserialize)]
struct CountryRecord {
    #[serde(default)]
    name: Option<CountryName>,
    #[serde(default)]
    currencies: Option<BTreeMap<String, CurrencyEntry>>,
}

#[derive(Debug, Deserialize)]
struct CountryName {
    #[serde(default)]
    common: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrencyEntry {
    #[serde(default)]
    name: Option<String>,
}

/// Flattens country records into a catalog, first record winning per code.
fn build_catalog(records: Vec<CountryRecord>) -> CurrencyCatalog {
    let mut catalog = CurrencyCatalog::new();
    for record in records {
        let Some(currencies) = record.currencies else {
            continue;
        };
        let country = record
            .name
            .and_then(|n| n.common)
            .unwrap_or_default();

        for (code, entry) in currencies {
            let Ok(code) = CurrencyCode::new(&code) else {
                debug!(code = %code, "Skipping malformed currency code");
                continue;
            };
            catalog.insert_if_absent(
                code,
                CurrencyInfo {
                    name: entry.name.unwrap_or_default(),
                    country: country.clone(),
                },
            );
        }
    }
    catalog
}

/// Currency catalog client.
pub struct RestCountriesClient {
    endpoint: String,
    http: Client,
}

impl RestCountriesClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: Client::new(),
        }
    }

    /// Replaces the underlying HTTP client.
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_records(&self) -> Result<Vec<CountryRecord>, reqwest::Error> {
        self.http
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

impl Default for RestCountriesClient {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRIES_URL)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for RestCountriesClient {
    #[instrument(skip(self))]
    async fn fetch_catalog(&self) -> Result<CurrencyCatalog, CatalogError> {
        match self.fetch_records().await {
            Ok(records) => {
                let catalog = build_catalog(records);
                debug!(count = catalog.len(), "Fetched currency catalog");
                Ok(catalog)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load currency metadata");
                Err(CatalogError::Unavailable)
            }
        }
    }
}
