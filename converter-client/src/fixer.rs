//! Rate provider backed by a Fixer-style `latest` endpoint.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use converter_types::{ConfigError, CurrencyCode, ProviderError, RateProvider, RateTable};

/// Default endpoint for the latest rates.
pub const DEFAULT_FIXER_URL: &str = "https://data.fixer.io/api/latest";

/// Environment variable holding the provider credential.
pub const ACCESS_KEY_VAR: &str = "FIXER_API_KEY";

/// Body of a `latest` response, successful or not.
#[derive(Debug, Deserialize)]
struct RatesPayload {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    rates: Option<HashMap<String, f64>>,
    #[serde(default)]
    error: Option<RemoteError>,
}

#[derive(Debug, Deserialize)]
struct RemoteError {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    info: Option<String>,
}

impl RatesPayload {
    fn into_table(
        self,
        base: CurrencyCode,
        fetched_at: DateTime<Utc>,
    ) -> Result<RateTable, ProviderError> {
        if !self.success {
            let message = self
                .error
                .and_then(|e| e.info.or(e.kind))
                .unwrap_or_else(|| "rate provider reported a failure".to_string());
            return Err(ProviderError::Remote(message));
        }

        let rates = self
            .rates
            .ok_or_else(|| ProviderError::InvalidPayload("missing rates".into()))?;

        let rates = rates
            .into_iter()
            .map(|(code, rate)| Ok((CurrencyCode::new(code)?, rate)))
            .collect::<Result<Vec<_>, ProviderError>>()?;

        Ok(RateTable::new(base, rates, fetched_at)?)
    }
}

/// Rate provider client.
///
/// Sends `access_key` and `base` as query parameters on every request.
pub struct FixerClient {
    endpoint: String,
    access_key: String,
    http: Client,
}

impl FixerClient {
    /// Creates a new client. An empty credential is a configuration error.
    pub fn new(
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let access_key = access_key.into();
        if access_key.trim().is_empty() {
            return Err(ConfigError::Missing(ACCESS_KEY_VAR));
        }
        Ok(Self {
            endpoint: endpoint.into(),
            access_key,
            http: Client::new(),
        })
    }

    /// Replaces the underlying HTTP client (timeouts, proxies, ...).
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl RateProvider for FixerClient {
    #[instrument(skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: &CurrencyCode) -> Result<RateTable, ProviderError> {
        debug!("Requesting rates from {}", self.endpoint);

        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[("access_key", self.access_key.as_str()), ("base", base.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        let status_failure = || {
            ProviderError::Transport(format!(
                "Request failed with status code {}",
                status.as_u16()
            ))
        };

        // Error statuses keep the provider's message only when it sent one.
        let payload = match serde_json::from_str::<RatesPayload>(&body) {
            Ok(payload) if !status.is_success() && payload.error.is_none() => {
                return Err(status_failure());
            }
            Ok(payload) => payload,
            Err(_) if !status.is_success() => return Err(status_failure()),
            Err(e) => return Err(ProviderError::InvalidPayload(e.to_string())),
        };

        match payload.into_table(base.clone(), Utc::now()) {
            Ok(table) => {
                debug!(count = table.len(), "Fetched rate table");
                Ok(table)
            }
            Err(e) => {
                warn!(error = %e, "Rate provider rejected request");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<RateTable, ProviderError> {
        let payload: RatesPayload = serde_json::from_str(body).unwrap();
        payload.into_table(CurrencyCode::eur(), Utc::now())
    }

    #[test]
    fn test_client_creation() {
        let client = FixerClient::new(DEFAULT_FIXER_URL, "secret").unwrap();
        assert_eq!(client.endpoint(), DEFAULT_FIXER_URL);
        assert_eq!(client.access_key, "secret");
    }

    #[test]
    fn test_client_requires_access_key() {
        let result = FixerClient::new(DEFAULT_FIXER_URL, "  ");
        assert!(matches!(result, Err(ConfigError::Missing(ACCESS_KEY_VAR))));
    }

    #[test]
    fn test_successful_payload() {
        let table = parse(
            r#"{"success":true,"base":"EUR","rates":{"USD":1.1,"GBP":0.85}}"#,
        )
        .unwrap();
        assert_eq!(table.base().as_str(), "EUR");
        assert_eq!(table.rate(&"USD".parse().unwrap()), Some(1.1));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_failure_payload_carries_info() {
        let result = parse(
            r#"{"success":false,"error":{"code":101,"type":"invalid_access_key","info":"invalid access key"}}"#,
        );
        assert_eq!(
            result,
            Err(ProviderError::Remote("invalid access key".into()))
        );
    }

    #[test]
    fn test_failure_payload_without_info_uses_type() {
        let result = parse(r#"{"success":false,"error":{"code":105,"type":"base_currency_access_restricted"}}"#);
        assert_eq!(
            result,
            Err(ProviderError::Remote("base_currency_access_restricted".into()))
        );
    }

    #[test]
    fn test_success_without_rates_is_invalid() {
        assert!(matches!(
            parse(r#"{"success":true}"#),
            Err(ProviderError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_non_positive_rate_is_invalid() {
        assert!(matches!(
            parse(r#"{"success":true,"rates":{"USD":0}}"#),
            Err(ProviderError::InvalidPayload(_))
        ));
    }
}
