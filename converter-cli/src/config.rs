//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use converter_client::{ACCESS_KEY_VAR, DEFAULT_COUNTRIES_URL, DEFAULT_FIXER_URL};
use converter_types::{ConfigError, CurrencyCode};
use exchange_rates::PivotAnchor;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub fixer_url: String,
    pub fixer_api_key: String,
    pub countries_url: String,
    pub default_from: CurrencyCode,
    pub default_to: CurrencyCode,
    pub pivot: PivotAnchor,
    pub http_timeout: Option<Duration>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let fixer_api_key = lookup(ACCESS_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing(ACCESS_KEY_VAR))?;

        let fixer_url = lookup("FIXER_API_URL").unwrap_or_else(|| DEFAULT_FIXER_URL.to_string());
        let countries_url =
            lookup("COUNTRIES_API_URL").unwrap_or_else(|| DEFAULT_COUNTRIES_URL.to_string());

        let default_from = parse_or(&lookup, "FX_DEFAULT_FROM", CurrencyCode::eur())?;
        let default_to = parse_or(&lookup, "FX_DEFAULT_TO", CurrencyCode::usd())?;
        let pivot = parse_or(&lookup, "FX_PIVOT", PivotAnchor::default())?;

        let http_timeout = lookup("FX_HTTP_TIMEOUT_SECS")
            .map(|secs| {
                secs.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| ConfigError::Invalid {
                        var: "FX_HTTP_TIMEOUT_SECS",
                        reason: e.to_string(),
                    })
            })
            .transpose()?;

        Ok(Self {
            fixer_url,
            fixer_api_key,
            countries_url,
            default_from,
            default_to,
            pivot,
            http_timeout,
        })
    }

    /// Builds the shared HTTP client.
    pub fn http_client(&self) -> anyhow::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.http_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("FIXER_API_KEY"));
        assert_eq!(
            load(&[("FIXER_API_KEY", "  ")]).unwrap_err(),
            ConfigError::Missing("FIXER_API_KEY")
        );
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("FIXER_API_KEY", "secret")]).unwrap();
        assert_eq!(config.fixer_api_key, "secret");
        assert_eq!(config.fixer_url, DEFAULT_FIXER_URL);
        assert_eq!(config.countries_url, DEFAULT_COUNTRIES_URL);
        assert_eq!(config.default_from.as_str(), "EUR");
        assert_eq!(config.default_to.as_str(), "USD");
        assert_eq!(config.pivot, PivotAnchor::default());
        assert_eq!(config.http_timeout, None);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("FIXER_API_KEY", "secret"),
            ("FIXER_API_URL", "http://localhost:9000/latest"),
            ("FX_DEFAULT_FROM", "gbp"),
            ("FX_DEFAULT_TO", "JPY"),
            ("FX_PIVOT", "base"),
            ("FX_HTTP_TIMEOUT_SECS", "15"),
        ])
        .unwrap();
        assert_eq!(config.fixer_url, "http://localhost:9000/latest");
        assert_eq!(config.default_from.as_str(), "GBP");
        assert_eq!(config.default_to.as_str(), "JPY");
        assert_eq!(config.pivot, PivotAnchor::TableBase);
        assert_eq!(config.http_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = load(&[("FIXER_API_KEY", "secret"), ("FX_HTTP_TIMEOUT_SECS", "soon")])
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "FX_HTTP_TIMEOUT_SECS",
                ..
            }
        ));

        let err = load(&[("FIXER_API_KEY", "secret"), ("FX_DEFAULT_FROM", " ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "FX_DEFAULT_FROM", .. }));
    }
}
