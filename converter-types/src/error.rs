//! Error types for the currency converter.

/// Domain-level errors (invariant violations on values).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid currency code: {0:?}")]
    InvalidCurrencyCode(String),

    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("Amount must be a finite number")]
    InvalidAmount,

    #[error("Rate for {code} must be a positive number, got {rate}")]
    NonPositiveRate { code: String, rate: f64 },

    #[error("Rate table for {0} contains no rates")]
    EmptyRateTable(String),
}

/// Rate provider errors.
///
/// `Transport` and `Remote` display as the bare diagnostic so callers can
/// surface the provider's message verbatim.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Remote(String),

    #[error("Invalid rate payload: {0}")]
    InvalidPayload(String),
}

impl From<DomainError> for ProviderError {
    fn from(err: DomainError) -> Self {
        ProviderError::InvalidPayload(err.to_string())
    }
}

/// Currency metadata errors.
///
/// Deliberately coarse: the catalog only enriches labels.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to load currency metadata")]
    Unavailable,
}

/// Configuration errors, raised before any network call is made.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_displays_verbatim() {
        let err = ProviderError::Remote("invalid access key".into());
        assert_eq!(err.to_string(), "invalid access key");
    }

    #[test]
    fn test_domain_error_maps_to_invalid_payload() {
        let err: ProviderError = DomainError::EmptyRateTable("EUR".into()).into();
        assert!(matches!(err, ProviderError::InvalidPayload(_)));
    }

    #[test]
    fn test_missing_config_message() {
        let err = ConfigError::Missing("FIXER_API_KEY");
        assert_eq!(
            err.to_string(),
            "FIXER_API_KEY environment variable is required"
        );
    }
}
