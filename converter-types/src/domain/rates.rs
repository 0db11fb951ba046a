//! Rate tables fetched from the rate provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::CurrencyCode;
use crate::error::DomainError;

/// A snapshot of exchange rates relative to `base`.
///
/// Every rate is finite and strictly positive, and the table is never empty.
/// Tables are replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTable {
    base: CurrencyCode,
    rates: BTreeMap<CurrencyCode, f64>,
    fetched_at: DateTime<Utc>,
}

/// One (code, rate) point of the series handed to charting consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    pub code: CurrencyCode,
    pub rate: f64,
}

impl RateTable {
    pub fn new(
        base: CurrencyCode,
        rates: impl IntoIterator<Item = (CurrencyCode, f64)>,
        fetched_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let mut table = BTreeMap::new();
        for (code, rate) in rates {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(DomainError::NonPositiveRate {
                    code: code.to_string(),
                    rate,
                });
            }
            table.insert(code, rate);
        }
        if table.is_empty() {
            return Err(DomainError::EmptyRateTable(base.to_string()));
        }
        Ok(Self {
            base,
            rates: table,
            fetched_at,
        })
    }

    /// The code that was requested as `base` from the provider.
    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn rate(&self, code: &CurrencyCode) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.rates.contains_key(code)
    }

    /// All codes in lexicographic order.
    pub fn codes(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.rates.keys()
    }

    /// The lexicographically smallest code.
    pub fn first_code(&self) -> &CurrencyCode {
        // Non-empty by construction.
        self.rates
            .keys()
            .next()
            .unwrap_or(&self.base)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Rates as an ordered (code, rate) series.
    pub fn series(&self) -> Vec<RatePoint> {
        self.rates
            .iter()
            .map(|(code, rate)| RatePoint {
                code: code.clone(),
                rate: *rate,
            })
            .collect()
    }
}
