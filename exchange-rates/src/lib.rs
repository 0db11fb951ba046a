//! Pivot-Based Conversion Engine
//!
//! Computes converted amounts from a fetched [`RateTable`]. Every rate in a
//! table is read as "units of that currency per one unit of the pivot anchor",
//! and cross rates are derived by dividing out and multiplying through the
//! anchor.
//!
//! # Pivot anchor
//! The anchor is chosen by [`PivotAnchor`]:
//! - `Fixed(code)` always treats `code` as the anchor, whatever `base` the
//!   table was fetched with. `Fixed(EUR)` is the default.
//! - `TableBase` uses the table's own `base`.
//!
//! # Example
//! ```
//! use chrono::Utc;
//! use converter_types::{Amount, CurrencyCode, RateTable};
//! use exchange_rates::{convert, PivotAnchor};
//!
//! let usd: CurrencyCode = "USD".parse().unwrap();
//! let gbp: CurrencyCode = "GBP".parse().unwrap();
//! let table = RateTable::new(
//!     CurrencyCode::eur(),
//!     vec![(usd.clone(), 1.1), (gbp.clone(), 0.85)],
//!     Utc::now(),
//! )
//! .unwrap();
//!
//! let result = convert(&table, &usd, &gbp, Amount::new(10.0).unwrap(), &PivotAnchor::default());
//! assert_eq!(result.unwrap().to_string(), "7.7273");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use converter_types::{
    Amount, ConversionInput, ConversionResult, CurrencyCode, DomainError, RateTable,
};

// ─────────────────────────────────────────────────────────────────────────────
// Pivot Anchor
// ─────────────────────────────────────────────────────────────────────────────

/// Which currency the rate arithmetic treats as its implicit base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotAnchor {
    /// A single code, regardless of the table's requested base.
    Fixed(CurrencyCode),
    /// The table's own `base`.
    TableBase,
}

impl PivotAnchor {
    /// Resolves the anchor code for `table`.
    pub fn resolve<'a>(&'a self, table: &'a RateTable) -> &'a CurrencyCode {
        match self {
            PivotAnchor::Fixed(code) => code,
            PivotAnchor::TableBase => table.base(),
        }
    }
}

impl Default for PivotAnchor {
    fn default() -> Self {
        PivotAnchor::Fixed(CurrencyCode::eur())
    }
}

impl fmt::Display for PivotAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PivotAnchor::Fixed(code) => write!(f, "{}", code),
            PivotAnchor::TableBase => write!(f, "base"),
        }
    }
}

impl FromStr for PivotAnchor {
    type Err = DomainError;

    /// `"base"` or `"table-base"` select [`PivotAnchor::TableBase`]; anything
    /// else is read as a fixed currency code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base" | "table-base" | "table_base" => Ok(PivotAnchor::TableBase),
            _ => Ok(PivotAnchor::Fixed(s.parse()?)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Converts `amount` of `from` into `to` using `table`.
///
/// Rules, first match wins:
/// 1. `from` is the anchor and `to` has a rate: `amount * rate[to]`.
/// 2. `to` is the anchor and `from` has a rate: `amount / rate[from]`.
/// 3. both have rates: `amount / rate[from] * rate[to]`.
/// 4. otherwise `None`.
///
/// Results are rounded to four decimal places. Never panics; anything not
/// computable (including overflow) is `None`.
pub fn convert(
    table: &RateTable,
    from: &CurrencyCode,
    to: &CurrencyCode,
    amount: Amount,
    anchor: &PivotAnchor,
) -> Option<ConversionResult> {
    let pivot = anchor.resolve(table);
    let amount = amount.value();

    let raw = match (table.rate(from), table.rate(to)) {
        (_, Some(to_rate)) if from == pivot => amount * to_rate,
        (Some(from_rate), _) if to == pivot => amount / from_rate,
        (Some(from_rate), Some(to_rate)) => (amount / from_rate) * to_rate,
        _ => return None,
    };

    ConversionResult::rounded(raw)
}

/// A conversion engine bound to one pivot policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionEngine {
    anchor: PivotAnchor,
}

impl ConversionEngine {
    pub fn new(anchor: PivotAnchor) -> Self {
        Self { anchor }
    }

    pub fn anchor(&self) -> &PivotAnchor {
        &self.anchor
    }

    /// Converts the current selections against `table`.
    pub fn convert(&self, table: &RateTable, input: &ConversionInput) -> Option<ConversionResult> {
        convert(table, &input.from, &input.to, input.amount, &self.anchor)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
