//! Conversion inputs and results.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Amount, CurrencyCode};

/// Number of decimal places every conversion result is rounded to.
pub const RESULT_SCALE: i32 = 4;

/// The user's current selections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionInput {
    pub amount: Amount,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl ConversionInput {
    pub fn new(amount: Amount, from: CurrencyCode, to: CurrencyCode) -> Self {
        Self { amount, from, to }
    }

    /// Exchanges `from` and `to`.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }
}

impl Default for ConversionInput {
    fn default() -> Self {
        Self {
            amount: Amount::default(),
            from: CurrencyCode::eur(),
            to: CurrencyCode::usd(),
        }
    }
}

/// A converted amount, always rounded to [`RESULT_SCALE`] decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConversionResult {
    value: f64,
}

impl ConversionResult {
    /// Rounds `raw` half away from zero, judged on the exact decimal value
    /// of the float rather than on a scaled copy of it. Non-finite input
    /// yields `None`.
    pub fn rounded(raw: f64) -> Option<Self> {
        if !raw.is_finite() {
            return None;
        }
        // No fractional digits left at this magnitude.
        if raw.abs() >= 1e15 {
            return Some(Self { value: raw });
        }

        // Every f64 below 1e15 that can sit on a tie expands exactly within
        // 80 fractional digits.
        let exact = format!("{:.80}", raw.abs());
        let (whole, fraction) = exact.split_once('.')?;
        let scale = RESULT_SCALE as usize;
        let divisor = 10u128.pow(RESULT_SCALE as u32);

        let mut units =
            whole.parse::<u128>().ok()? * divisor + fraction[..scale].parse::<u128>().ok()?;
        if fraction.as_bytes()[scale] >= b'5' {
            units += 1;
        }

        let value: f64 = format!("{}.{:0width$}", units / divisor, units % divisor, width = scale)
            .parse()
            .ok()?;
        let value = if raw.is_sign_negative() && value != 0.0 { -value } else { value };
        Some(Self { value })
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", RESULT_SCALE as usize, self.value)
    }
}
