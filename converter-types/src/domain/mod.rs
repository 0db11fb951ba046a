//! Domain models for the currency converter.

pub mod catalog;
pub mod conversion;
pub mod currency;
pub mod money;
pub mod rates;

pub use catalog::{CurrencyCatalog, CurrencyInfo};
pub use conversion::{ConversionInput, ConversionResult, RESULT_SCALE};
pub use currency::CurrencyCode;
pub use money::Amount;
pub use rates::{RatePoint, RateTable};
