//! # Converter Client
//!
//! HTTP adapters implementing the provider ports:
//! - [`FixerClient`] - exchange rates keyed by a requested base currency
//! - [`RestCountriesClient`] - currency names and representative countries

mod countries;
mod fixer;

pub use countries::{DEFAULT_COUNTRIES_URL, RestCountriesClient};
pub use fixer::{ACCESS_KEY_VAR, DEFAULT_FIXER_URL, FixerClient};
