//! Human-readable currency metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::CurrencyCode;

/// Display metadata for a single currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub name: String,
    pub country: String,
}

/// Lookup of currency code to display metadata.
///
/// The first entry seen for a code wins; later duplicates are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCatalog {
    entries: BTreeMap<CurrencyCode, CurrencyInfo>,
}

impl CurrencyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from entries in source order.
    pub fn from_entries(entries: impl IntoIterator<Item = (CurrencyCode, CurrencyInfo)>) -> Self {
        let mut catalog = Self::new();
        for (code, info) in entries {
            catalog.insert_if_absent(code, info);
        }
        catalog
    }

    /// Installs `info` under `code` unless the code is already present.
    /// Returns whether the entry was installed.
    pub fn insert_if_absent(&mut self, code: CurrencyCode, info: CurrencyInfo) -> bool {
        if self.entries.contains_key(&code) {
            return false;
        }
        self.entries.insert(code, info);
        true
    }

    pub fn get(&self, code: &CurrencyCode) -> Option<&CurrencyInfo> {
        self.entries.get(code)
    }

    /// Picker label: `"name — country"`.
    pub fn label(&self, code: &CurrencyCode) -> Option<String> {
        self.get(code)
            .map(|info| format!("{} — {}", info.name, info.country))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, &CurrencyInfo)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
