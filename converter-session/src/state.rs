//! Session states, events and snapshots.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use converter_types::{
    ConversionInput, ConversionResult, CurrencyCatalog, CurrencyCode, RatePoint, RateTable,
};
use exchange_rates::PivotAnchor;

/// Lifecycle of a conversion session.
///
/// `Ready` is the only state in which a conversion result is exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    LoadingCatalog,
    LoadingRatesInitial,
    Ready,
    LoadingRates,
    /// Holds the raw diagnostic of the failed provider call.
    Error(String),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            SessionState::LoadingCatalog
                | SessionState::LoadingRatesInitial
                | SessionState::LoadingRates
        )
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SessionState::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::LoadingCatalog => write!(f, "loading-catalog"),
            SessionState::LoadingRatesInitial => write!(f, "loading-rates-initial"),
            SessionState::Ready => write!(f, "ready"),
            SessionState::LoadingRates => write!(f, "loading-rates"),
            SessionState::Error(_) => write!(f, "error"),
        }
    }
}

/// Notifications broadcast to session subscribers.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    StateChanged(SessionState),
    CatalogLoaded(Arc<CurrencyCatalog>),
    RatesReplaced(Arc<RateTable>),
    /// The target code was missing from a new table and was replaced.
    TargetReassigned {
        previous: CurrencyCode,
        current: CurrencyCode,
    },
    ResultUpdated(Option<ConversionResult>),
    /// A rate response arrived after a newer request had been issued.
    StaleRatesDiscarded {
        generation: u64,
        base: CurrencyCode,
    },
}

/// Construction parameters for a session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub initial: ConversionInput,
    pub pivot: PivotAnchor,
}

/// Entry for a currency picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyOption {
    pub code: CurrencyCode,
    pub label: Option<String>,
}

/// Point-in-time view of a session, for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub input: ConversionInput,
    pub result: Option<ConversionResult>,
    pub table: Option<Arc<RateTable>>,
    pub catalog: Option<Arc<CurrencyCatalog>>,
}

impl SessionSnapshot {
    /// Codes of the current table in lexicographic order, labelled from the
    /// catalog where it knows them.
    pub fn currency_options(&self) -> Vec<CurrencyOption> {
        let Some(table) = &self.table else {
            return Vec::new();
        };
        table
            .codes()
            .map(|code| CurrencyOption {
                code: code.clone(),
                label: self.catalog.as_ref().and_then(|c| c.label(code)),
            })
            .collect()
    }

    /// (code, rate) series of the current table.
    pub fn series(&self) -> Vec<RatePoint> {
        self.table
            .as_ref()
            .map(|t| t.series())
            .unwrap_or_default()
    }
}

/// Errors returned by [`crate::SessionHandle`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Conversion session has shut down")]
    Closed,
}
