//! Conversion session state machine.
//!
//! The session owns the user's selections, the last rate table and the
//! catalog. It performs no IO itself: transitions that need a provider call
//! return an [`Effect`] and the caller feeds the outcome back in.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use converter_types::{
    Amount, CatalogError, ConversionInput, ConversionResult, CurrencyCatalog, CurrencyCode,
    ProviderError, RateTable,
};
use exchange_rates::ConversionEngine;

use crate::state::{SessionConfig, SessionEvent, SessionSnapshot, SessionState};

/// Number of undelivered events a slow subscriber may fall behind by.
pub const EVENT_CAPACITY: usize = 64;

/// A rate fetch the session wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateRequest {
    /// Monotonic token; only the latest issued request is applied.
    pub generation: u64,
    pub base: CurrencyCode,
}

/// Provider calls requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchCatalog,
    FetchRates(RateRequest),
}

/// The session state machine.
pub struct ConversionSession {
    engine: ConversionEngine,
    state: SessionState,
    input: ConversionInput,
    table: Option<Arc<RateTable>>,
    catalog: Option<Arc<CurrencyCatalog>>,
    result: Option<ConversionResult>,
    generation: u64,
    events: broadcast::Sender<SessionEvent>,
}

impl ConversionSession {
    /// Creates an idle session.
    pub fn new(config: SessionConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            engine: ConversionEngine::new(config.pivot),
            state: SessionState::Idle,
            input: config.initial,
            table: None,
            catalog: None,
            result: None,
            generation: 0,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn event_sender(&self) -> broadcast::Sender<SessionEvent> {
        self.events.clone()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn input(&self) -> &ConversionInput {
        &self.input
    }

    pub fn table(&self) -> Option<&RateTable> {
        self.table.as_deref()
    }

    pub fn catalog(&self) -> Option<&CurrencyCatalog> {
        self.catalog.as_deref()
    }

    /// The converted amount, only while `Ready`.
    pub fn current_result(&self) -> Option<ConversionResult> {
        if self.state.is_ready() {
            self.result
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state.clone(),
            input: self.input.clone(),
            result: self.current_result(),
            table: self.table.clone(),
            catalog: self.catalog.clone(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Begins loading the catalog. Only valid once, from `Idle`.
    pub fn start(&mut self) -> Option<Effect> {
        if self.state != SessionState::Idle {
            debug!(state = %self.state, "Ignoring start on a running session");
            return None;
        }
        self.transition(SessionState::LoadingCatalog);
        Some(Effect::FetchCatalog)
    }

    /// Applies the outcome of the catalog fetch.
    pub fn catalog_loaded(
        &mut self,
        result: Result<CurrencyCatalog, CatalogError>,
    ) -> Option<Effect> {
        if self.state != SessionState::LoadingCatalog {
            debug!(state = %self.state, "Ignoring unexpected catalog response");
            return None;
        }

        match result {
            Ok(catalog) => {
                let catalog = Arc::new(catalog);
                self.catalog = Some(Arc::clone(&catalog));
                self.emit(SessionEvent::CatalogLoaded(catalog));
                self.transition(SessionState::LoadingRatesInitial);
                Some(Effect::FetchRates(self.next_request()))
            }
            Err(e) => {
                self.fail(e.to_string());
                None
            }
        }
    }

    /// Applies the outcome of a rate fetch issued as `request`.
    ///
    /// Responses for anything but the latest request are discarded.
    pub fn rates_loaded(&mut self, request: RateRequest, result: Result<RateTable, ProviderError>) {
        if request.generation != self.generation || !self.awaiting_rates() {
            debug!(
                generation = request.generation,
                latest = self.generation,
                base = %request.base,
                "Discarding stale rate response"
            );
            self.emit(SessionEvent::StaleRatesDiscarded {
                generation: request.generation,
                base: request.base,
            });
            return;
        }

        let table = match result {
            Ok(table) => Arc::new(table),
            Err(e) => {
                self.fail(e.to_string());
                return;
            }
        };

        self.table = Some(Arc::clone(&table));
        self.emit(SessionEvent::RatesReplaced(Arc::clone(&table)));

        if !table.contains(&self.input.to) {
            let current = table.first_code().clone();
            let previous = std::mem::replace(&mut self.input.to, current.clone());
            info!(%previous, %current, "Target currency missing from new rates, reassigned");
            self.emit(SessionEvent::TargetReassigned { previous, current });
        }

        self.transition(SessionState::Ready);
        self.recompute();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // User edits
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_amount(&mut self, amount: Amount) {
        self.input.amount = amount;
        self.recompute();
    }

    pub fn set_to(&mut self, code: CurrencyCode) {
        self.input.to = code;
        self.recompute();
    }

    /// Changes the source currency, fetching a new table once rates are in play.
    pub fn set_from(&mut self, code: CurrencyCode) -> Option<Effect> {
        let changed = self.input.from != code;
        self.input.from = code;
        self.from_changed(changed)
    }

    /// Exchanges source and target. Always refetches once rates are in play.
    pub fn swap(&mut self) -> Option<Effect> {
        self.input.swap();
        self.from_changed(true)
    }

    fn from_changed(&mut self, changed: bool) -> Option<Effect> {
        match self.state {
            // The initial fetch picks up whatever `from` is by then.
            SessionState::Idle | SessionState::LoadingCatalog => None,
            SessionState::Error(_) => Some(self.reload()),
            _ if !changed => None,
            _ => Some(self.reload()),
        }
    }

    fn reload(&mut self) -> Effect {
        if self.state != SessionState::LoadingRatesInitial {
            self.transition(SessionState::LoadingRates);
        }
        Effect::FetchRates(self.next_request())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn awaiting_rates(&self) -> bool {
        matches!(
            self.state,
            SessionState::LoadingRatesInitial | SessionState::LoadingRates
        )
    }

    fn next_request(&mut self) -> RateRequest {
        self.generation += 1;
        debug!(generation = self.generation, base = %self.input.from, "Requesting rates");
        RateRequest {
            generation: self.generation,
            base: self.input.from.clone(),
        }
    }

    fn recompute(&mut self) {
        if !self.state.is_ready() {
            return;
        }
        let result = self
            .table
            .as_deref()
            .and_then(|table| self.engine.convert(table, &self.input));
        self.result = result;
        self.emit(SessionEvent::ResultUpdated(result));
    }

    fn fail(&mut self, message: String) {
        warn!(error = %message, "Provider call failed");
        self.transition(SessionState::Error(message));
    }

    fn transition(&mut self, next: SessionState) {
        if self.state == next {
            return;
        }
        info!(from = %self.state, to = %next, "Session state changed");
        if !next.is_ready() {
            self.result = None;
        }
        self.state = next.clone();
        self.emit(SessionEvent::StateChanged(next));
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
