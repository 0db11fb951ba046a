//! Async driver for a [`ConversionSession`].
//!
//! The session lives on a single tokio task. Handles post commands to its
//! mailbox; provider calls run as separate tasks that post their outcome back
//! to the same mailbox, so every mutation happens on the session task.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::debug;

use converter_types::{
    Amount, CatalogError, CatalogProvider, ConversionResult, CurrencyCatalog, CurrencyCode,
    ProviderError, RateProvider, RateTable,
};

use crate::session::{ConversionSession, Effect, RateRequest};
use crate::state::{SessionConfig, SessionError, SessionEvent, SessionSnapshot};

const MAILBOX_CAPACITY: usize = 64;

enum Message {
    Start,
    SetAmount(Amount),
    SetFrom(CurrencyCode),
    SetTo(CurrencyCode),
    Swap,
    CurrentResult(oneshot::Sender<Option<ConversionResult>>),
    Snapshot(oneshot::Sender<SessionSnapshot>),
    CatalogFetched(Result<CurrencyCatalog, CatalogError>),
    RatesFetched(RateRequest, Result<RateTable, ProviderError>),
}

/// Owns a session and the providers it calls.
///
/// Generic over the provider ports so tests can inject in-memory providers.
pub struct SessionDriver<R: ?Sized, C: ?Sized> {
    session: ConversionSession,
    rates: Arc<R>,
    catalog: Arc<C>,
    mailbox: mpsc::WeakSender<Message>,
    inbox: mpsc::Receiver<Message>,
}

impl<R, C> SessionDriver<R, C>
where
    R: RateProvider + ?Sized + 'static,
    C: CatalogProvider + ?Sized + 'static,
{
    /// Spawns the session task and returns a handle to it.
    ///
    /// The session stays `Idle` until [`SessionHandle::start`] is called, so
    /// callers can subscribe first. The task ends once every handle is
    /// dropped and no provider call is in flight.
    pub fn spawn(rates: Arc<R>, catalog: Arc<C>, config: SessionConfig) -> SessionHandle {
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        let session = ConversionSession::new(config);
        let events = session.event_sender();

        let driver = SessionDriver {
            session,
            rates,
            catalog,
            mailbox: tx.downgrade(),
            inbox: rx,
        };
        tokio::spawn(driver.run());

        SessionHandle {
            mailbox: tx,
            events,
        }
    }

    async fn run(mut self) {
        while let Some(message) = self.inbox.recv().await {
            if let Some(effect) = self.handle(message) {
                self.dispatch(effect);
            }
        }
        debug!("Session driver stopped");
    }

    fn handle(&mut self, message: Message) -> Option<Effect> {
        match message {
            Message::Start => self.session.start(),
            Message::SetAmount(amount) => {
                self.session.set_amount(amount);
                None
            }
            Message::SetFrom(code) => self.session.set_from(code),
            Message::SetTo(code) => {
                self.session.set_to(code);
                None
            }
            Message::Swap => self.session.swap(),
            Message::CurrentResult(reply) => {
                let _ = reply.send(self.session.current_result());
                None
            }
            Message::Snapshot(reply) => {
                let _ = reply.send(self.session.snapshot());
                None
            }
            Message::CatalogFetched(result) => self.session.catalog_loaded(result),
            Message::RatesFetched(request, result) => {
                self.session.rates_loaded(request, result);
                None
            }
        }
    }

    fn dispatch(&self, effect: Effect) {
        let Some(mailbox) = self.mailbox.upgrade() else {
            return;
        };

        match effect {
            Effect::FetchCatalog => {
                let provider = Arc::clone(&self.catalog);
                tokio::spawn(async move {
                    let result = provider.fetch_catalog().await;
                    let _ = mailbox.send(Message::CatalogFetched(result)).await;
                });
            }
            Effect::FetchRates(request) => {
                let provider = Arc::clone(&self.rates);
                tokio::spawn(async move {
                    let result = provider.fetch_rates(&request.base).await;
                    let _ = mailbox.send(Message::RatesFetched(request, result)).await;
                });
            }
        }
    }
}

/// Cloneable handle to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    mailbox: mpsc::Sender<Message>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    /// Subscribes to session events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Loads the catalog, then the rates for the current `from`.
    pub async fn start(&self) -> Result<(), SessionError> {
        self.send(Message::Start).await
    }

    pub async fn set_amount(&self, amount: Amount) -> Result<(), SessionError> {
        self.send(Message::SetAmount(amount)).await
    }

    pub async fn set_from(&self, code: CurrencyCode) -> Result<(), SessionError> {
        self.send(Message::SetFrom(code)).await
    }

    pub async fn set_to(&self, code: CurrencyCode) -> Result<(), SessionError> {
        self.send(Message::SetTo(code)).await
    }

    pub async fn swap(&self) -> Result<(), SessionError> {
        self.send(Message::Swap).await
    }

    pub async fn current_result(&self) -> Result<Option<ConversionResult>, SessionError> {
        self.request(Message::CurrentResult).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(Message::Snapshot).await
    }

    /// Waits until the session is no longer loading and returns its snapshot.
    pub async fn settled(&self) -> Result<SessionSnapshot, SessionError> {
        let mut events = self.subscribe();
        loop {
            let snapshot = self.snapshot().await?;
            if !snapshot.state.is_loading() {
                return Ok(snapshot);
            }

            // Wait for the next state change, then re-check.
            loop {
                match events.recv().await {
                    Ok(SessionEvent::StateChanged(_)) => break,
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Session subscriber lagged");
                        break;
                    }
                    Err(broadcast::error::RecvError::Closed) => return Err(SessionError::Closed),
                }
            }
        }
    }

    async fn send(&self, message: Message) -> Result<(), SessionError> {
        self.mailbox
            .send(message)
            .await
            .map_err(|_| SessionError::Closed)
    }

    async fn request<T>(
        &self,
        message: impl FnOnce(oneshot::Sender<T>) -> Message,
    ) -> Result<T, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(message(tx)).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }
}
