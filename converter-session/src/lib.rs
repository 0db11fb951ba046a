//! # Converter Session
//!
//! Orchestrates the providers and the conversion engine for one user.
//!
//! ## Architecture
//!
//! - `session/` - Synchronous state machine (selections, rate table, catalog, result)
//! - `driver/` - Tokio task owning a session, fed through a command mailbox
//! - `state/` - States, events and snapshots exposed to presentation layers
//!
//! The driver is generic over `R: RateProvider` and `C: CatalogProvider`,
//! allowing different provider implementations to be injected.

pub mod driver;
pub mod session;
pub mod state;


pub use driver::{SessionDriver, SessionHandle};
pub use session::{ConversionSession, EVENT_CAPACITY, Effect, RateRequest};
pub use state::{
    CurrencyOption, SessionConfig, SessionError, SessionEvent, SessionSnapshot, SessionState,
};
