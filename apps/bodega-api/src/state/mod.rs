//! # State Module
//!
//! Manages application state for the dashboard API.
//!
//! ## Multiple State Types
//! `AppState` only bundles the pieces for the router. Each command extracts
//! exactly the state it needs through `FromRef`, so a cart command never
//! sees the rate feeds and an exchange command never sees the cart.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      axum Router                                │   │
//! │  │  Router::new().route(...).with_state(app_state)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │ FromRef                                  │
//! │       ┌──────────────┬───────┴──────┬──────────────────┐               │
//! │       ▼              ▼              ▼                  ▼                │
//! │  ┌──────────┐  ┌────────────┐  ┌─────────────┐  ┌─────────────┐        │
//! │  │StoreState│  │ CartState  │  │ RatesState  │  │ ConfigState │        │
//! │  │          │  │            │  │             │  │             │        │
//! │  │ reqwest  │  │ Arc<Mutex< │  │ RateService │  │ Arc<App-    │        │
//! │  │ client   │  │   Cart>>   │  │ + RwLock    │  │   Config>   │        │
//! │  └──────────┘  └────────────┘  └─────────────┘  └─────────────┘        │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • StoreState: shared connection pool, no lock                         │
//! │  • CartState: std Mutex, never held across an await                    │
//! │  • RatesState: tokio RwLock, never held while feeds are queried        │
//! │  • ConfigState: read-only after startup                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod rates;
mod store;

use axum::extract::FromRef;
use bodega_rates::RateService;
use bodega_store::Store;

pub use cart::{Cart, CartState, CartTotals};
pub use config::ConfigState;
pub use rates::{ExchangeSnapshot, RatesState};
pub use store::StoreState;

use crate::config::AppConfig;

/// Everything the router hands to its commands.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: StoreState,
    pub cart: CartState,
    pub rates: RatesState,
    pub config: ConfigState,
}

impl AppState {
    pub fn new(store: Store, rates: RateService, config: AppConfig) -> Self {
        AppState {
            store: StoreState::new(store),
            cart: CartState::new(),
            rates: RatesState::new(rates),
            config: ConfigState::new(config),
        }
    }
}

impl FromRef<AppState> for StoreState {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for CartState {
    fn from_ref(state: &AppState) -> Self {
        state.cart.clone()
    }
}

impl FromRef<AppState> for RatesState {
    fn from_ref(state: &AppState) -> Self {
        state.rates.clone()
    }
}

impl FromRef<AppState> for ConfigState {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
