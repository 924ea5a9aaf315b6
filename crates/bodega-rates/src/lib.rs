//! # bodega-rates: Exchange-Rate Feeds for Bodega POS
//!
//! Fetches the official reference rates and the peer-market sell quotes
//! that the currency converter layers over its offline defaults.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  GET /exchange/rates?base=Pesos  (bodega-api)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────────────────────────┐     │
//! │  │                bodega-rates (THIS CRATE)                       │     │
//! │  │                                                                │     │
//! │  │  RateService::refresh ──┬── OfficialRateClient (GET, pivot)    │     │
//! │  │                         └── PeerMarketClient   (POST, fiat)    │     │
//! │  └───────────────────────────────────────────────────────────────┘     │
//! │       │ FetchedRates                                                    │
//! │       ▼                                                                 │
//! │  RateTable::resolve + manual overrides  (bodega-core)                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use bodega_core::exchange::{BaseCurrency, RateTable};
//! use bodega_rates::{RateService, RatesConfig};
//!
//! let service = RateService::new(RatesConfig::new(api_key))?;
//! let fetched = service.refresh(BaseCurrency::Pesos).await;
//! let table = RateTable::resolve(&fetched, &overrides);
//! ```

pub mod error;
pub mod official;
pub mod peer;
pub mod service;

pub use error::{RatesError, RatesResult};
pub use official::OfficialRateClient;
pub use peer::PeerMarketClient;
pub use service::{RateService, RatesConfig, DEFAULT_OFFICIAL_URL, DEFAULT_PEER_URL};
