//! # Rate Service
//!
//! Queries both feeds together and hands back whatever arrived.
//!
//! ```text
//! refresh(Pesos)
//!     ├── official.latest("COP")     ──► Some(quote) | warn + None
//!     ├── peer.sell_rate("VES")      ──► Some(rate)  | warn + None
//!     └── peer.sell_rate("COP")      ──► Some(rate)  | warn + None
//!                     │
//!                     ▼
//!              FetchedRates  ──► RateTable::resolve (bodega-core)
//! ```
//!
//! There is no retry. A failed feed leaves its keys on their defaults until
//! the next refresh.

use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};

use crate::error::{RatesError, RatesResult};
use crate::official::OfficialRateClient;
use crate::peer::PeerMarketClient;
use bodega_core::exchange::{BaseCurrency, FetchedRates};

/// Public official-rate endpoint (the API key goes after it).
pub const DEFAULT_OFFICIAL_URL: &str = "https://v6.exchangerate-api.com/v6";

/// Public peer-market advert search endpoint.
pub const DEFAULT_PEER_URL: &str = "https://p2p.binance.com/bapi/c2c/v2/friendly/c2c/adv/search";

/// Rate feed configuration.
///
/// ## Example
/// ```rust
/// use bodega_rates::RatesConfig;
///
/// let config = RatesConfig::new("my-key").official_url("http://localhost:8081");
/// assert_eq!(config.api_key, "my-key");
/// ```
#[derive(Debug, Clone)]
pub struct RatesConfig {
    pub official_url: String,
    pub api_key: String,
    pub peer_url: String,
    /// Per-request timeout.
    /// Default: 8 seconds
    pub timeout: Duration,
}

impl RatesConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        RatesConfig {
            official_url: DEFAULT_OFFICIAL_URL.to_string(),
            api_key: api_key.into(),
            peer_url: DEFAULT_PEER_URL.to_string(),
            timeout: Duration::from_secs(8),
        }
    }

    pub fn official_url(mut self, url: impl Into<String>) -> Self {
        self.official_url = url.into();
        self
    }

    pub fn peer_url(mut self, url: impl Into<String>) -> Self {
        self.peer_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Both feed clients behind one shared HTTP client.
#[derive(Debug, Clone)]
pub struct RateService {
    official: OfficialRateClient,
    peer: PeerMarketClient,
}

impl RateService {
    pub fn new(config: RatesConfig) -> RatesResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RatesError::Request(e.to_string()))?;

        Ok(RateService {
            official: OfficialRateClient::new(client.clone(), &config.official_url, config.api_key)?,
            peer: PeerMarketClient::new(client, &config.peer_url)?,
        })
    }

    pub fn official(&self) -> &OfficialRateClient {
        &self.official
    }

    pub fn peer(&self) -> &PeerMarketClient {
        &self.peer
    }

    /// Fetches the official table (pivoted on `base`) and both peer quotes.
    ///
    /// Never fails: each unavailable feed is logged and left as `None`.
    pub async fn refresh(&self, base: BaseCurrency) -> FetchedRates {
        let (official, peer_ves, peer_cop) = tokio::join!(
            self.official.latest(base.code()),
            self.peer.sell_rate("VES"),
            self.peer.sell_rate("COP"),
        );

        let fetched = FetchedRates {
            official: available("official", official),
            peer_ves: available("peer VES", peer_ves),
            peer_cop: available("peer COP", peer_cop),
        };

        info!(
            base = ?base,
            official = fetched.official.is_some(),
            peer_ves = fetched.peer_ves.is_some(),
            peer_cop = fetched.peer_cop.is_some(),
            "Exchange rates refreshed"
        );
        fetched
    }
}

fn available<T>(feed: &str, result: RatesResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(feed = %feed, error = %e, "Rate feed unavailable, keeping defaults");
            None
        }
    }
}
