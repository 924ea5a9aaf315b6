//! # Exchange State
//!
//! Last fetched feed values, the selected base currency and the manual
//! overrides typed into the rate inputs. The effective table is always
//! rebuilt from these three, so an override never loses the fetched value
//! underneath it.

use std::collections::BTreeMap;
use std::sync::Arc;

use bodega_core::exchange::{BaseCurrency, FetchedRates, RateKey, RateTable};
use bodega_rates::RateService;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ExchangeSnapshot {
    pub base: BaseCurrency,
    pub fetched: FetchedRates,
    pub overrides: BTreeMap<RateKey, String>,
    /// False until the first refresh completed.
    pub refreshed: bool,
}

impl ExchangeSnapshot {
    pub fn table(&self) -> RateTable {
        RateTable::resolve(&self.fetched, &self.overrides)
    }
}

/// Feed clients plus the shared snapshot.
#[derive(Debug, Clone)]
pub struct RatesState {
    service: RateService,
    snapshot: Arc<RwLock<ExchangeSnapshot>>,
}

impl RatesState {
    pub fn new(service: RateService) -> Self {
        RatesState {
            service,
            snapshot: Arc::new(RwLock::new(ExchangeSnapshot::default())),
        }
    }

    /// Copy of the current snapshot.
    pub async fn snapshot(&self) -> ExchangeSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Fetches both feeds for `base` and stores the result.
    ///
    /// The lock is not held while the feeds are queried.
    pub async fn refresh(&self, base: BaseCurrency) -> ExchangeSnapshot {
        let fetched = self.service.refresh(base).await;

        let mut snapshot = self.snapshot.write().await;
        snapshot.base = base;
        snapshot.fetched = fetched;
        snapshot.refreshed = true;
        snapshot.clone()
    }

    /// Snapshot for `base`, refreshing first when the base changed or
    /// nothing was fetched yet.
    pub async fn ensure(&self, base: BaseCurrency) -> ExchangeSnapshot {
        let current = self.snapshot().await;
        if current.refreshed && current.base == base {
            return current;
        }
        debug!(base = ?base, "Base currency changed, refreshing rates");
        self.refresh(base).await
    }

    /// Sets or clears (blank value) one manual override.
    pub async fn set_override(&self, key: RateKey, value: &str) -> ExchangeSnapshot {
        let mut snapshot = self.snapshot.write().await;
        if value.trim().is_empty() {
            snapshot.overrides.remove(&key);
        } else {
            snapshot.overrides.insert(key, value.trim().to_string());
        }
        snapshot.clone()
    }

    pub async fn clear_overrides(&self) -> ExchangeSnapshot {
        let mut snapshot = self.snapshot.write().await;
        snapshot.overrides.clear();
        snapshot.clone()
    }
}
