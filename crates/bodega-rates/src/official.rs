//! # Official Rate Feed
//!
//! Pivot-keyed reference rates:
//!
//! ```text
//! GET {base}/{apiKey}/latest/{PIVOT}
//!
//! { "result": "success",
//!   "base_code": "COP",
//!   "conversion_rates": { "COP": 1, "USD": 0.00025, "VES": 0.08, … } }
//! ```
//!
//! The map is kept as the feed sent it. Normalising to the USD pivot is
//! done by [`OfficialQuote::rate_per_usd`].

use std::collections::BTreeMap;

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{RatesError, RatesResult};
use bodega_core::exchange::OfficialQuote;

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    conversion_rates: BTreeMap<String, Decimal>,
}

/// Client for the official rate service.
#[derive(Debug, Clone)]
pub struct OfficialRateClient {
    client: Client,
    base: Url,
    api_key: String,
}

impl OfficialRateClient {
    pub fn new(client: Client, base_url: &str, api_key: impl Into<String>) -> RatesResult<Self> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(RatesError::InvalidUrl(base_url.to_string()));
        }
        Ok(OfficialRateClient {
            client,
            base,
            api_key: api_key.into(),
        })
    }

    /// Whether an API key was configured at all.
    pub fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    fn latest_url(&self, pivot: &str) -> RatesResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RatesError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend([self.api_key.trim(), "latest", pivot]);
        Ok(url)
    }

    /// Latest rates relative to `pivot` (an ISO code such as `USD`).
    pub async fn latest(&self, pivot: &str) -> RatesResult<OfficialQuote> {
        if !self.has_key() {
            return Err(RatesError::MissingQuote("no API key configured".to_string()));
        }

        debug!(pivot = %pivot, "Fetching official rates");

        let response = self.client.get(self.latest_url(pivot)?).send().await?;
        let body: LatestResponse = RatesError::check(response)?.json().await?;

        if body.conversion_rates.is_empty() {
            return Err(RatesError::MissingQuote(format!(
                "empty conversion_rates for {}",
                pivot
            )));
        }

        debug!(count = body.conversion_rates.len(), "Official rates received");
        Ok(OfficialQuote {
            pivot: pivot.to_string(),
            conversion_rates: body.conversion_rates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_url() {
        let client = OfficialRateClient::new(
            Client::new(),
            "https://v6.exchangerate-api.com/v6",
            "k3y",
        )
        .unwrap();
        assert_eq!(
            client.latest_url("COP").unwrap().as_str(),
            "https://v6.exchangerate-api.com/v6/k3y/latest/COP"
        );
    }

    #[test]
    fn test_blank_key_is_not_configured() {
        let client = OfficialRateClient::new(Client::new(), "http://rates.local", "  ").unwrap();
        assert!(!client.has_key());
    }
}
