//! # Peer-Market Feed
//!
//! Best USDT sell advert for a fiat currency:
//!
//! ```text
//! POST {url}
//! { "page": 1, "rows": 1, "payTypes": ["PagoMovil", "SpecificBank", "BANK"],
//!   "asset": "USDT", "tradeType": "SELL", "fiat": "VES" }
//!
//! → { "data": [ { "adv": { "price": "734.456" } } ] }
//! ```
//!
//! The quoted price goes through [`peer_sell_rate`] (2 decimals, minus the
//! fixed deduction) before anyone sees it.

use std::str::FromStr;

use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{RatesError, RatesResult};
use bodega_core::exchange::peer_sell_rate;

const PAY_TYPES: [&str; 3] = ["PagoMovil", "SpecificBank", "BANK"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    page: u32,
    rows: u32,
    pay_types: [&'a str; 3],
    asset: &'a str,
    trade_type: &'a str,
    fiat: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Advert>,
}

#[derive(Debug, Deserialize)]
struct Advert {
    adv: AdvertDetail,
}

#[derive(Debug, Deserialize)]
struct AdvertDetail {
    price: PriceText,
}

/// The price arrives as a string; tolerate a bare number too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriceText {
    Text(String),
    Number(f64),
}

impl PriceText {
    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            PriceText::Text(s) => Decimal::from_str(s.trim()).ok(),
            PriceText::Number(n) => Decimal::try_from(*n).ok(),
        }
    }
}

/// Client for the peer-market advert search.
#[derive(Debug, Clone)]
pub struct PeerMarketClient {
    client: Client,
    url: Url,
}

impl PeerMarketClient {
    pub fn new(client: Client, url: &str) -> RatesResult<Self> {
        Ok(PeerMarketClient {
            client,
            url: Url::parse(url)?,
        })
    }

    /// Usable sell rate (units of `fiat` per USDT) after the deduction.
    pub async fn sell_rate(&self, fiat: &str) -> RatesResult<Decimal> {
        debug!(fiat = %fiat, "Fetching peer-market quote");

        let request = SearchRequest {
            page: 1,
            rows: 1,
            pay_types: PAY_TYPES,
            asset: "USDT",
            trade_type: "SELL",
            fiat,
        };

        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?;
        let body: SearchResponse = RatesError::check(response)?.json().await?;

        let quoted = body
            .data
            .first()
            .and_then(|a| a.adv.price.to_decimal())
            .ok_or_else(|| RatesError::MissingQuote(format!("no {} advert", fiat)))?;

        let rate = peer_sell_rate(quoted).ok_or_else(|| {
            RatesError::MissingQuote(format!("{} quote {} not above deduction", fiat, quoted))
        })?;

        debug!(fiat = %fiat, quoted = %quoted, rate = %rate, "Peer-market quote received");
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = SearchRequest {
            page: 1,
            rows: 1,
            pay_types: PAY_TYPES,
            asset: "USDT",
            trade_type: "SELL",
            fiat: "COP",
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["payTypes"][0], "PagoMovil");
        assert_eq!(json["tradeType"], "SELL");
        assert_eq!(json["fiat"], "COP");
    }

    #[test]
    fn test_price_text_forms() {
        assert_eq!(
            PriceText::Text(" 719.50 ".to_string()).to_decimal(),
            Some(Decimal::new(71950, 2))
        );
        assert_eq!(PriceText::Number(4000.0).to_decimal(), Some(Decimal::from(4000)));
        assert_eq!(PriceText::Text("n/a".to_string()).to_decimal(), None);
    }
}
