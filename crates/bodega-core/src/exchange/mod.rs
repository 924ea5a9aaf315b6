//! # Exchange Engine
//!
//! Converts an amount typed in one base currency into every target the
//! dashboard shows, through a USD-pivot rate table.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  defaults ──┐                                                           │
//! │  official ──┼──► RateTable (units per 1 USD, with origin) ──► RateGraph │
//! │  peer mkt ──┤                                                     │     │
//! │  overrides ─┘                                                     ▼     │
//! │                                         BFS path origin ──► target      │
//! │                                         amount ÷ w (back) × w (fwd)     │
//! │                                                                   │     │
//! │                                                                   ▼     │
//! │                                          ConversionRow { result, "-" }  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fetching lives in `bodega-rates`; everything here is pure.

mod convert;
mod graph;
mod rates;

pub use convert::{
    convert_all, convert_amount, displayed_rate, origin_for, visible_targets, ConversionRow,
};
pub use graph::{RateGraph, RateNode};
pub use rates::{
    peer_sell_rate, FetchedRates, OfficialQuote, RateEntry, RateOrigin, RateTable,
    PEER_MARKET_DEDUCTION,
};

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Rate Keys
// =============================================================================

/// Where a quote comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum RateSource {
    /// Reference rate service (BCV for bolivares).
    Official,
    /// Peer-to-peer trade listings.
    PeerMarket,
}

/// Entry of the rate table. Each value is units of that currency per 1 USD.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateKey {
    VesBcv,
    VesBinance,
    Cop,
    CopBinance,
    Usd,
    Eur,
}

impl RateKey {
    /// Display order of the target cards.
    pub const ALL: [RateKey; 6] = [
        RateKey::VesBcv,
        RateKey::VesBinance,
        RateKey::Cop,
        RateKey::CopBinance,
        RateKey::Usd,
        RateKey::Eur,
    ];

    /// Wire name (`VES_BCV`, `COP`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            RateKey::VesBcv => "VES_BCV",
            RateKey::VesBinance => "VES_BINANCE",
            RateKey::Cop => "COP",
            RateKey::CopBinance => "COP_BINANCE",
            RateKey::Usd => "USD",
            RateKey::Eur => "EUR",
        }
    }

    /// ISO currency code the key is denominated in.
    pub fn code(&self) -> &'static str {
        match self {
            RateKey::VesBcv | RateKey::VesBinance => "VES",
            RateKey::Cop | RateKey::CopBinance => "COP",
            RateKey::Usd => "USD",
            RateKey::Eur => "EUR",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RateKey::VesBcv => "Bolivares (bcv)",
            RateKey::VesBinance => "Bolivares (binance)",
            RateKey::Cop => "Pesos",
            RateKey::CopBinance => "Pesos (binance)",
            RateKey::Usd => "Dolares",
            RateKey::Eur => "Euros",
        }
    }

    pub fn source(&self) -> RateSource {
        match self {
            RateKey::VesBinance | RateKey::CopBinance => RateSource::PeerMarket,
            _ => RateSource::Official,
        }
    }

    /// Offline fallback. `COP_BINANCE` has none and is absent until fetched.
    pub fn default_rate(&self) -> Option<Decimal> {
        match self {
            RateKey::Usd => Some(Decimal::ONE),
            RateKey::VesBcv => Some(Decimal::new(32103, 2)),
            RateKey::VesBinance => Some(Decimal::from(719)),
            RateKey::Cop => Some(Decimal::new(372247, 2)),
            RateKey::Eur => Some(Decimal::new(86, 2)),
            RateKey::CopBinance => None,
        }
    }
}

impl fmt::Display for RateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RateKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownRateKey(s.to_string()))
    }
}

// =============================================================================
// Base Currency
// =============================================================================

/// The currency the typed amount is in (the four selector buttons).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum BaseCurrency {
    #[default]
    Dolares,
    Pesos,
    Bolivares,
    Euros,
}

impl BaseCurrency {
    pub const ALL: [BaseCurrency; 4] = [
        BaseCurrency::Dolares,
        BaseCurrency::Pesos,
        BaseCurrency::Bolivares,
        BaseCurrency::Euros,
    ];

    /// Table key the base reads its rate from. Bolivares means BCV.
    pub fn key(&self) -> RateKey {
        match self {
            BaseCurrency::Dolares => RateKey::Usd,
            BaseCurrency::Pesos => RateKey::Cop,
            BaseCurrency::Bolivares => RateKey::VesBcv,
            BaseCurrency::Euros => RateKey::Eur,
        }
    }

    /// Peer-market quote of the same currency, if one exists.
    pub fn peer_key(&self) -> Option<RateKey> {
        match self {
            BaseCurrency::Pesos => Some(RateKey::CopBinance),
            BaseCurrency::Bolivares => Some(RateKey::VesBinance),
            BaseCurrency::Dolares | BaseCurrency::Euros => None,
        }
    }

    /// Pivot code used when asking the official service for rates.
    pub fn code(&self) -> &'static str {
        self.key().code()
    }
}

impl FromStr for BaseCurrency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dolares" | "usd" => Ok(BaseCurrency::Dolares),
            "pesos" | "cop" => Ok(BaseCurrency::Pesos),
            "bolivares" | "ves" => Ok(BaseCurrency::Bolivares),
            "euros" | "eur" => Ok(BaseCurrency::Euros),
            _ => Err(CoreError::UnknownRateKey(s.to_string())),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_key_wire_names() {
        let json = serde_json::to_string(&RateKey::VesBinance).unwrap();
        assert_eq!(json, "\"VES_BINANCE\"");
        assert_eq!("cop_binance".parse::<RateKey>().unwrap(), RateKey::CopBinance);
        assert!("GBP".parse::<RateKey>().is_err());
    }

    #[test]
    fn test_rate_key_sources_and_defaults() {
        assert_eq!(RateKey::VesBinance.source(), RateSource::PeerMarket);
        assert_eq!(RateKey::VesBcv.source(), RateSource::Official);
        assert_eq!(RateKey::Usd.default_rate(), Some(Decimal::ONE));
        assert_eq!(RateKey::VesBcv.default_rate(), Some(Decimal::new(32103, 2)));
        assert_eq!(RateKey::CopBinance.default_rate(), None);
    }

    #[test]
    fn test_base_currency_keys() {
        assert_eq!(BaseCurrency::Bolivares.key(), RateKey::VesBcv);
        assert_eq!(BaseCurrency::Bolivares.code(), "VES");
        assert_eq!(BaseCurrency::Pesos.peer_key(), Some(RateKey::CopBinance));
        assert_eq!(BaseCurrency::Euros.peer_key(), None);
        assert_eq!("Pesos".parse::<BaseCurrency>().unwrap(), BaseCurrency::Pesos);
        assert_eq!("usd".parse::<BaseCurrency>().unwrap(), BaseCurrency::Dolares);
    }
}
