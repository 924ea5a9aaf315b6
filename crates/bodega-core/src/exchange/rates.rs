//! Rate table assembly: defaults, then official, then peer market, then
//! manual overrides. Later layers win.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{RateKey, RateSource};
use crate::numfmt::parse_user_number;

/// Subtracted from every peer-market sell quote.
pub const PEER_MARKET_DEDUCTION: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

/// Layer a table value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum RateOrigin {
    Default,
    Official,
    PeerMarket,
    Manual,
}

/// Official service response: `conversion_rates` relative to `pivot`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfficialQuote {
    pub pivot: String,
    pub conversion_rates: BTreeMap<String, Decimal>,
}

impl OfficialQuote {
    /// Units of `code` per 1 USD, whatever the pivot was.
    pub fn rate_per_usd(&self, code: &str) -> Option<Decimal> {
        let rate = *self.conversion_rates.get(code)?;
        let usd = *self.conversion_rates.get("USD")?;
        if rate <= Decimal::ZERO || usd <= Decimal::ZERO {
            return None;
        }
        rate.checked_div(usd)
    }
}

/// Whatever the feeds returned on the last refresh. `None` means unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchedRates {
    pub official: Option<OfficialQuote>,
    pub peer_ves: Option<Decimal>,
    pub peer_cop: Option<Decimal>,
}

/// Turns a quoted peer-market price into a usable sell rate.
///
/// Rounds to 2 decimals then subtracts [`PEER_MARKET_DEDUCTION`].
/// Non-positive results are unavailable.
///
/// ## Example
/// ```rust
/// use bodega_core::exchange::peer_sell_rate;
/// use rust_decimal::Decimal;
///
/// assert_eq!(peer_sell_rate(Decimal::new(734456, 3)), Some(Decimal::new(71946, 2)));
/// assert_eq!(peer_sell_rate(Decimal::from(15)), None);
/// ```
pub fn peer_sell_rate(quoted: Decimal) -> Option<Decimal> {
    let rate = quoted.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        - PEER_MARKET_DEDUCTION;
    (rate > Decimal::ZERO).then_some(rate)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RateEntry {
    #[ts(type = "number")]
    pub rate: Decimal,
    pub origin: RateOrigin,
}

/// Effective USD-pivot table.
///
/// ```text
/// ┌───────────────┬──────────┬─────────────┬────────────┬────────────┐
/// │ key           │ default  │ official    │ peer       │ manual     │
/// ├───────────────┼──────────┼─────────────┼────────────┼────────────┤
/// │ USD           │ 1        │ conv[USD]   │            │ override   │
/// │ VES_BCV       │ 321.03   │ conv[VES]   │            │ override   │
/// │ VES_BINANCE   │ 719      │             │ VES quote  │ override   │
/// │ COP           │ 3722.47  │ conv[COP]   │            │ override   │
/// │ COP_BINANCE   │ -        │             │ COP quote  │ override   │
/// │ EUR           │ 0.86     │ conv[EUR]   │            │ override   │
/// └───────────────┴──────────┴─────────────┴────────────┴────────────┘
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RateTable {
    entries: BTreeMap<RateKey, RateEntry>,
}

impl RateTable {
    /// Table holding only the offline defaults.
    pub fn defaults() -> Self {
        let mut table = RateTable::default();
        for key in RateKey::ALL {
            if let Some(rate) = key.default_rate() {
                table.set(key, rate, RateOrigin::Default);
            }
        }
        table
    }

    /// Layers fetched quotes and manual overrides over the defaults.
    ///
    /// An override only counts when it parses to a positive number.
    pub fn resolve(fetched: &FetchedRates, overrides: &BTreeMap<RateKey, String>) -> Self {
        let mut table = RateTable::defaults();

        if let Some(quote) = &fetched.official {
            for key in RateKey::ALL {
                if key.source() != RateSource::Official {
                    continue;
                }
                if let Some(rate) = quote.rate_per_usd(key.code()) {
                    table.set(key, rate, RateOrigin::Official);
                }
            }
        }

        let peers = [
            (RateKey::VesBinance, fetched.peer_ves),
            (RateKey::CopBinance, fetched.peer_cop),
        ];
        for (key, rate) in peers {
            if let Some(rate) = rate.filter(|r| *r > Decimal::ZERO) {
                table.set(key, rate, RateOrigin::PeerMarket);
            }
        }

        for (key, raw) in overrides {
            if let Some(rate) = parse_user_number(raw).filter(|r| *r > Decimal::ZERO) {
                table.set(*key, rate, RateOrigin::Manual);
            }
        }

        table
    }

    pub fn set(&mut self, key: RateKey, rate: Decimal, origin: RateOrigin) {
        self.entries.insert(key, RateEntry { rate, origin });
    }

    pub fn get(&self, key: RateKey) -> Option<Decimal> {
        self.entries.get(&key).map(|e| e.rate)
    }

    pub fn origin(&self, key: RateKey) -> Option<RateOrigin> {
        self.entries.get(&key).map(|e| e.origin)
    }

    pub fn entries(&self) -> impl Iterator<Item = (RateKey, RateEntry)> + '_ {
        self.entries.iter().map(|(k, e)| (*k, *e))
    }

    /// Keys still on their offline default (shown as "fetching rates").
    pub fn defaulted_keys(&self) -> Vec<RateKey> {
        self.entries()
            .filter(|(_, e)| e.origin == RateOrigin::Default)
            .map(|(k, _)| k)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn official(pivot: &str, rates: &[(&str, Decimal)]) -> OfficialQuote {
        OfficialQuote {
            pivot: pivot.to_string(),
            conversion_rates: rates.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn test_defaults_only() {
        let table = RateTable::resolve(&FetchedRates::default(), &BTreeMap::new());
        assert_eq!(table.get(RateKey::Cop), Some(dec!(3722.47)));
        assert_eq!(table.get(RateKey::CopBinance), None);
        assert_eq!(table.defaulted_keys().len(), 5);
    }

    #[test]
    fn test_official_normalized_to_usd_pivot() {
        // Pivot COP: 1 COP = 0.00025 USD, 1 COP = 0.0875 VES
        let fetched = FetchedRates {
            official: Some(official(
                "COP",
                &[("COP", dec!(1)), ("USD", dec!(0.00025)), ("VES", dec!(0.0875))],
            )),
            ..Default::default()
        };
        let table = RateTable::resolve(&fetched, &BTreeMap::new());

        assert_eq!(table.get(RateKey::Cop), Some(dec!(4000)));
        assert_eq!(table.get(RateKey::Usd), Some(dec!(1)));
        assert_eq!(table.get(RateKey::VesBcv), Some(dec!(350)));
        assert_eq!(table.origin(RateKey::VesBcv), Some(RateOrigin::Official));
        // EUR missing from the response keeps its default
        assert_eq!(table.origin(RateKey::Eur), Some(RateOrigin::Default));
        // VES from the official service never feeds the peer key
        assert_eq!(table.get(RateKey::VesBinance), Some(dec!(719)));
    }

    #[test]
    fn test_peer_and_override_layers() {
        let fetched = FetchedRates {
            official: None,
            peer_ves: Some(dec!(700)),
            peer_cop: Some(dec!(3900)),
        };
        let overrides = BTreeMap::from([
            (RateKey::VesBinance, "705,5".to_string()),
            (RateKey::Eur, "0".to_string()),
            (RateKey::Cop, "".to_string()),
        ]);
        let table = RateTable::resolve(&fetched, &overrides);

        assert_eq!(table.get(RateKey::VesBinance), Some(dec!(705.5)));
        assert_eq!(table.origin(RateKey::VesBinance), Some(RateOrigin::Manual));
        assert_eq!(table.get(RateKey::CopBinance), Some(dec!(3900)));
        assert_eq!(table.get(RateKey::Eur), Some(dec!(0.86)));
        assert_eq!(table.get(RateKey::Cop), Some(dec!(3722.47)));
    }

    #[test]
    fn test_peer_sell_rate() {
        assert_eq!(peer_sell_rate(dec!(734.456)), Some(dec!(719.46)));
        assert_eq!(peer_sell_rate(dec!(4015.005)), Some(dec!(4000.01)));
        assert_eq!(peer_sell_rate(dec!(15)), None);
        assert_eq!(peer_sell_rate(dec!(3)), None);
    }
}
