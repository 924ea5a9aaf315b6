//! Per-target conversion rows for the converter view.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{BaseCurrency, RateGraph, RateKey, RateNode, RateOrigin, RateSource, RateTable};
use crate::numfmt::{format_for_code, parse_user_number};

/// One target card: result plus the rate shown next to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRow {
    pub key: RateKey,
    pub label: String,
    pub code: String,
    /// Rate as displayed; pesos per unit for USD/EUR when the base is Pesos.
    #[ts(type = "number | null")]
    pub rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_origin: Option<RateOrigin>,
    #[ts(type = "number | null")]
    pub result: Option<Decimal>,
    /// es-VE formatted result, `-` when there is none.
    pub formatted: String,
}

/// Targets shown for `base`, in card order.
///
/// The base's own key is hidden, as is any key without a rate. A Euros
/// base only offers official quotes.
pub fn visible_targets(base: BaseCurrency, table: &RateTable) -> Vec<RateKey> {
    RateKey::ALL
        .into_iter()
        .filter(|k| *k != base.key())
        .filter(|k| table.get(*k).is_some())
        .filter(|k| base != BaseCurrency::Euros || k.source() == RateSource::Official)
        .collect()
}

/// Table key the amount is read from when converting to `target`.
///
/// Peer-market targets in another currency start from the base's own
/// peer quote when there is one, so bolivares-to-pesos on the peer
/// market never mixes in the official rate.
pub fn origin_for(base: BaseCurrency, target: RateKey, table: &RateTable) -> RateKey {
    if target.source() == RateSource::PeerMarket && target.code() != base.code() {
        if let Some(peer) = base.peer_key().filter(|k| table.get(*k).is_some()) {
            return peer;
        }
    }
    base.key()
}

/// Converts a parsed amount. `None` for non-positive amounts or when no
/// path exists.
pub fn convert_amount(
    amount: Decimal,
    base: BaseCurrency,
    target: RateKey,
    table: &RateTable,
) -> Option<Decimal> {
    if amount <= Decimal::ZERO {
        return None;
    }
    let graph = RateGraph::from_table(table);
    graph.convert(
        amount,
        RateNode::Quote(origin_for(base, target, table)),
        RateNode::Quote(target),
    )
}

/// Rate printed on the card for `target`.
pub fn displayed_rate(base: BaseCurrency, target: RateKey, table: &RateTable) -> Option<Decimal> {
    match (base, target) {
        (BaseCurrency::Pesos, RateKey::Usd | RateKey::Eur) => RateGraph::from_table(table).convert(
            Decimal::ONE,
            RateNode::Quote(target),
            RateNode::Quote(origin_for(base, target, table)),
        ),
        _ => table.get(target),
    }
}

/// Every visible row for a raw amount as typed.
///
/// ## Example
/// ```rust
/// use std::collections::BTreeMap;
/// use bodega_core::exchange::{convert_all, BaseCurrency, FetchedRates, RateKey, RateTable};
///
/// let overrides = BTreeMap::from([(RateKey::Cop, "4000".to_string())]);
/// let table = RateTable::resolve(&FetchedRates::default(), &overrides);
///
/// let rows = convert_all("100", BaseCurrency::Dolares, &table);
/// let cop = rows.iter().find(|r| r.key == RateKey::Cop).unwrap();
/// assert_eq!(cop.formatted, "400.000");
/// ```
pub fn convert_all(raw_amount: &str, base: BaseCurrency, table: &RateTable) -> Vec<ConversionRow> {
    let amount = parse_user_number(raw_amount);

    visible_targets(base, table)
        .into_iter()
        .map(|key| {
            let result = amount.and_then(|a| convert_amount(a, base, key, table));
            ConversionRow {
                key,
                label: key.label().to_string(),
                code: key.code().to_string(),
                rate: displayed_rate(base, key, table),
                rate_origin: table.origin(key),
                result,
                formatted: result
                    .map(|r| format_for_code(r, key.code()))
                    .unwrap_or_else(|| "-".to_string()),
            }
        })
        .collect()
}
