//! # Exchange Commands
//!
//! Rate table, manual overrides and the multi-currency converter.
//!
//! ## Converter Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  POST /exchange/convert { amount: "100", base: "dolares" }              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  base changed or never fetched? ──yes──► refresh both feeds             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  defaults + fetched + overrides ──► RateTable ──► one row per target    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use bodega_core::exchange::{convert_all, BaseCurrency, ConversionRow, RateKey, RateTable};
use bodega_core::numfmt::format_amount_input;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::state::{ExchangeSnapshot, RatesState};

#[derive(Debug, Default, Deserialize)]
pub struct RatesQuery {
    #[serde(default)]
    pub base: Option<String>,
}

/// The effective table and where it came from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesResponse {
    pub base: BaseCurrency,
    pub rates: RateTable,
    /// Keys still on their offline default.
    pub defaulted: Vec<RateKey>,
    pub overrides: BTreeMap<RateKey, String>,
}

impl From<ExchangeSnapshot> for RatesResponse {
    fn from(snapshot: ExchangeSnapshot) -> Self {
        let rates = snapshot.table();
        RatesResponse {
            base: snapshot.base,
            defaulted: rates.defaulted_keys(),
            rates,
            overrides: snapshot.overrides,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OverrideRequest {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub base: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub base: BaseCurrency,
    /// The amount as the input shows it after losing focus.
    pub amount: String,
    pub rows: Vec<ConversionRow>,
}

/// `GET /exchange/rates?base=`
///
/// Always queries both feeds. Without `base` the current one is kept.
pub async fn rates(
    State(rates): State<RatesState>,
    Query(query): Query<RatesQuery>,
) -> ApiResult<Json<RatesResponse>> {
    debug!(base = ?query.base, "get_rates command");

    let base = resolve_base(&rates, query.base.as_deref()).await?;
    let snapshot = rates.refresh(base).await;
    Ok(Json(RatesResponse::from(snapshot)))
}

/// `PUT /exchange/overrides/{key}`
///
/// A blank value removes the override and the fetched value shows again.
pub async fn set_override(
    State(rates): State<RatesState>,
    Path(key): Path<String>,
    Json(body): Json<OverrideRequest>,
) -> ApiResult<Json<RatesResponse>> {
    debug!(key = %key, value = %body.value, "set_override command");

    let key: RateKey = key.parse()?;
    let snapshot = rates.set_override(key, &body.value).await;

    info!(key = %key, value = %body.value, "Rate override changed");
    Ok(Json(RatesResponse::from(snapshot)))
}

/// `DELETE /exchange/overrides`
pub async fn clear_overrides(State(rates): State<RatesState>) -> Json<RatesResponse> {
    debug!("clear_overrides command");

    let snapshot = rates.clear_overrides().await;
    info!("Rate overrides cleared");
    Json(RatesResponse::from(snapshot))
}

/// `POST /exchange/convert`
///
/// An empty or unparseable amount gives a `-` row for every target.
pub async fn convert(
    State(rates): State<RatesState>,
    Json(body): Json<ConvertRequest>,
) -> ApiResult<Json<ConvertResponse>> {
    debug!(amount = %body.amount, base = ?body.base, "convert command");

    let base = resolve_base(&rates, body.base.as_deref()).await?;
    let snapshot = rates.ensure(base).await;
    let rows = convert_all(&body.amount, base, &snapshot.table());

    Ok(Json(ConvertResponse {
        base,
        amount: format_amount_input(&body.amount),
        rows,
    }))
}

async fn resolve_base(rates: &RatesState, raw: Option<&str>) -> ApiResult<BaseCurrency> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => Ok(raw.parse()?),
        _ => Ok(rates.snapshot().await.base),
    }
}
