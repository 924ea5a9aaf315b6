//! Profit summary and withdrawals.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bodega_core::inventory::{plan_withdrawal, InventorySummary};
use bodega_core::{Money, Withdrawal};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::state::{ConfigState, StoreState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub shop: String,
    #[serde(flatten)]
    pub totals: InventorySummary,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawalRequest {
    pub amount: Money,
}

/// `GET /finance/summary`
pub async fn summary(
    State(store): State<StoreState>,
    State(config): State<ConfigState>,
) -> ApiResult<Json<FinanceSummary>> {
    debug!("finance_summary command");

    let totals = current_totals(&store).await?;
    Ok(Json(FinanceSummary {
        shop: config.shop().name.clone(),
        totals,
    }))
}

/// `GET /withdrawals`
pub async fn list_withdrawals(
    State(store): State<StoreState>,
) -> ApiResult<Json<Vec<Withdrawal>>> {
    debug!("list_withdrawals command");
    Ok(Json(store.inner().withdrawals().list().await?))
}

/// `POST /withdrawals`
///
/// The amount must be positive and no larger than the profit still
/// available after earlier withdrawals.
pub async fn create_withdrawal(
    State(store): State<StoreState>,
    Json(body): Json<WithdrawalRequest>,
) -> ApiResult<(StatusCode, Json<Withdrawal>)> {
    debug!(amount = %body.amount, "create_withdrawal command");

    let totals = current_totals(&store).await?;
    let planned = plan_withdrawal(body.amount, totals.available_profit)?;
    let stored = store.inner().withdrawals().insert(&planned).await?;

    info!(
        withdrawal_id = %stored.id,
        amount = %stored.amount,
        available = %(totals.available_profit - stored.amount),
        "Withdrawal recorded"
    );
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn current_totals(store: &StoreState) -> ApiResult<InventorySummary> {
    let (products, withdrawals) = (store.inner().products(), store.inner().withdrawals());
    let (products, withdrawals) = tokio::try_join!(products.list(), withdrawals.list())?;
    Ok(InventorySummary::of(&products, &withdrawals))
}
