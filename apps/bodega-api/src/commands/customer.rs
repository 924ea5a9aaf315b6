//! # Customer Commands
//!
//! The fiado ledger: tabs, partial payments (abonos), settlement and reset.
//!
//! ## Tab Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Customer Tab                                         │
//! │                                                                         │
//! │  create / fiado ──► +charge ──► −abono ──► −abono ──► pay-all ──► 0    │
//! │                        │                                  │             │
//! │                        ▼                                  ▼             │
//! │                  PUT consolidates                 stock leaves for      │
//! │                  product lines                    every product line    │
//! │                                                                         │
//! │  reset: movements cleared, products untouched                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bodega_core::ledger::{
    consolidate, consolidation_draft, open_account, record_payment, reset_debt, search_customers,
    settle_in_full, ConsolidationDraft, CustomerForm, LedgerSummary,
};
use bodega_core::validation::validate_search_query;
use bodega_core::{BatchOutcome, Customer, Money, Product};
use bodega_store::CustomerPatch;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::parse_id;
use super::product::sell_lines;
use crate::error::ApiResult;
use crate::state::StoreState;

/// A customer with the totals the tab card shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    #[serde(flatten)]
    pub customer: Customer,
    pub summary: LedgerSummary,
}

impl From<Customer> for CustomerView {
    fn from(customer: Customer) -> Self {
        let summary = customer.summary();
        CustomerView { customer, summary }
    }
}

/// Customer plus the pre-filled edit form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub view: CustomerView,
    pub draft: ConsolidationDraft,
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomerQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount: Money,
    #[serde(default)]
    pub concept: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayAllResponse {
    pub customer: CustomerView,
    /// Stock taken out for the tab's product lines.
    pub stock_out: BatchOutcome<Product>,
}

/// `GET /customers?q=`
pub async fn list(
    State(store): State<StoreState>,
    Query(query): Query<CustomerQuery>,
) -> ApiResult<Json<Vec<CustomerView>>> {
    debug!(query = ?query.q, "list_customers command");

    let needle = validate_search_query(query.q.as_deref().unwrap_or_default())?;
    let customers = store.inner().customers().list().await?;

    let views = search_customers(&customers, &needle)
        .into_iter()
        .cloned()
        .map(CustomerView::from)
        .collect();
    Ok(Json(views))
}

/// `POST /customers`
///
/// Opens a tab with its first charge: the form's product lines, or the
/// plain amount when there are none.
pub async fn create(
    State(store): State<StoreState>,
    Json(form): Json<CustomerForm>,
) -> ApiResult<(StatusCode, Json<CustomerView>)> {
    debug!(name = %form.name, "create_customer command");

    let customer = open_account(&form)?;
    let stored = store.inner().customers().insert(&customer).await?;

    info!(customer_id = %stored.id, balance = %stored.balance(), "Customer created");
    Ok((StatusCode::CREATED, Json(CustomerView::from(stored))))
}

/// `GET /customers/{id}`
pub async fn get(
    State(store): State<StoreState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CustomerDetail>> {
    debug!(customer_id = %id, "get_customer command");

    let customer = store.inner().customers().get(&parse_id(&id)).await?;
    let draft = consolidation_draft(&customer.movements);

    Ok(Json(CustomerDetail {
        view: CustomerView::from(customer),
        draft,
    }))
}

/// `PUT /customers/{id}`
///
/// Renames the customer and replaces every product charge with one
/// consolidated charge built from the form. Payments are kept.
pub async fn update(
    State(store): State<StoreState>,
    Path(id): Path<String>,
    Json(form): Json<CustomerForm>,
) -> ApiResult<Json<CustomerView>> {
    debug!(customer_id = %id, "update_customer command");

    let customers = store.inner().customers();
    let mut customer = customers.get(&parse_id(&id)).await?;

    consolidate(&mut customer, &form)?;
    let stored = customers.save(&customer).await?;

    info!(customer_id = %stored.id, balance = %stored.balance(), "Customer tab consolidated");
    Ok(Json(CustomerView::from(stored)))
}

/// `POST /customers/{id}/payments`
pub async fn pay(
    State(store): State<StoreState>,
    Path(id): Path<String>,
    Json(body): Json<PaymentRequest>,
) -> ApiResult<Json<CustomerView>> {
    debug!(customer_id = %id, amount = %body.amount, "record_payment command");

    let customers = store.inner().customers();
    let mut customer = customers.get(&parse_id(&id)).await?;

    let payment = record_payment(&mut customer, body.amount, body.concept.as_deref())?;
    let stored = customers
        .patch(&customer.id, &CustomerPatch::movements(customer.movements.clone()))
        .await?;

    info!(
        customer_id = %stored.id,
        movement_id = %payment.id,
        balance = %stored.balance(),
        "Payment recorded"
    );
    Ok(Json(CustomerView::from(stored)))
}

/// `POST /customers/{id}/pay-all`
///
/// Takes the stock of every product on the tab, then books one payment
/// for the whole balance. Nothing happens when nothing is owed.
pub async fn pay_all(
    State(store): State<StoreState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PayAllResponse>> {
    debug!(customer_id = %id, "pay_all command");

    let customers = store.inner().customers();
    let mut customer = customers.get(&parse_id(&id)).await?;

    let Some(settlement) = settle_in_full(&mut customer) else {
        debug!(customer_id = %customer.id, "Nothing owed");
        return Ok(Json(PayAllResponse {
            customer: CustomerView::from(customer),
            stock_out: BatchOutcome::new(),
        }));
    };

    let stock_out = sell_lines(store.inner(), &settlement.stock_out).await;
    let stored = customers
        .patch(&customer.id, &CustomerPatch::movements(customer.movements.clone()))
        .await?;

    info!(
        customer_id = %stored.id,
        paid = %settlement.payment.entry.signed().abs(),
        sold = stock_out.applied.len(),
        failed = stock_out.failed.len(),
        "Tab paid in full"
    );
    Ok(Json(PayAllResponse {
        customer: CustomerView::from(stored),
        stock_out,
    }))
}

/// `POST /customers/{id}/reset`
pub async fn reset(
    State(store): State<StoreState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CustomerView>> {
    debug!(customer_id = %id, "reset_debt command");

    let customers = store.inner().customers();
    let mut customer = customers.get(&parse_id(&id)).await?;

    reset_debt(&mut customer);
    let stored = customers
        .patch(&customer.id, &CustomerPatch::movements(Vec::new()))
        .await?;

    info!(customer_id = %stored.id, "Customer debt reset");
    Ok(Json(CustomerView::from(stored)))
}
