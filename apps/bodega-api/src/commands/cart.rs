//! # Cart Commands
//!
//! Commands for the sidebar cart.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────────┐                    │
//! │  │  Closed  │────►│ In Cart  │──┬─►│  Checkout    │── all lines ──┐    │
//! │  │ (empty)  │     │          │  │  │  (sale)      │   written     │    │
//! │  └──────────┘     └──────────┘  │  └──────────────┘               │    │
//! │       ▲                │        │          │ some failed          │    │
//! │       │           add_to_cart   │          ▼                      │    │
//! │       │           increase      │     failed lines stay           │    │
//! │       │           decrease      │                                 │    │
//! │       │           remove        │  ┌──────────────┐               │    │
//! │       │                │        └─►│ Charge to tab│── saved ──────┤    │
//! │       │                ▼           │  (fiado)     │               │    │
//! │       └─────────── close_cart ◄────┴──────────────┴───────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Path, State};
use axum::Json;
use bodega_core::inventory::SaleLine;
use bodega_core::ledger::{charge_lines, open_account, restart_with_lines, CustomerForm};
use bodega_core::{BatchOutcome, CoreError, Currency, Product, ProductId, ProductSnapshot, RecordId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::customer::CustomerView;
use super::parse_id;
use super::product::sell_lines;
use crate::error::ApiResult;
use crate::state::{Cart, CartState, CartTotals, StoreState};

/// Cart response including lines and totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<ProductSnapshot>,
    pub selected: Vec<ProductId>,
    pub active_total: bool,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            lines: cart.lines.clone(),
            selected: cart.selected.clone(),
            active_total: cart.active_total,
            totals: CartTotals::from(cart),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub product_id: RecordId,
}

/// What a checkout wrote and what is left in the cart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub outcome: BatchOutcome<Product>,
    pub cart: CartResponse,
}

/// How the cart is charged to an existing tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiadoMode {
    /// Merge the cart into what the customer already owes for products.
    #[default]
    Add,
    /// Start the tab over with only the cart.
    Restart,
}

/// Charge the cart to a tab: an existing customer when `customerId` is
/// given, otherwise a new one named `name`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiadoRequest {
    #[serde(default)]
    pub customer_id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "typeMony")]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub concept: Option<String>,
    #[serde(default)]
    pub mode: FiadoMode,
}

/// `GET /cart`
pub async fn get_cart(State(cart): State<CartState>) -> Json<CartResponse> {
    debug!("get_cart command");
    Json(cart.with_cart(|c| CartResponse::from(c)))
}

/// `POST /cart/items`
///
/// Fetches the product so the line carries its current name and price.
/// A product already in the cart is left as it is.
pub async fn add_to_cart(
    State(store): State<StoreState>,
    State(cart): State<CartState>,
    Json(body): Json<AddToCart>,
) -> ApiResult<Json<CartResponse>> {
    debug!(product_id = %body.product_id, "add_to_cart command");

    let product = store.inner().products().get(&body.product_id).await?;

    let response = cart.with_cart_mut(|c| {
        if !c.add(&product) {
            debug!(product_id = %product.id, "Product already in cart");
        }
        CartResponse::from(&*c)
    });
    Ok(Json(response))
}

/// `POST /cart/items/{id}/increase`
pub async fn increase(
    State(cart): State<CartState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CartResponse>> {
    debug!(product_id = %id, "increase_quantity command");
    let id = parse_id(&id);
    let response = cart.with_cart_mut(|c| {
        c.increase(&id)?;
        Ok::<_, CoreError>(CartResponse::from(&*c))
    })?;
    Ok(Json(response))
}

/// `POST /cart/items/{id}/decrease`
pub async fn decrease(
    State(cart): State<CartState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CartResponse>> {
    debug!(product_id = %id, "decrease_quantity command");
    let id = parse_id(&id);
    let response = cart.with_cart_mut(|c| {
        c.decrease(&id)?;
        Ok::<_, CoreError>(CartResponse::from(&*c))
    })?;
    Ok(Json(response))
}

/// `DELETE /cart/items/{id}`
pub async fn remove_from_cart(
    State(cart): State<CartState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CartResponse>> {
    debug!(product_id = %id, "remove_from_cart command");
    let id = parse_id(&id);
    let response = cart.with_cart_mut(|c| {
        c.remove(&id)?;
        Ok::<_, CoreError>(CartResponse::from(&*c))
    })?;
    Ok(Json(response))
}

/// `DELETE /cart`
///
/// Closing the sidebar empties the cart.
pub async fn close_cart(State(cart): State<CartState>) -> Json<CartResponse> {
    debug!("close_cart command");
    Json(cart.with_cart_mut(|c| {
        c.close();
        CartResponse::from(&*c)
    }))
}

/// `POST /cart/checkout`
///
/// Sells every line: each product is re-read, the sale rule applied and
/// the full record written back. Lines that were written leave the cart;
/// failed ones stay so the sale can be retried.
pub async fn checkout(
    State(store): State<StoreState>,
    State(cart): State<CartState>,
) -> ApiResult<Json<CheckoutResponse>> {
    debug!("checkout command");

    let lines: Vec<SaleLine> = cart.with_cart(|c| {
        c.lines
            .iter()
            .map(|l| SaleLine {
                product_id: l.id.clone(),
                quantity: l.quantity,
            })
            .collect()
    });
    if lines.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let outcome = sell_lines(store.inner(), &lines).await;

    let sold: Vec<ProductId> = outcome.applied.iter().map(|p| p.id.clone()).collect();
    let remaining = cart.with_cart_mut(|c| {
        c.remove_sold(&sold);
        CartResponse::from(&*c)
    });

    if outcome.is_complete() {
        info!(lines = sold.len(), "Sale completed");
    } else {
        warn!(
            sold = sold.len(),
            failed = outcome.failed.len(),
            "Sale partially completed"
        );
    }

    Ok(Json(CheckoutResponse {
        outcome,
        cart: remaining,
    }))
}

/// `POST /cart/fiado`
///
/// Charges the cart to a customer's tab. Stock is not touched here; it
/// leaves when the tab is paid in full. The cart closes once the tab is
/// saved.
pub async fn charge_to_tab(
    State(store): State<StoreState>,
    State(cart): State<CartState>,
    Json(body): Json<FiadoRequest>,
) -> ApiResult<Json<CustomerView>> {
    debug!(customer_id = ?body.customer_id, mode = ?body.mode, "charge_to_tab command");

    let lines = cart.with_cart(|c| c.lines.clone());
    if lines.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let customers = store.inner().customers();
    let saved = match &body.customer_id {
        Some(id) => {
            let mut customer = customers.get(id).await?;
            match body.mode {
                FiadoMode::Add => charge_lines(&mut customer, lines, body.concept)?,
                FiadoMode::Restart => restart_with_lines(&mut customer, lines, body.concept)?,
            }
            customers.save(&customer).await?
        }
        None => {
            let form = CustomerForm {
                name: body.name.unwrap_or_default(),
                currency: body.currency.unwrap_or_default(),
                concept: body.concept,
                lines,
                amount: None,
            };
            let customer = open_account(&form)?;
            customers.insert(&customer).await?
        }
    };

    cart.with_cart_mut(Cart::close);

    info!(customer_id = %saved.id, balance = %saved.balance(), "Cart charged to tab");
    Ok(Json(CustomerView::from(saved)))
}
