//! # Commands Module
//!
//! All commands exposed to the dashboard.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (exports, shared helpers)
//! ├── health.rs      ◄─── Liveness and shop settings
//! ├── product.rs     ◄─── Catalog search, product CRUD, stock writes
//! ├── cart.rs        ◄─── Sidebar cart, checkout, charge to a tab
//! ├── customer.rs    ◄─── Fiado ledger: tabs, payments, settlement
//! ├── finance.rs     ◄─── Profit summary and withdrawals
//! ├── exchange.rs    ◄─── Rate table, overrides, conversion
//! └── calculator.rs  ◄─── Keypad calculator
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Dashboard                                                              │
//! │  ─────────                                                              │
//! │  fetch('/customers/7/payments', { method: 'POST',                       │
//! │         body: JSON.stringify({ amount: 200 }) })                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Rust Backend                                                           │
//! │  ────────────                                                           │
//! │  async fn record_payment(                                               │
//! │      State(store): State<StoreState>,  ◄── FromRef<AppState>           │
//! │      Path(id): Path<String>,           ◄── From the URL                │
//! │      Json(body): Json<PaymentRequest>, ◄── From the body               │
//! │  ) -> ApiResult<Json<CustomerView>>                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Dashboard receives: CustomerView or { code, message }                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod calculator;
pub mod cart;
pub mod customer;
pub mod exchange;
pub mod finance;
pub mod health;
pub mod product;

use std::convert::Infallible;

use bodega_core::RecordId;

/// Record id from a path segment; all-digit segments become numbers.
pub(crate) fn parse_id(raw: &str) -> RecordId {
    raw.parse().unwrap_or_else(|never: Infallible| match never {})
}
