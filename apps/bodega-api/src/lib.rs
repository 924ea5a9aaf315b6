//! # Bodega API Library
//!
//! HTTP surface of the Bodega POS dashboard. `main.rs` loads the config
//! and serves [`router`]; integration tests drive the same router in
//! process.
//!
//! ## Module Organization
//! ```text
//! bodega_api/
//! ├── lib.rs          ◄─── You are here (router & tracing setup)
//! ├── config.rs       ◄─── bodega.toml + BODEGA_* overrides
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState + FromRef wiring
//! │   ├── store.rs    ◄─── Data store client
//! │   ├── cart.rs     ◄─── Sidebar cart
//! │   ├── rates.rs    ◄─── Fetched rates and manual overrides
//! │   └── config.rs   ◄─── Shop settings
//! ├── commands/       ◄─── One module per dashboard view
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tracing_subscriber::EnvFilter;

use commands::{calculator, cart, customer, exchange, finance, health, product};
use state::AppState;

/// Every dashboard command, bound to its route.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health & config
        .route("/health", get(health::health))
        .route("/config", get(health::get_config))
        // Products
        .route("/products", get(product::search).post(product::create))
        .route(
            "/products/{id}",
            get(product::get).put(product::update).delete(product::delete),
        )
        // Cart
        .route("/cart", get(cart::get_cart).delete(cart::close_cart))
        .route("/cart/items", post(cart::add_to_cart))
        .route("/cart/items/{id}", delete(cart::remove_from_cart))
        .route("/cart/items/{id}/increase", post(cart::increase))
        .route("/cart/items/{id}/decrease", post(cart::decrease))
        .route("/cart/checkout", post(cart::checkout))
        .route("/cart/fiado", post(cart::charge_to_tab))
        // Customers
        .route("/customers", get(customer::list).post(customer::create))
        .route("/customers/{id}", get(customer::get).put(customer::update))
        .route("/customers/{id}/payments", post(customer::pay))
        .route("/customers/{id}/pay-all", post(customer::pay_all))
        .route("/customers/{id}/reset", post(customer::reset))
        // Finance
        .route(
            "/withdrawals",
            get(finance::list_withdrawals).post(finance::create_withdrawal),
        )
        .route("/finance/summary", get(finance::summary))
        // Exchange
        .route("/exchange/rates", get(exchange::rates))
        .route("/exchange/overrides", delete(exchange::clear_overrides))
        .route("/exchange/overrides/{key}", put(exchange::set_override))
        .route("/exchange/convert", post(exchange::convert))
        // Calculator
        .route("/calculator", post(calculator::press))
        .with_state(state)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bodega_store=trace` - Trace the store client only
/// - Default: INFO, DEBUG for the bodega crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bodega=debug,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
