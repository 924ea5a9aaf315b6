//! # bodega-core: Pure Business Logic for Bodega POS
//!
//! This crate is the **heart** of Bodega POS. It contains every business
//! rule as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bodega POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard (browser)                          │   │
//! │  │   Catalog ──► Cart sidebar ──► Fiado ──► Finance ──► Divisas    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bodega-api (axum commands)                   │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────────┐  ┌────────▼───────────────────┐   │
//! │  │   ★ bodega-core (THIS CRATE) ★  │  │ bodega-store / bodega-rates │   │
//! │  │                                 │  │  REST store, rate feeds     │   │
//! │  │  money · types · ledger         │  └─────────────────────────────┘   │
//! │  │  inventory · exchange · numfmt  │                                    │
//! │  │  catalog · calculator · batch   │                                    │
//! │  │                                 │                                    │
//! │  │  NO I/O • NO NETWORK • PURE     │                                    │
//! │  └─────────────────────────────────┘                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Store records (Product, Customer, Movement, Withdrawal)
//! - [`money`] - Exact decimal Money
//! - [`ledger`] - Customer tab aggregation, payments, consolidation
//! - [`inventory`] - Sale rule, dashboard totals, product forms
//! - [`exchange`] - Rate table, rate graph and conversion rows
//! - [`numfmt`] - es-VE number parsing and display
//! - [`catalog`] - Search and pagination
//! - [`calculator`] - Keypad calculator
//! - [`batch`] - Per-item outcome of multi-write operations
//! - [`error`] / [`validation`] - Domain errors and field rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output
//! 2. **No I/O**: store and network access is FORBIDDEN here
//! 3. **Decimal Money**: balances reach exactly zero
//! 4. **Explicit Errors**: typed errors, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use bodega_core::ledger::{settle_in_full, LedgerSummary};
//! use bodega_core::{Currency, Customer, Money, Movement, RecordId};
//!
//! let mut customer = Customer {
//!     id: RecordId::generate(),
//!     name: "Maria".to_string(),
//!     currency: Currency::Cop,
//!     movements: vec![
//!         Movement::charge("Deuda inicial", Money::from_int(500), vec![]),
//!         Movement::payment("Abono", Money::from_int(200)),
//!     ],
//! };
//!
//! assert_eq!(customer.summary().balance, Money::from_int(300));
//!
//! settle_in_full(&mut customer);
//! assert!(LedgerSummary::of(&customer.movements).is_paid_off);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod batch;
pub mod calculator;
pub mod catalog;
pub mod error;
pub mod exchange;
pub mod inventory;
pub mod ledger;
pub mod money;
pub mod numfmt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use batch::{BatchFailure, BatchOutcome};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Products per page on the catalog view.
pub const CATALOG_PAGE_SIZE: usize = 9;

/// Products per page on the dashboard product table.
pub const DASHBOARD_PAGE_SIZE: usize = 6;

/// Longest product or customer name accepted.
pub const MAX_NAME_LEN: usize = 200;

/// Longest search query accepted.
pub const MAX_QUERY_LEN: usize = 100;
