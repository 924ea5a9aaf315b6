//! # bodega-store: Data Store Client for Bodega POS
//!
//! This crate provides access to the JSON data store that keeps every
//! Bodega POS record. It talks REST to a json-server style backend with
//! reqwest.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bodega POS Data Flow                             │
//! │                                                                         │
//! │  API command (checkout)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   bodega-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────────┐                  │   │
//! │  │   │    Store      │    │    Repositories     │                  │   │
//! │  │   │  (store.rs)   │    │                     │                  │   │
//! │  │   │               │    │ ProductRepository   │                  │   │
//! │  │   │ reqwest       │◄───│ CustomerRepository  │                  │   │
//! │  │   │ Client + URL  │    │ WithdrawalRepository│                  │   │
//! │  │   └───────────────┘    └─────────────────────┘                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          json-server  (http://localhost:3000, db.json)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - Client configuration and the [`Store`] handle
//! - [`error`] - Store error types
//! - [`repository`] - Repository implementations (product, customer, withdrawal)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bodega_store::{Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::new("http://localhost:3000"))?;
//!
//! let products = store.products().list().await?;
//! let customer = store.customers().get(&id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use store::{Store, StoreConfig, DEFAULT_STORE_URL};

// Repository re-exports for convenience
pub use repository::customer::{CustomerPatch, CustomerRepository};
pub use repository::product::ProductRepository;
pub use repository::withdrawal::WithdrawalRepository;
