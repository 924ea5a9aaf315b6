//! # Repository Module
//!
//! Store repository implementations for Bodega POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  API command                                                           │
//! │       │                                                                 │
//! │       │  store.products().get(&id)                                     │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list(&self)                                                       │
//! │  ├── get(&self, id)                                                    │
//! │  ├── insert(&self, product)                                            │
//! │  ├── update(&self, product)                                            │
//! │  └── delete(&self, id)                                                 │
//! │       │                                                                 │
//! │       │  HTTP + JSON                                                    │
//! │       ▼                                                                 │
//! │  json-server collections                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog CRUD
//! - [`CustomerRepository`](customer::CustomerRepository) - Fiado tabs
//! - [`WithdrawalRepository`](withdrawal::WithdrawalRepository) - Profit withdrawals

pub mod customer;
pub mod product;
pub mod withdrawal;
