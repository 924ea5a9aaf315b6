//! # Store State
//!
//! Wraps the data store handle for use in commands.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! async fn list_products(
//!     State(store): State<StoreState>,
//! ) -> ApiResult<Json<Vec<Product>>> {
//!     let products = store.inner().products().list().await?;
//!     Ok(Json(products))
//! }
//! ```

use bodega_store::Store;

/// Wrapper around `Store` for axum state management.
///
/// `Store` shares one reqwest client internally, so clones are cheap and
/// every handler can run its requests concurrently without locking.
#[derive(Debug, Clone)]
pub struct StoreState {
    store: Store,
}

impl StoreState {
    pub fn new(store: Store) -> Self {
        StoreState { store }
    }

    /// Returns a reference to the inner Store.
    pub fn inner(&self) -> &Store {
        &self.store
    }
}
