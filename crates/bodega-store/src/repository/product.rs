//! # Product Repository
//!
//! Store operations for catalog products.
//!
//! Updates always send the full record (`PUT`), so a sale that changes
//! `stock`, `sold` and `totalProfit` lands as one write per product.

use tracing::debug;

use crate::error::StoreResult;
use crate::store::StoreHttp;
use bodega_core::{NewProduct, Product, RecordId};

const ENTITY: &str = "Product";
const COLLECTION: &str = "products";

/// Repository for product records.
///
/// ## Usage
/// ```rust,ignore
/// let repo = store.products();
///
/// let all = repo.list().await?;
/// let one = repo.get(&RecordId::from(3)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    http: StoreHttp,
}

impl ProductRepository {
    pub(crate) fn new(http: StoreHttp) -> Self {
        ProductRepository { http }
    }

    /// Returns every product in store order.
    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        debug!("Listing products");

        let url = self.http.url(&[COLLECTION])?;
        let products: Vec<Product> = self
            .http
            .fetch(self.http.client.get(url), ENTITY, None)
            .await?;

        debug!(count = products.len(), "Loaded products");
        Ok(products)
    }

    /// Gets a product by id.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored record
    /// * `Err(StoreError::NotFound)` - No product with that id
    pub async fn get(&self, id: &RecordId) -> StoreResult<Product> {
        debug!(id = %id, "Getting product");

        let id = id.to_string();
        let url = self.http.url(&[COLLECTION, &id])?;
        self.http
            .fetch(self.http.client.get(url), ENTITY, Some(&id))
            .await
    }

    /// Creates a product; the store assigns the id.
    pub async fn insert(&self, product: &NewProduct) -> StoreResult<Product> {
        debug!(name = %product.name, "Inserting product");

        let url = self.http.url(&[COLLECTION])?;
        self.http
            .fetch(self.http.client.post(url).json(product), ENTITY, None)
            .await
    }

    /// Replaces the stored record with `product`.
    pub async fn update(&self, product: &Product) -> StoreResult<Product> {
        debug!(id = %product.id, stock = product.stock, "Updating product");

        let id = product.id.to_string();
        let url = self.http.url(&[COLLECTION, &id])?;
        self.http
            .fetch(self.http.client.put(url).json(product), ENTITY, Some(&id))
            .await
    }

    /// Deletes a product by id.
    pub async fn delete(&self, id: &RecordId) -> StoreResult<()> {
        debug!(id = %id, "Deleting product");

        let id = id.to_string();
        let url = self.http.url(&[COLLECTION, &id])?;
        self.http
            .execute(self.http.client.delete(url), ENTITY, Some(&id))
            .await
    }
}
