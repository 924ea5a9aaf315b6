//! # Product Commands
//!
//! Catalog search, product CRUD and the per-line stock writes shared by
//! checkout and tab settlement.
//!
//! ## Sale Write Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Per-Line Stock Writes                                │
//! │                                                                         │
//! │  lines: [ (7, ×2), (9, ×1), (12, ×3) ]                                 │
//! │       │                                                                 │
//! │       ▼  join_all (concurrent, unordered, no transaction)               │
//! │  ┌───────────────┐  ┌───────────────┐  ┌───────────────┐               │
//! │  │ GET /products/7│  │ GET …/9       │  │ GET …/12      │               │
//! │  │ apply_sale(2) │  │ apply_sale(1) │  │ apply_sale(3) │               │
//! │  │ PUT …/7       │  │ PUT …/9  ✗500 │  │ PUT …/12      │               │
//! │  └───────┬───────┘  └───────┬───────┘  └───────┬───────┘               │
//! │          ▼                  ▼                  ▼                        │
//! │  BatchOutcome { applied: [7, 12], failed: [{ id: 9, reason }] }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bodega_core::catalog::{paginate, search_products, Page};
use bodega_core::inventory::{ProductForm, SaleLine};
use bodega_core::validation::{validate_page, validate_search_query};
use bodega_core::{BatchOutcome, Product};
use bodega_store::{Store, StoreResult};
use futures::future::join_all;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, error, info};

use super::parse_id;
use crate::error::ApiResult;
use crate::state::{ConfigState, StoreState};

/// Which page size a listing uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogView {
    #[default]
    Catalog,
    Dashboard,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default, alias = "per_page")]
    pub per_page: Option<usize>,
    #[serde(default)]
    pub view: CatalogView,
}

/// Edit form plus an optional restock in whole packages.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(flatten)]
    pub form: ProductForm,
    #[serde(default)]
    pub add_packages: Option<Decimal>,
}

/// `GET /products?q=&page=&perPage=&view=`
///
/// Filters by name (case-insensitive), then slices into pages. Out-of-range
/// pages are clamped to the last one.
pub async fn search(
    State(store): State<StoreState>,
    State(config): State<ConfigState>,
    Query(query): Query<CatalogQuery>,
) -> ApiResult<Json<Page<Product>>> {
    debug!(query = ?query.q, page = ?query.page, "search_products command");

    let needle = validate_search_query(query.q.as_deref().unwrap_or_default())?;
    let page = validate_page(query.page.unwrap_or(1))?;
    let per_page = query.per_page.unwrap_or(match query.view {
        CatalogView::Catalog => config.shop().catalog_page_size,
        CatalogView::Dashboard => config.shop().dashboard_page_size,
    });

    let products = store.inner().products().list().await?;
    let matches: Vec<Product> = search_products(&products, &needle)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(paginate(matches, page, per_page)))
}

/// `POST /products`
///
/// Builds the record from a purchase-batch form: stock, unit cost and
/// profit per unit come from the package plan when one is given.
pub async fn create(
    State(store): State<StoreState>,
    Json(form): Json<ProductForm>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    debug!(name = %form.name, "create_product command");

    let new_product = form.build_new()?;
    let product = store.inner().products().insert(&new_product).await?;

    info!(product_id = %product.id, name = %product.name, stock = product.stock, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /products/{id}`
pub async fn get(
    State(store): State<StoreState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    debug!(product_id = %id, "get_product command");

    let product = store.inner().products().get(&parse_id(&id)).await?;
    Ok(Json(product))
}

/// `PUT /products/{id}`
///
/// Applies the edit form, then adds `addPackages` whole packages to stock
/// when present. Sales counters are kept.
pub async fn update(
    State(store): State<StoreState>,
    Path(id): Path<String>,
    Json(update): Json<ProductUpdate>,
) -> ApiResult<Json<Product>> {
    debug!(product_id = %id, "update_product command");

    let products = store.inner().products();
    let mut product = products.get(&parse_id(&id)).await?;

    update.form.apply_edit(&mut product)?;
    if let Some(packages) = update.add_packages {
        product.add_packages(packages)?;
    }

    let stored = products.update(&product).await?;
    info!(product_id = %stored.id, stock = stored.stock, "Product updated");
    Ok(Json(stored))
}

/// `DELETE /products/{id}`
pub async fn delete(
    State(store): State<StoreState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    debug!(product_id = %id, "delete_product command");

    store.inner().products().delete(&parse_id(&id)).await?;

    info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Stock Writes
// =============================================================================

/// Applies the sale rule to every line, each as its own GET + PUT.
///
/// Lines run concurrently; a failed line is logged and reported, the
/// others still go through.
pub(crate) async fn sell_lines(store: &Store, lines: &[SaleLine]) -> BatchOutcome<Product> {
    let writes = lines.iter().map(|line| async move {
        let result = sell_line(store, line).await;
        if let Err(e) = &result {
            error!(
                product_id = %line.product_id,
                quantity = line.quantity,
                error = %e,
                "Stock update failed"
            );
        }
        (line.product_id.to_string(), result)
    });

    BatchOutcome::collect(join_all(writes).await)
}

async fn sell_line(store: &Store, line: &SaleLine) -> StoreResult<Product> {
    let products = store.products();
    let mut product = products.get(&line.product_id).await?;
    product.apply_sale(line.quantity);
    products.update(&product).await
}
