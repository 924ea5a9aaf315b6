//! # Store Handle
//!
//! Configuration and the shared HTTP client for the JSON data store.
//!
//! ## Collections
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  base_url = http://localhost:3000                                       │
//! │                                                                         │
//! │  /products        GET list · POST                                       │
//! │  /products/{id}   GET · PUT (full record) · DELETE                      │
//! │  /customers       GET list · POST                                       │
//! │  /customers/{id}  GET · PATCH (name and/or movements)                   │
//! │  /withdrawals     GET list (missing collection = empty) · POST          │
//! │                                                                         │
//! │  One reqwest::Client is shared by every repository, so all of them     │
//! │  reuse the same connection pool and timeout.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use crate::error::{StoreError, StoreResult};
use crate::repository::customer::CustomerRepository;
use crate::repository::product::ProductRepository;
use crate::repository::withdrawal::WithdrawalRepository;

/// Where json-server listens by default.
pub const DEFAULT_STORE_URL: &str = "http://localhost:3000";

// =============================================================================
// Configuration
// =============================================================================

/// Store client configuration.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use bodega_store::StoreConfig;
///
/// let config = StoreConfig::new("http://localhost:3000")
///     .timeout(Duration::from_secs(5));
/// assert_eq!(config.timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root URL of the store; collections hang off it.
    pub base_url: String,

    /// Whole-request timeout.
    /// Default: 10 seconds
    pub timeout: Duration,

    /// Connect timeout.
    /// Default: 5 seconds
    pub connect_timeout: Duration,
}

impl StoreConfig {
    /// Creates a configuration for the store at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        StoreConfig {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::new(DEFAULT_STORE_URL)
    }
}

// =============================================================================
// Store
// =============================================================================

/// Main store handle providing repository access.
///
/// ## Usage in Commands
/// ```rust,ignore
/// async fn list_products(State(store): State<Store>) -> Result<Json<Vec<Product>>, ApiError> {
///     let products = store.products().list().await?;
///     Ok(Json(products))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    http: StoreHttp,
}

impl Store {
    /// Builds the HTTP client and checks the base URL.
    ///
    /// No request is made; use [`Store::health_check`] for that.
    ///
    /// ## Returns
    /// * `Ok(Store)` - Ready-to-use handle
    /// * `Err(StoreError::InvalidUrl)` - The base URL cannot address collections
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        info!(url = %config.base_url, "Initializing store client");

        let base = Url::parse(&config.base_url)?;
        if base.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(config.base_url));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| StoreError::Request(e.to_string()))?;

        debug!(timeout = ?config.timeout, "Store client configured");

        Ok(Store {
            http: StoreHttp { client, base },
        })
    }

    /// Returns the base URL requests are built from.
    pub fn base_url(&self) -> &Url {
        &self.http.base
    }

    /// Returns the product repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let products = store.products().list().await?;
    /// ```
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.http.clone())
    }

    /// Returns the customer repository.
    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.http.clone())
    }

    /// Returns the withdrawal repository.
    pub fn withdrawals(&self) -> WithdrawalRepository {
        WithdrawalRepository::new(self.http.clone())
    }

    /// Checks if the store answers (the product collection is readable).
    ///
    /// ## Returns
    /// * `true` - Store is responsive
    /// * `false` - Store is unavailable
    pub async fn health_check(&self) -> bool {
        let Ok(url) = self.http.url(&["products"]) else {
            return false;
        };

        match self.http.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "Store health check failed");
                false
            }
        }
    }
}

// =============================================================================
// Transport
// =============================================================================

/// Client plus base URL, shared by the repositories.
#[derive(Debug, Clone)]
pub(crate) struct StoreHttp {
    pub(crate) client: Client,
    base: Url,
}

impl StoreHttp {
    /// `base/seg1/seg2…`, keeping any path prefix on the base.
    pub(crate) fn url(&self, segments: &[&str]) -> StoreResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a request and decodes the JSON answer.
    ///
    /// A 404 becomes `NotFound` when the request addressed one record.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        entity: &str,
        id: Option<&str>,
    ) -> StoreResult<T> {
        let response = self.checked(request, entity, id).await?;
        Ok(response.json::<T>().await?)
    }

    /// Sends a request and ignores the body.
    pub(crate) async fn execute(
        &self,
        request: RequestBuilder,
        entity: &str,
        id: Option<&str>,
    ) -> StoreResult<()> {
        self.checked(request, entity, id).await.map(|_| ())
    }

    async fn checked(
        &self,
        request: RequestBuilder,
        entity: &str,
        id: Option<&str>,
    ) -> StoreResult<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match (status, id) {
            (StatusCode::NOT_FOUND, Some(id)) => Err(StoreError::not_found(entity, id)),
            _ => Err(StoreError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = StoreConfig::new("http://store:3000")
            .timeout(Duration::from_secs(3))
            .connect_timeout(Duration::from_secs(1));

        assert_eq!(config.base_url, "http://store:3000");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert_eq!(StoreConfig::default().timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            Store::new(StoreConfig::new("not a url")),
            Err(StoreError::InvalidUrl(_))
        ));
        assert!(matches!(
            Store::new(StoreConfig::new("mailto:shop@example.com")),
            Err(StoreError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_url_keeps_path_prefix() {
        let store = Store::new(StoreConfig::new("http://host:3000/api/")).unwrap();
        let url = store.http.url(&["products", "7"]).unwrap();
        assert_eq!(url.as_str(), "http://host:3000/api/products/7");

        let root = Store::new(StoreConfig::new("http://host:3000")).unwrap();
        assert_eq!(
            root.http.url(&["customers"]).unwrap().as_str(),
            "http://host:3000/customers"
        );
    }
}
