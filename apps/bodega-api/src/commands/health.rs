//! Liveness and shop settings.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::debug;

use crate::config::ShopSettings;
use crate::state::{ConfigState, StoreState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub shop: String,
    /// Whether the data store answered.
    pub store: bool,
}

/// `GET /health`
///
/// Always 200 while the service runs; `store` tells whether the data store
/// can be read.
pub async fn health(
    State(store): State<StoreState>,
    State(config): State<ConfigState>,
) -> Json<HealthResponse> {
    debug!("health command");

    let reachable = store.inner().health_check().await;

    Json(HealthResponse {
        status: if reachable { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        shop: config.shop().name.clone(),
        store: reachable,
    })
}

/// `GET /config`
pub async fn get_config(State(config): State<ConfigState>) -> Json<ShopSettings> {
    debug!("get_config command");
    Json(config.shop().clone())
}
