//! # Bodega API Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Dashboard ───► HTTP (8080) ───► commands ───► json-server (3000)      │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │                           official + peer rate feeds                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bodega_api::config::AppConfig;
use bodega_api::state::AppState;
use bodega_api::{init_tracing, router};
use bodega_rates::RateService;
use bodega_store::Store;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    info!("Starting Bodega API...");

    let config = AppConfig::load(None)?;
    info!(
        bind = %config.server.bind_address(),
        store = %config.store.url,
        shop = %config.shop.name,
        "Configuration loaded"
    );

    let store = Store::new(config.store_config())?;
    if !store.health_check().await {
        warn!(url = %store.base_url(), "Data store not reachable yet, starting anyway");
    }
    let rates = RateService::new(config.rates_config())?;

    let listener = TcpListener::bind(config.server.bind_address()).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    let app = router(AppState::new(store, rates, config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
