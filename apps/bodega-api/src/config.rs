//! # Service Configuration
//!
//! Configuration for the dashboard API: where it listens, where the data
//! store lives, how to reach the rate feeds and the shop's display settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BODEGA_STORE_URL=http://192.168.1.20:3000                          │
//! │     BODEGA_RATES_API_KEY=abc123                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $BODEGA_CONFIG, or                                                 │
//! │     ~/.config/bodega-pos/bodega.toml (Linux)                           │
//! │     ~/Library/Application Support/com.bodega.pos/bodega.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     127.0.0.1:8080, store at http://localhost:3000                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # bodega.toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8080
//!
//! [store]
//! url = "http://localhost:3000"
//! timeout_secs = 10
//!
//! [rates]
//! api_key = "your-exchangerate-api-key"
//! timeout_secs = 8
//!
//! [shop]
//! name = "Bodega La Esquina"
//! catalog_page_size = 9
//! ```

use std::path::PathBuf;
use std::time::Duration;

use bodega_core::{CATALOG_PAGE_SIZE, DASHBOARD_PAGE_SIZE};
use bodega_rates::{RatesConfig, DEFAULT_OFFICIAL_URL, DEFAULT_PEER_URL};
use bodega_store::{StoreConfig, DEFAULT_STORE_URL};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_PATH_ENV: &str = "BODEGA_CONFIG";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid URL for {field}: {url}")]
    InvalidUrl { field: &'static str, url: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Server Settings
// =============================================================================

/// Where the HTTP service listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address (default: 127.0.0.1, local dashboard only).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

// =============================================================================
// Store Settings
// =============================================================================

/// The json-server instance holding products, customers and withdrawals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_url")]
    pub url: String,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_store_timeout")]
    pub timeout_secs: u64,
}

fn default_store_url() -> String {
    DEFAULT_STORE_URL.to_string()
}

fn default_store_timeout() -> u64 {
    10
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            url: default_store_url(),
            timeout_secs: default_store_timeout(),
        }
    }
}

// =============================================================================
// Rates Settings
// =============================================================================

/// Exchange-rate feeds.
///
/// A blank `api_key` disables the official feed; the converter then runs
/// on peer quotes and offline defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesSettings {
    #[serde(default = "default_official_url")]
    pub official_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_peer_url")]
    pub peer_url: String,

    #[serde(default = "default_rates_timeout")]
    pub timeout_secs: u64,
}

fn default_official_url() -> String {
    DEFAULT_OFFICIAL_URL.to_string()
}

fn default_peer_url() -> String {
    DEFAULT_PEER_URL.to_string()
}

fn default_rates_timeout() -> u64 {
    8
}

impl Default for RatesSettings {
    fn default() -> Self {
        RatesSettings {
            official_url: default_official_url(),
            api_key: String::new(),
            peer_url: default_peer_url(),
            timeout_secs: default_rates_timeout(),
        }
    }
}

// =============================================================================
// Shop Settings
// =============================================================================

/// What the dashboard shows about the shop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSettings {
    #[serde(default = "default_shop_name")]
    pub name: String,

    /// Products per catalog page.
    #[serde(default = "default_catalog_page_size")]
    pub catalog_page_size: usize,

    /// Products per page of the dashboard table.
    #[serde(default = "default_dashboard_page_size")]
    pub dashboard_page_size: usize,
}

fn default_shop_name() -> String {
    "Bodega".to_string()
}

fn default_catalog_page_size() -> usize {
    CATALOG_PAGE_SIZE
}

fn default_dashboard_page_size() -> usize {
    DASHBOARD_PAGE_SIZE
}

impl Default for ShopSettings {
    fn default() -> Self {
        ShopSettings {
            name: default_shop_name(),
            catalog_page_size: default_catalog_page_size(),
            dashboard_page_size: default_dashboard_page_size(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub rates: RatesSettings,

    #[serde(default)]
    pub shop: ShopSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (bodega.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        check_url("store.url", &self.store.url)?;
        check_url("rates.official_url", &self.rates.official_url)?;
        check_url("rates.peer_url", &self.rates.peer_url)?;

        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be greater than 0".into()));
        }

        if self.shop.catalog_page_size == 0 || self.shop.dashboard_page_size == 0 {
            return Err(ConfigError::Invalid(
                "page sizes must be greater than 0".into(),
            ));
        }

        if self.store.timeout_secs == 0 || self.rates.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeouts must be greater than 0".into()));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `BODEGA_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("BODEGA_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(port) = lookup("BODEGA_PORT") {
            match port.parse::<u16>() {
                Ok(p) => {
                    debug!(port = p, "Overriding port from environment");
                    self.server.port = p;
                }
                Err(_) => warn!(port = %port, "Ignoring invalid BODEGA_PORT"),
            }
        }

        if let Some(url) = lookup("BODEGA_STORE_URL") {
            debug!(url = %url, "Overriding store URL from environment");
            self.store.url = url;
        }

        if let Some(secs) = lookup("BODEGA_STORE_TIMEOUT_SECS") {
            if let Ok(s) = secs.parse::<u64>() {
                self.store.timeout_secs = s;
            }
        }

        if let Some(key) = lookup("BODEGA_RATES_API_KEY") {
            self.rates.api_key = key;
        }

        if let Some(url) = lookup("BODEGA_RATES_OFFICIAL_URL") {
            self.rates.official_url = url;
        }

        if let Some(url) = lookup("BODEGA_RATES_PEER_URL") {
            self.rates.peer_url = url;
        }

        if let Some(name) = lookup("BODEGA_SHOP_NAME") {
            self.shop.name = name;
        }
    }

    /// `$BODEGA_CONFIG`, else the platform config dir.
    fn default_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }

        directories::ProjectDirs::from("com", "bodega", "pos")
            .map(|dirs| dirs.config_dir().join("bodega.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Store client configuration.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.store.url).timeout(Duration::from_secs(self.store.timeout_secs))
    }

    /// Rate feed configuration.
    pub fn rates_config(&self) -> RatesConfig {
        RatesConfig::new(&self.rates.api_key)
            .official_url(&self.rates.official_url)
            .peer_url(&self.rates.peer_url)
            .timeout(Duration::from_secs(self.rates.timeout_secs))
    }
}

fn check_url(field: &'static str, value: &str) -> ConfigResult<()> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            field,
            url: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.store.url, "http://localhost:3000");
        assert_eq!(config.shop.catalog_page_size, 9);
        assert_eq!(config.shop.dashboard_page_size, 6);
        assert!(config.rates.api_key.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.store.url = "localhost:3000".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { field: "store.url", .. })
        ));

        config.store.url = "http://store:3000".to_string();
        config.server.port = 0;
        assert!(config.validate().is_err());

        config.server.port = 9000;
        config.shop.catalog_page_size = 0;
        assert!(config.validate().is_err());

        config.shop.catalog_page_size = 12;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [store]
            url = "http://10.0.0.5:3000"

            [shop]
            name = "Bodega La Esquina"
            "#,
        )
        .unwrap();

        assert_eq!(config.store.url, "http://10.0.0.5:3000");
        assert_eq!(config.store.timeout_secs, 10);
        assert_eq!(config.shop.name, "Bodega La Esquina");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_reads_file_or_falls_back() {
        let dir = std::env::temp_dir().join(format!("bodega-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let missing = AppConfig::load(Some(dir.join("absent.toml"))).unwrap();
        assert_eq!(missing.shop.name, AppConfig::default().shop.name);

        let path = dir.join("config.toml");
        std::fs::write(&path, "[shop]\nname = \"Bodega La Esquina\"\n").unwrap();
        let loaded = AppConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.shop.name, "Bodega La Esquina");

        std::fs::write(dir.join("broken.toml"), "[shop\n").unwrap();
        assert!(matches!(
            AppConfig::load(Some(dir.join("broken.toml"))),
            Err(ConfigError::Parse(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("BODEGA_PORT", "9090"),
            ("BODEGA_STORE_URL", "http://store:3000"),
            ("BODEGA_RATES_API_KEY", "secret"),
        ]);

        let mut config = AppConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.store.url, "http://store:3000");
        assert_eq!(config.rates_config().api_key, "secret");
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|k| (k == "BODEGA_PORT").then(|| "eighty".to_string()));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_toml_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[rates]"));
        assert!(toml_str.contains("[shop]"));
    }

    #[test]
    fn test_store_config_timeout() {
        let mut config = AppConfig::default();
        config.store.timeout_secs = 3;
        assert_eq!(config.store_config().timeout, Duration::from_secs(3));
    }
}
