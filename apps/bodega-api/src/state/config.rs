//! # Configuration State
//!
//! Read-only after startup, so no lock is needed.

use std::sync::Arc;

use crate::config::{AppConfig, ShopSettings};

#[derive(Debug, Clone)]
pub struct ConfigState {
    config: Arc<AppConfig>,
}

impl ConfigState {
    pub fn new(config: AppConfig) -> Self {
        ConfigState {
            config: Arc::new(config),
        }
    }

    pub fn inner(&self) -> &AppConfig {
        &self.config
    }

    pub fn shop(&self) -> &ShopSettings {
        &self.config.shop
    }
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState::new(AppConfig::default())
    }
}
