// File: keeper/src/config/manager.rs
use super::{Config, StoreConfigFile};
use crate::errors::ConfigError;
use anyhow::{anyhow, Result};
use glob::glob;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_dir: String) -> Result<Self> {
        let config = Self::load_configuration(&config_dir).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_dir: &str) -> Result<Config> {
        let main_config_path = format!("{}/main.toml", config_dir);
        let main_config_content = fs::read_to_string(&main_config_path).await
            .map_err(|e| ConfigError::LoadFailed {
                path: main_config_path.clone(),
                reason: e.to_string(),
            })?;

        let mut config: Config = toml::from_str(&main_config_content)
            .map_err(|e| ConfigError::ParseError {
                reason: format!("{}: {}", main_config_path, e),
            })?;

        // Every other *.toml declares one store, named after the file
        let pattern = format!("{}/*.toml", config_dir);
        let mut stores = HashMap::new();

        for entry in glob(&pattern).map_err(|e| anyhow!("Glob pattern error: {}", e))? {
            let path = entry.map_err(|e| anyhow!("Glob entry error: {}", e))?;
            let filename = path.file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| anyhow!("Invalid filename"))?;

            if filename == "main.toml" {
                continue;
            }

            let store_name = filename.strip_suffix(".toml")
                .ok_or_else(|| anyhow!("Invalid config filename: {}", filename))?;

            debug!("Loading store config: {}", path.display());

            let content = fs::read_to_string(&path).await
                .map_err(|e| ConfigError::LoadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;

            let store_config_file: StoreConfigFile = toml::from_str(&content)
                .map_err(|e| ConfigError::ParseError {
                    reason: format!("{}: {}", path.display(), e),
                })?;

            if !store_config_file.store.enabled {
                info!("Store {} is disabled, skipping", store_name);
                continue;
            }

            stores.insert(store_name.to_string(), store_config_file.store);
        }

        config.stores = stores;
        config.validate()?;

        if config.stores.is_empty() {
            warn!("No stores configured in {} - finalize events will be rejected", config_dir);
        }

        info!(
            "Loaded {} stores (default max_count {})",
            config.stores.len(),
            config.default_max_count
        );

        Ok(config)
    }
}
