// File: keeper/src/config/mod.rs
pub mod manager;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
pub use manager::ConfigManager;

use crate::constants::{defaults, retention};
use crate::errors::ConfigError;
use crate::scheduler::validate_6_field_cron;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub api_key: Option<String>,
    #[serde(default = "default_max_count")]
    pub default_max_count: usize,
    pub sweep_schedule: Option<String>,
    // Populated from individual store config files
    #[serde(skip)]
    pub stores: HashMap<String, StoreConfig>,
}

fn default_host() -> String {
    defaults::HOST.to_string()
}

fn default_port() -> u16 {
    defaults::PORT
}

fn default_max_count() -> usize {
    retention::DEFAULT_MAX_COUNT
}

fn default_enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
            default_max_count: default_max_count(),
            sweep_schedule: None,
            stores: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    Local,
    Agent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfigFile {
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: BackendKind,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub max_count: Option<usize>,
    pub sweep_schedule: Option<String>,
    // Local backend
    pub root_path: Option<String>,
    // Agent backend
    pub agent_host: Option<String>,
    pub agent_port: Option<u16>,
    pub agent_api_key: Option<String>,
    pub request_timeout_seconds: Option<u64>,
    pub page_size: Option<usize>,
}

impl StoreConfig {
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            enabled: true,
            max_count: None,
            sweep_schedule: None,
            root_path: None,
            agent_host: None,
            agent_port: None,
            agent_api_key: None,
            request_timeout_seconds: None,
            page_size: None,
        }
    }

    pub fn effective_max_count(&self, default_max_count: usize) -> usize {
        self.max_count.unwrap_or(default_max_count)
    }

    /// Per-store schedule wins over the global one.
    pub fn effective_sweep_schedule<'a>(&'a self, global: Option<&'a str>) -> Option<&'a str> {
        self.sweep_schedule.as_deref().or(global)
    }
}

pub fn validate_max_count(field: &str, max_count: usize) -> Result<(), ConfigError> {
    if max_count < retention::MIN_MAX_COUNT {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be at least {}", retention::MIN_MAX_COUNT),
        });
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_max_count("default_max_count", self.default_max_count)?;

        if let Some(schedule) = &self.sweep_schedule {
            validate_6_field_cron(schedule).map_err(|e| ConfigError::InvalidValue {
                field: "sweep_schedule".to_string(),
                reason: e.to_string(),
            })?;
        }

        for (name, store) in &self.stores {
            if let Some(max_count) = store.max_count {
                validate_max_count(&format!("{}.max_count", name), max_count)?;
            }

            if let Some(schedule) = &store.sweep_schedule {
                validate_6_field_cron(schedule).map_err(|e| ConfigError::InvalidValue {
                    field: format!("{}.sweep_schedule", name),
                    reason: e.to_string(),
                })?;
            }

            match store.backend {
                BackendKind::Memory => {}
                BackendKind::Local => {
                    if store.root_path.as_deref().map_or(true, str::is_empty) {
                        return Err(ConfigError::MissingRequired {
                            field: format!("{}.root_path", name),
                        });
                    }
                }
                BackendKind::Agent => {
                    if store.agent_host.is_none() {
                        return Err(ConfigError::MissingRequired {
                            field: format!("{}.agent_host", name),
                        });
                    }
                    if store.agent_api_key.is_none() {
                        return Err(ConfigError::MissingRequired {
                            field: format!("{}.agent_api_key", name),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
