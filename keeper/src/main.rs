// File: keeper/src/main.rs
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use keeper::config::ConfigManager;
use keeper::constants::defaults;
use keeper::scheduler::SweepScheduler;
use keeper::services::RetentionService;
use keeper::web::{start_web_server, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("keeper=info".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("tokio_cron_scheduler=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!("Starting Backup Keeper");

    let config_dir = std::env::var("KEEPER_CONFIG_DIR")
        .unwrap_or_else(|_| defaults::CONFIG_DIR.to_string());
    let config_manager = ConfigManager::new(config_dir).await?;
    let config = config_manager.get_current_config();
    info!(
        "Configuration loaded: {} stores, default max_count {}",
        config.stores.len(),
        config.default_max_count
    );

    let retention_service = Arc::new(RetentionService::from_config(&config)?);
    info!("Retention service initialized");

    let scheduler = SweepScheduler::new(retention_service.clone()).await?;
    let scheduled = scheduler.start().await?;
    info!("Sweep scheduler initialized with {} jobs", scheduled);

    let api_key = std::env::var("KEEPER_API_KEY")
        .ok()
        .or_else(|| config.api_key.clone())
        .unwrap_or_else(|| defaults::DEVELOPMENT_API_KEY.to_string());

    if api_key == defaults::DEVELOPMENT_API_KEY {
        warn!("Using default development API key - set KEEPER_API_KEY or api_key in config/main.toml for production");
    }

    let state = AppState::new(config.clone(), retention_service, api_key);

    tokio::select! {
        result = start_web_server(state) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, stopping keeper");
        }
    }

    // Keep the scheduler alive until the server stops
    drop(scheduler);

    Ok(())
}
