// File: agent/src/main.rs
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use agent::{create_router, AppState};
use keeper::constants::{agent as agent_defaults, defaults};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("agent=info".parse()?)
        .add_directive("tower_http=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    let backup_root = std::env::var("AGENT_BACKUP_ROOT")
        .map_err(|_| anyhow!("AGENT_BACKUP_ROOT must point at the backup directory"))?;

    let bind_address = std::env::var("AGENT_BIND_ADDRESS")
        .unwrap_or_else(|_| agent_defaults::DEFAULT_BIND_ADDRESS.to_string());

    let api_key = std::env::var("AGENT_API_KEY")
        .unwrap_or_else(|_| defaults::DEVELOPMENT_API_KEY.to_string());

    if api_key == defaults::DEVELOPMENT_API_KEY {
        warn!("Using default development API key - set AGENT_API_KEY environment variable for production");
    }

    info!("Starting backup agent on {} serving {}", bind_address, backup_root);

    let app_state = Arc::new(AppState::new(backup_root, api_key));
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Backup agent listening on {}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
