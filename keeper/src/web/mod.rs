// File: keeper/src/web/mod.rs
pub mod auth;
pub mod handlers;
pub mod server;

pub use server::{create_router, start_web_server};

use std::sync::Arc;

use crate::config::Config;
use crate::services::RetentionService;

// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub retention_service: Arc<RetentionService>,
    pub api_key: Arc<str>,
}

impl AppState {
    pub fn new(config: Arc<Config>, retention_service: Arc<RetentionService>, api_key: String) -> Self {
        Self {
            config,
            retention_service,
            api_key: Arc::from(api_key),
        }
    }
}
