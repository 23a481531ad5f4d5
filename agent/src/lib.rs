//! Backup agent: exposes a directory of backups to a remote keeper over HTTP

pub mod handlers;
pub mod middleware;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};
use keeper::store::LocalFsStore;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{delete_artifact, get_metadata, health, list_artifacts, list_scopes};

pub struct AppState {
    pub store: LocalFsStore,
    pub api_key: String,
}

impl AppState {
    pub fn new(backup_root: impl Into<PathBuf>, api_key: impl Into<String>) -> Self {
        Self {
            store: LocalFsStore::new(backup_root),
            api_key: api_key.into(),
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/artifacts/list", post(list_artifacts))
        .route("/artifacts/metadata", post(get_metadata))
        .route("/artifacts/delete", post(delete_artifact))
        .route("/scopes/list", post(list_scopes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
