//! HTTP request handlers for the agent server

use axum::{
    extract::{Json, State},
    response::Json as ResponseJson,
};
use keeper::artifact::{ArtifactMetadata, ArtifactPage};
use keeper::store::ArtifactStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::middleware::ApiKeyAuth;
use crate::types::*;
use crate::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> ResponseJson<Value> {
    ResponseJson(json!({
        "status": "ok",
        "backup_root": state.store.root().display().to_string(),
        "timestamp": chrono::Utc::now(),
    }))
}

// === Artifact handlers ===

pub async fn list_artifacts(
    _auth: ApiKeyAuth,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ListArtifactsRequest>,
) -> ResponseJson<AgentResponse<ArtifactPage>> {
    let listing = match state.store.list_artifacts(&request.scope).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Listing {} failed: {}", request.scope, e);
            return ResponseJson(AgentResponse::from_store_error(&e));
        }
    };

    match paginate(listing, request.page_token.as_deref(), request.page_size) {
        Ok(page) => ResponseJson(AgentResponse::success_with_data(page)),
        Err(e) => ResponseJson(AgentResponse::from_store_error(&e)),
    }
}

pub async fn get_metadata(
    _auth: ApiKeyAuth,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ArtifactNameRequest>,
) -> ResponseJson<AgentResponse<ArtifactMetadata>> {
    match state.store.get_metadata(&request.name).await {
        Ok(metadata) => ResponseJson(AgentResponse::success_with_data(metadata)),
        Err(e) => ResponseJson(AgentResponse::from_store_error(&e)),
    }
}

pub async fn delete_artifact(
    _auth: ApiKeyAuth,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ArtifactNameRequest>,
) -> ResponseJson<AgentResponse<DeleteResponse>> {
    match state.store.delete(&request.name).await {
        Ok(outcome) => {
            info!("Delete {}: {:?}", request.name, outcome);
            ResponseJson(AgentResponse::success_with_data(DeleteResponse { outcome }))
        }
        Err(e) => {
            warn!("Delete {} failed: {}", request.name, e);
            ResponseJson(AgentResponse::from_store_error(&e))
        }
    }
}

// === Scope handlers ===

pub async fn list_scopes(
    _auth: ApiKeyAuth,
    State(state): State<Arc<AppState>>,
    Json(_request): Json<ListScopesRequest>,
) -> ResponseJson<AgentResponse<ScopesResponse>> {
    match state.store.list_scopes().await {
        Ok(scopes) => ResponseJson(AgentResponse::success_with_data(ScopesResponse { scopes })),
        Err(e) => ResponseJson(AgentResponse::from_store_error(&e)),
    }
}
