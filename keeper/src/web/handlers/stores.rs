// Store inspection and manual retention endpoints

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde_json::{json, Value};
use tracing::{error, info};

use super::common::{error_response, ApiResponse, ApiResult, EnforceRequest, ScopeQuery};
use crate::retention::EnforceOutcome;
use crate::services::{ScopeStats, StoreSummary, SweepReport};
use crate::web::auth::ApiKeyAuth;
use crate::web::AppState;

pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    Ok(Json(ApiResponse::success(json!({
        "status": "ok",
        "stores": state.retention_service.stores().len(),
        "default_max_count": state.retention_service.default_max_count(),
    }))))
}

pub async fn list_stores(State(state): State<AppState>) -> ApiResult<Vec<StoreSummary>> {
    Ok(Json(ApiResponse::success(state.retention_service.stores())))
}

/// Run one retention pass on a single scope
pub async fn enforce_scope(
    _auth: ApiKeyAuth,
    Path(store): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<EnforceRequest>,
) -> ApiResult<EnforceOutcome> {
    info!("Manual retention requested for {}:{}", store, request.scope);

    match state
        .retention_service
        .enforce_scope(&store, &request.scope, request.max_count)
        .await
    {
        Ok(outcome) => Ok(Json(ApiResponse::success(outcome))),
        Err(e) => {
            error!("Manual retention for {}:{} failed: {}", store, request.scope, e);
            Err(error_response(&e))
        }
    }
}

pub async fn get_scope_stats(
    Path(store): Path<String>,
    Query(query): Query<ScopeQuery>,
    State(state): State<AppState>,
) -> ApiResult<ScopeStats> {
    match state.retention_service.scope_stats(&store, &query.scope).await {
        Ok(stats) => Ok(Json(ApiResponse::success(stats))),
        Err(e) => {
            error!("Failed to get stats for {}:{}: {}", store, query.scope, e);
            Err(error_response(&e))
        }
    }
}

pub async fn sweep_store(
    _auth: ApiKeyAuth,
    Path(store): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<SweepReport> {
    info!("Manual sweep requested for store {}", store);

    match state.retention_service.sweep_store(&store).await {
        Ok(report) => Ok(Json(ApiResponse::success(report))),
        Err(e) => {
            error!("Sweep of store {} failed: {}", store, e);
            Err(error_response(&e))
        }
    }
}
