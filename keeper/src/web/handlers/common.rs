// Common types and utilities for API handlers

use axum::{http::StatusCode, response::Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{KeeperError, StoreError};

// Helper type for API responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<()>>)>;

#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

// Query parameters and bodies
#[derive(Deserialize)]
pub struct ScopeQuery {
    #[serde(default)]
    pub scope: String,
}

#[derive(Deserialize)]
pub struct EnforceRequest {
    pub scope: String,
    pub max_count: Option<usize>,
}

/// Transient store failures map to 503 so the event source redelivers.
pub fn status_for(err: &KeeperError) -> StatusCode {
    match err {
        KeeperError::Store(StoreError::Unavailable { .. }) => StatusCode::SERVICE_UNAVAILABLE,
        KeeperError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
        KeeperError::Store(StoreError::InvalidName { .. }) => StatusCode::BAD_REQUEST,
        KeeperError::Store(StoreError::PermissionDenied { .. })
        | KeeperError::Store(StoreError::Backend { .. }) => StatusCode::BAD_GATEWAY,
        KeeperError::UnknownStore { .. } => StatusCode::NOT_FOUND,
        KeeperError::InvalidEvent { .. }
        | KeeperError::InvalidRequest { .. }
        | KeeperError::Config(_) => StatusCode::BAD_REQUEST,
    }
}

pub fn error_response(err: &KeeperError) -> (StatusCode, Json<ApiResponse<()>>) {
    (status_for(err), Json(ApiResponse::error(err.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_maps_to_service_unavailable() {
        let err = KeeperError::Store(StoreError::Unavailable {
            backend: "agent".to_string(),
            reason: "timeout".to_string(),
        });
        assert_eq!(status_for(&err), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status_for(&KeeperError::UnknownStore { store: "x".to_string() }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&KeeperError::InvalidEvent { reason: "empty".to_string() }),
            StatusCode::BAD_REQUEST
        );
    }
}
