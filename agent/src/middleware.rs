//! Middleware for the agent server

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use std::sync::Arc;

use crate::AppState;

/// Extractor that validates the API key from the Authorization header.
///
/// # Example
/// ```ignore
/// async fn my_handler(
///     _auth: ApiKeyAuth,
///     State(state): State<Arc<AppState>>,
///     Json(request): Json<ArtifactNameRequest>,
/// ) -> ResponseJson<AgentResponse<DeleteResponse>> {
///     // API key is already validated here
/// }
/// ```
pub struct ApiKeyAuth;

impl FromRequestParts<Arc<AppState>> for ApiKeyAuth {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "));

        match auth_header {
            Some(token) if token == state.api_key => Ok(ApiKeyAuth),
            _ => Err(StatusCode::UNAUTHORIZED),
        }
    }
}
