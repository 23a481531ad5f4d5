//! Bearer-token authentication for mutating routes

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

use crate::web::AppState;

/// Extractor that validates the API key from the Authorization header.
/// Add it as the first handler argument to protect a route.
pub struct ApiKeyAuth;

impl FromRequestParts<AppState> for ApiKeyAuth {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "));

        match auth_header {
            Some(token) if token == &*state.api_key => Ok(ApiKeyAuth),
            _ => Err(StatusCode::UNAUTHORIZED),
        }
    }
}
