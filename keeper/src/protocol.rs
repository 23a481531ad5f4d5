//! Wire types shared between the keeper's agent client and the agent server

use serde::{Deserialize, Serialize};

use crate::artifact::DeleteOutcome;
use crate::errors::StoreError;

// === REQUEST STRUCTURES ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListArtifactsRequest {
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactNameRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListScopesRequest {}

// === RESPONSE STRUCTURES ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub outcome: DeleteOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopesResponse {
    pub scopes: Vec<String>,
}

/// Error classification carried across the wire so the client can rebuild
/// the matching [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentErrorKind {
    NotFound,
    PermissionDenied,
    InvalidName,
    Unavailable,
    Backend,
}

impl AgentErrorKind {
    pub fn from_store_error(err: &StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AgentErrorKind::NotFound,
            StoreError::PermissionDenied { .. } => AgentErrorKind::PermissionDenied,
            StoreError::InvalidName { .. } => AgentErrorKind::InvalidName,
            StoreError::Unavailable { .. } => AgentErrorKind::Unavailable,
            StoreError::Backend { .. } => AgentErrorKind::Backend,
        }
    }

    pub fn into_store_error(self, backend: &str, target: &str, message: String) -> StoreError {
        match self {
            AgentErrorKind::NotFound => StoreError::NotFound {
                target: target.to_string(),
            },
            AgentErrorKind::PermissionDenied => StoreError::PermissionDenied {
                backend: backend.to_string(),
                target: target.to_string(),
            },
            AgentErrorKind::InvalidName => StoreError::InvalidName {
                name: target.to_string(),
                reason: message,
            },
            AgentErrorKind::Unavailable => StoreError::Unavailable {
                backend: backend.to_string(),
                reason: message,
            },
            AgentErrorKind::Backend => StoreError::Backend {
                backend: backend.to_string(),
                reason: message,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentResponse<T> {
    pub success: bool,
    // `default` would add a `T: Default` bound to Deserialize
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<AgentErrorKind>,
}

impl<T> AgentResponse<T> {
    pub fn success_with_data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
        }
    }

    pub fn from_store_error(err: &StoreError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            error_kind: Some(AgentErrorKind::from_store_error(err)),
        }
    }
}
