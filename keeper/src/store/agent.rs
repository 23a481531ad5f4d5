use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::ArtifactStore;
use crate::artifact::{ArtifactMetadata, ArtifactPage, DeleteOutcome};
use crate::config::StoreConfig;
use crate::constants::{agent, http};
use crate::errors::{ConfigError, StoreError};
use crate::protocol::{
    AgentErrorKind, AgentResponse, ArtifactNameRequest, DeleteResponse, ListArtifactsRequest, ListScopesRequest,
    ScopesResponse,
};

const BACKEND: &str = "agent";

/// Store living behind a remote `agent` process.
pub struct AgentStore {
    client: Client,
    base_url: String,
    api_key: String,
    page_size: Option<usize>,
}

impl AgentStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(http::CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                field: "agent client".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            page_size: None,
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn from_config(store_name: &str, store_config: &StoreConfig) -> Result<Self, ConfigError> {
        let host = store_config.agent_host.as_ref().ok_or_else(|| ConfigError::MissingRequired {
            field: format!("{}.agent_host", store_name),
        })?;
        let api_key = store_config.agent_api_key.as_ref().ok_or_else(|| ConfigError::MissingRequired {
            field: format!("{}.agent_api_key", store_name),
        })?;
        let port = store_config.agent_port.unwrap_or(agent::DEFAULT_PORT);
        let timeout = store_config
            .request_timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(http::REQUEST_TIMEOUT);

        let store = Self::new(format!("http://{}:{}", host, port), api_key, timeout)?;
        Ok(match store_config.page_size {
            Some(page_size) => store.with_page_size(page_size),
            None => store,
        })
    }

    async fn post<Req, Resp>(&self, path: &str, target: &str, body: &Req) -> Result<Resp, StoreError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {} ({})", url, target);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable {
                backend: BACKEND.to_string(),
                reason: format!("request to {} failed: {}", url, e),
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::PermissionDenied {
                backend: BACKEND.to_string(),
                target: target.to_string(),
            });
        }
        if status.is_server_error() {
            return Err(StoreError::Unavailable {
                backend: BACKEND.to_string(),
                reason: format!("{} returned HTTP {}", url, status),
            });
        }
        if !status.is_success() {
            return Err(StoreError::Backend {
                backend: BACKEND.to_string(),
                reason: format!("{} returned HTTP {}", url, status),
            });
        }

        let body: AgentResponse<Resp> = response.json().await.map_err(|e| StoreError::Backend {
            backend: BACKEND.to_string(),
            reason: format!("invalid response from {}: {}", url, e),
        })?;

        if !body.success {
            let message = body.error.unwrap_or_else(|| "unknown agent error".to_string());
            let kind = body.error_kind.unwrap_or(AgentErrorKind::Backend);
            return Err(kind.into_store_error(BACKEND, target, message));
        }

        body.data.ok_or_else(|| StoreError::Backend {
            backend: BACKEND.to_string(),
            reason: format!("{} returned success without data", url),
        })
    }
}

#[async_trait]
impl ArtifactStore for AgentStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn list_page(
        &self,
        scope: &str,
        page_token: Option<String>,
    ) -> Result<ArtifactPage, StoreError> {
        let request = ListArtifactsRequest {
            scope: scope.to_string(),
            page_token,
            page_size: self.page_size,
        };
        self.post("/artifacts/list", scope, &request).await
    }

    async fn get_metadata(&self, name: &str) -> Result<ArtifactMetadata, StoreError> {
        let request = ArtifactNameRequest {
            name: name.to_string(),
        };
        self.post("/artifacts/metadata", name, &request).await
    }

    async fn delete(&self, name: &str) -> Result<DeleteOutcome, StoreError> {
        let request = ArtifactNameRequest {
            name: name.to_string(),
        };
        let response: DeleteResponse = self.post("/artifacts/delete", name, &request).await?;
        Ok(response.outcome)
    }

    async fn list_scopes(&self) -> Result<Vec<String>, StoreError> {
        let response: ScopesResponse = self.post("/scopes/list", "scopes", &ListScopesRequest {}).await?;
        Ok(response.scopes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn store_for(server: &MockServer) -> AgentStore {
        AgentStore::new(server.uri(), "test-key", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_list_follows_page_tokens() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/artifacts/list"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_json(json!({ "scope": "backup/u1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "entries": [{ "name": "backup/u1/a", "last_modified_ms": 1 }],
                    "next_page_token": "1"
                }
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/artifacts/list"))
            .and(body_json(json!({ "scope": "backup/u1", "page_token": "1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "entries": [{ "name": "backup/u1/b", "last_modified_ms": 2 }] }
            })))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        let entries = store.list_artifacts("backup/u1").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].name, "backup/u1/b");
    }

    #[tokio::test]
    async fn test_server_error_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/artifacts/list"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        let err = store.list_artifacts("backup/u1").await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_unauthorized_is_permission_denied() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/artifacts/delete"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        let err = store.delete("backup/u1/a").await.unwrap_err();
        assert!(matches!(err, StoreError::PermissionDenied { .. }));
    }

    #[tokio::test]
    async fn test_agent_error_kind_is_mapped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/artifacts/metadata"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "'backup/u1/a' not found",
                "error_kind": "not_found"
            })))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        let err = store.get_metadata("backup/u1/a").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_outcome_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/artifacts/delete"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "outcome": "not_found" }
            })))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        assert_eq!(store.delete("backup/u1/a").await.unwrap(), DeleteOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_unreachable_agent_is_transient() {
        let store = AgentStore::new("http://127.0.0.1:1", "k", Duration::from_millis(200)).unwrap();
        let err = store.list_scopes().await.unwrap_err();
        assert!(err.is_transient());
    }
}
