//! Storage port and backends
//!
//! The retention engine only ever talks to an [`ArtifactStore`]. Backends:
//!
//! - **memory**: in-process map, used by tests and local experiments
//! - **local**: a directory tree on this host, one sub-directory per scope
//! - **agent**: a remote `agent` process exposing a directory over HTTP
//!
//! Listings may be paginated; [`ArtifactStore::list_artifacts`] always drains
//! every page before returning, since a partial listing would corrupt the
//! count check.

pub mod agent;
pub mod local;
pub mod memory;

pub use agent::AgentStore;
pub use local::LocalFsStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use crate::artifact::{ArtifactEntry, ArtifactMetadata, ArtifactPage, DeleteOutcome};
use crate::config::{BackendKind, StoreConfig};
use crate::constants::limits;
use crate::errors::{ConfigError, StoreError};

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Short backend identifier used in logs and errors
    fn backend_name(&self) -> &'static str;

    /// Fetch one page of the artifacts directly inside `scope`
    async fn list_page(
        &self,
        scope: &str,
        page_token: Option<String>,
    ) -> Result<ArtifactPage, StoreError>;

    async fn get_metadata(&self, name: &str) -> Result<ArtifactMetadata, StoreError>;

    async fn delete(&self, name: &str) -> Result<DeleteOutcome, StoreError>;

    /// Scopes currently holding at least one artifact
    async fn list_scopes(&self) -> Result<Vec<String>, StoreError>;

    /// List every artifact in `scope`, following page tokens until exhausted.
    async fn list_artifacts(&self, scope: &str) -> Result<Vec<ArtifactEntry>, StoreError> {
        let mut entries = Vec::new();
        let mut seen_tokens = HashSet::new();
        let mut token: Option<String> = None;

        for _ in 0..limits::MAX_LIST_PAGES {
            let page = self.list_page(scope, token.take()).await?;
            entries.extend(page.entries);

            match page.next_page_token {
                None => return Ok(entries),
                Some(next) => {
                    if !seen_tokens.insert(next.clone()) {
                        return Err(StoreError::Backend {
                            backend: self.backend_name().to_string(),
                            reason: format!("page token '{}' repeated while listing '{}'", next, scope),
                        });
                    }
                    token = Some(next);
                }
            }
        }

        Err(StoreError::Backend {
            backend: self.backend_name().to_string(),
            reason: format!(
                "listing '{}' exceeded {} pages",
                scope,
                limits::MAX_LIST_PAGES
            ),
        })
    }
}

/// Build the backend described by a store configuration block.
pub fn build_store(
    store_name: &str,
    store_config: &StoreConfig,
) -> Result<Arc<dyn ArtifactStore>, ConfigError> {
    match store_config.backend {
        BackendKind::Memory => Ok(Arc::new(MemoryStore::new())),
        BackendKind::Local => {
            let root = store_config.root_path.as_ref().ok_or_else(|| ConfigError::MissingRequired {
                field: format!("{}.root_path", store_name),
            })?;
            Ok(Arc::new(LocalFsStore::new(root)))
        }
        BackendKind::Agent => {
            let store = AgentStore::from_config(store_name, store_config)?;
            Ok(Arc::new(store))
        }
    }
}
