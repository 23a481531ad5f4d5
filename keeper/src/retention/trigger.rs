use serde::{Deserialize, Serialize};

use crate::artifact::{is_directory_placeholder, scope_of};
use crate::errors::KeeperError;

/// Notification that a write to a store completed.
///
/// Field aliases accept the object-store notification shape (`name`,
/// `bucket`) as well as the keeper's own names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeEvent {
    #[serde(alias = "name", alias = "artifactPath")]
    pub artifact_path: String,
    #[serde(alias = "store", alias = "storeIdentifier")]
    pub bucket: String,
    #[serde(default, alias = "scopeDirectory", skip_serializing_if = "Option::is_none")]
    pub scope_directory: Option<String>,
}

/// What a finalize event asks the engine to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedEvent {
    Enforce { store: String, scope: String },
    /// Directory placeholder objects do not count as artifacts
    Ignore { reason: String },
}

impl FinalizeEvent {
    pub fn new(bucket: impl Into<String>, artifact_path: impl Into<String>) -> Self {
        Self {
            artifact_path: artifact_path.into(),
            bucket: bucket.into(),
            scope_directory: None,
        }
    }

    pub fn resolve(&self) -> Result<ResolvedEvent, KeeperError> {
        if self.bucket.trim().is_empty() {
            return Err(KeeperError::InvalidEvent {
                reason: "bucket is empty".to_string(),
            });
        }

        let path = self.artifact_path.trim();
        if path.is_empty() {
            return Err(KeeperError::InvalidEvent {
                reason: "artifact path is empty".to_string(),
            });
        }

        if is_directory_placeholder(path) {
            return Ok(ResolvedEvent::Ignore {
                reason: format!("'{}' is a directory placeholder", path),
            });
        }

        let scope = match &self.scope_directory {
            Some(scope) => scope.trim_matches('/').to_string(),
            None => scope_of(path),
        };

        Ok(ResolvedEvent::Enforce {
            store: self.bucket.clone(),
            scope,
        })
    }
}
