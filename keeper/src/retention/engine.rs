use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::artifact::{is_directory_placeholder, DeleteOutcome};
use crate::config::validate_max_count;
use crate::errors::{KeeperError, StoreError};
use crate::store::ArtifactStore;

/// Result of one `enforce` call. Only `Evicted` removed an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum EnforceOutcome {
    /// Scope already within its limit
    WithinLimit { count: usize },
    /// Oldest artifact deleted; `count` is the size seen before deletion
    Evicted {
        name: String,
        last_modified_ms: i64,
        count: usize,
    },
    /// Chosen victim vanished before we deleted it
    AlreadyGone { name: String },
    /// Delete of the chosen victim failed; left for the next trigger
    DeleteFailed { name: String, reason: String },
    /// Over limit, but no artifact had readable metadata
    NoCandidate { count: usize, skipped: usize },
}

impl EnforceOutcome {
    pub fn deleted(&self) -> Option<&str> {
        match self {
            EnforceOutcome::Evicted { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.deleted().is_none()
    }
}

/// Candidate for eviction after metadata resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub last_modified_ms: i64,
}

/// Pick the least recently modified candidate. Ties go to the first one in
/// listing order.
pub fn select_oldest(candidates: &[Candidate]) -> Option<&Candidate> {
    let mut oldest: Option<&Candidate> = None;
    for candidate in candidates {
        match oldest {
            Some(current) if candidate.last_modified_ms >= current.last_modified_ms => {}
            _ => oldest = Some(candidate),
        }
    }
    oldest
}

/// Keeps each scope at or below a maximum artifact count by deleting the
/// single oldest artifact per invocation.
///
/// Stateless between calls: concurrent invocations for the same scope may
/// both evict, which can leave the scope briefly under its limit.
#[derive(Clone)]
pub struct RetentionEngine {
    store: Arc<dyn ArtifactStore>,
}

impl RetentionEngine {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }

    #[instrument(skip(self), fields(backend = self.store.backend_name()))]
    pub async fn enforce(&self, scope: &str, max_count: usize) -> Result<EnforceOutcome, KeeperError> {
        validate_max_count("max_count", max_count)?;

        // Listing failures propagate; the trigger may redeliver.
        let mut entries = self.store.list_artifacts(scope).await?;
        // Directory placeholders are not artifacts
        entries.retain(|entry| !is_directory_placeholder(&entry.name));
        let count = entries.len();

        if count <= max_count {
            debug!("Scope '{}' has {} artifacts (limit {}), nothing to evict", scope, count, max_count);
            return Ok(EnforceOutcome::WithinLimit { count });
        }

        info!("Scope '{}' has {} artifacts, over limit {}", scope, count, max_count);

        let mut candidates = Vec::with_capacity(count);
        let mut skipped = 0;
        for entry in entries {
            let last_modified_ms = match entry.last_modified_ms {
                Some(ms) => ms,
                None => match self.store.get_metadata(&entry.name).await {
                    Ok(metadata) => metadata.last_modified_ms,
                    Err(e) => {
                        warn!("Skipping {} for this run, metadata unavailable: {}", entry.name, e);
                        skipped += 1;
                        continue;
                    }
                },
            };
            candidates.push(Candidate {
                name: entry.name,
                last_modified_ms,
            });
        }

        let Some(oldest) = select_oldest(&candidates) else {
            warn!(
                "Scope '{}' is over limit but none of its {} artifacts had metadata",
                scope, count
            );
            return Ok(EnforceOutcome::NoCandidate { count, skipped });
        };

        match self.store.delete(&oldest.name).await {
            Ok(DeleteOutcome::Deleted) => {
                info!(
                    "Evicted {} (last modified {}) from scope '{}'",
                    oldest.name, oldest.last_modified_ms, scope
                );
                Ok(EnforceOutcome::Evicted {
                    name: oldest.name.clone(),
                    last_modified_ms: oldest.last_modified_ms,
                    count,
                })
            }
            Ok(DeleteOutcome::NotFound) => {
                info!("{} was already gone, nothing evicted", oldest.name);
                Ok(EnforceOutcome::AlreadyGone {
                    name: oldest.name.clone(),
                })
            }
            Err(StoreError::NotFound { .. }) => {
                info!("{} vanished before delete, nothing evicted", oldest.name);
                Ok(EnforceOutcome::AlreadyGone {
                    name: oldest.name.clone(),
                })
            }
            Err(e) => {
                warn!("Failed to evict {} from scope '{}': {}", oldest.name, scope, e);
                Ok(EnforceOutcome::DeleteFailed {
                    name: oldest.name.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }
}
