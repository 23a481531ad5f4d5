// File: keeper/src/services/retention_service.rs
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::artifact::millis_to_datetime;
use crate::config::{validate_max_count, Config};
use crate::constants::limits;
use crate::errors::KeeperError;
use crate::retention::{EnforceOutcome, FinalizeEvent, ResolvedEvent, RetentionEngine};
use crate::store::{build_store, ArtifactStore};

struct StoreHandle {
    engine: RetentionEngine,
    max_count: usize,
    sweep_schedule: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreSummary {
    pub name: String,
    pub backend: String,
    pub max_count: usize,
    pub sweep_schedule: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FinalizeReport {
    Enforced {
        store: String,
        scope: String,
        outcome: EnforceOutcome,
    },
    Ignored {
        reason: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ScopeStats {
    pub store: String,
    pub scope: String,
    pub count: usize,
    pub max_count: usize,
    pub over_limit: bool,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
    pub unknown_metadata: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScopeFailure {
    pub scope: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub store: String,
    pub scopes_checked: usize,
    pub evicted: Vec<String>,
    pub noops: usize,
    pub failures: Vec<ScopeFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Registry of named stores, each with its own retention limit.
///
/// Every entry point ends in a single [`RetentionEngine::enforce`] call per
/// scope, so the one-eviction-per-invocation rule holds for webhooks, manual
/// calls and sweeps alike.
pub struct RetentionService {
    stores: HashMap<String, StoreHandle>,
    default_max_count: usize,
}

impl RetentionService {
    pub fn new(default_max_count: usize) -> Self {
        Self {
            stores: HashMap::new(),
            default_max_count,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, KeeperError> {
        let mut service = Self::new(config.default_max_count);

        for (name, store_config) in &config.stores {
            let store = build_store(name, store_config)?;
            let max_count = store_config.effective_max_count(config.default_max_count);
            let schedule = store_config
                .effective_sweep_schedule(config.sweep_schedule.as_deref())
                .map(str::to_string);

            info!(
                "Registered store {} ({} backend, max_count {})",
                name,
                store.backend_name(),
                max_count
            );
            service.register_with_schedule(name, store, max_count, schedule)?;
        }

        Ok(service)
    }

    pub fn register(
        &mut self,
        name: &str,
        store: Arc<dyn ArtifactStore>,
        max_count: usize,
    ) -> Result<(), KeeperError> {
        self.register_with_schedule(name, store, max_count, None)
    }

    pub fn register_with_schedule(
        &mut self,
        name: &str,
        store: Arc<dyn ArtifactStore>,
        max_count: usize,
        sweep_schedule: Option<String>,
    ) -> Result<(), KeeperError> {
        validate_max_count(&format!("{}.max_count", name), max_count)?;
        self.stores.insert(
            name.to_string(),
            StoreHandle {
                engine: RetentionEngine::new(store),
                max_count,
                sweep_schedule,
            },
        );
        Ok(())
    }

    pub fn default_max_count(&self) -> usize {
        self.default_max_count
    }

    pub fn stores(&self) -> Vec<StoreSummary> {
        let mut summaries: Vec<StoreSummary> = self
            .stores
            .iter()
            .map(|(name, handle)| StoreSummary {
                name: name.clone(),
                backend: handle.engine.store().backend_name().to_string(),
                max_count: handle.max_count,
                sweep_schedule: handle.sweep_schedule.clone(),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    fn handle(&self, store: &str) -> Result<&StoreHandle, KeeperError> {
        self.stores.get(store).ok_or_else(|| KeeperError::UnknownStore {
            store: store.to_string(),
        })
    }

    /// Entry point for "artifact finalized" notifications.
    #[instrument(skip(self, event), fields(store = %event.bucket, path = %event.artifact_path))]
    pub async fn handle_finalize(&self, event: &FinalizeEvent) -> Result<FinalizeReport, KeeperError> {
        let (store, scope) = match event.resolve()? {
            ResolvedEvent::Enforce { store, scope } => (store, scope),
            ResolvedEvent::Ignore { reason } => {
                info!("Ignoring finalize event: {}", reason);
                return Ok(FinalizeReport::Ignored { reason });
            }
        };

        let handle = self.handle(&store)?;
        let outcome = handle.engine.enforce(&scope, handle.max_count).await?;

        Ok(FinalizeReport::Enforced {
            store,
            scope,
            outcome,
        })
    }

    pub async fn enforce_scope(
        &self,
        store: &str,
        scope: &str,
        max_count: Option<usize>,
    ) -> Result<EnforceOutcome, KeeperError> {
        let handle = self.handle(store)?;
        if max_count == Some(0) {
            return Err(KeeperError::InvalidRequest {
                reason: "max_count override must be at least 1".to_string(),
            });
        }
        handle
            .engine
            .enforce(scope.trim_matches('/'), max_count.unwrap_or(handle.max_count))
            .await
    }

    pub async fn scope_stats(&self, store: &str, scope: &str) -> Result<ScopeStats, KeeperError> {
        let handle = self.handle(store)?;
        let backend = handle.engine.store();
        let scope = scope.trim_matches('/');
        let entries = backend.list_artifacts(scope).await?;

        let mut timestamps = Vec::with_capacity(entries.len());
        let mut unknown_metadata = 0;
        for entry in &entries {
            let ms = match entry.last_modified_ms {
                Some(ms) => Some(ms),
                None => backend.get_metadata(&entry.name).await.ok().map(|m| m.last_modified_ms),
            };
            match ms {
                Some(ms) => timestamps.push(ms),
                None => unknown_metadata += 1,
            }
        }

        Ok(ScopeStats {
            store: store.to_string(),
            scope: scope.to_string(),
            count: entries.len(),
            max_count: handle.max_count,
            over_limit: entries.len() > handle.max_count,
            oldest: timestamps.iter().min().and_then(|ms| millis_to_datetime(*ms)),
            newest: timestamps.iter().max().and_then(|ms| millis_to_datetime(*ms)),
            unknown_metadata,
        })
    }

    /// Batch pass over every scope of a store, one `enforce` per scope.
    #[instrument(skip(self))]
    pub async fn sweep_store(&self, store: &str) -> Result<SweepReport, KeeperError> {
        let handle = self.handle(store)?;
        let started_at = Utc::now();
        let scopes = handle.engine.store().list_scopes().await?;
        let scopes_checked = scopes.len();

        info!("Sweeping {} scopes of store {}", scopes_checked, store);

        let results: Vec<(String, Result<EnforceOutcome, KeeperError>)> = stream::iter(scopes)
            .map(|scope| async move {
                let result = handle.engine.enforce(&scope, handle.max_count).await;
                (scope, result)
            })
            .buffer_unordered(limits::MAX_CONCURRENT_SCOPES)
            .collect()
            .await;

        let mut evicted = Vec::new();
        let mut noops = 0;
        let mut failures = Vec::new();
        for (scope, result) in results {
            match result {
                Ok(outcome) => match outcome.deleted() {
                    Some(name) => evicted.push(name.to_string()),
                    None => noops += 1,
                },
                Err(e) => {
                    warn!("Sweep of scope '{}' in store {} failed: {}", scope, store, e);
                    failures.push(ScopeFailure {
                        scope,
                        error: e.to_string(),
                    });
                }
            }
        }
        evicted.sort();

        info!(
            "Sweep of store {} finished: {} evicted, {} unchanged, {} failed",
            store,
            evicted.len(),
            noops,
            failures.len()
        );

        Ok(SweepReport {
            store: store.to_string(),
            scopes_checked,
            evicted,
            noops,
            failures,
            started_at,
            finished_at: Utc::now(),
        })
    }

    pub async fn sweep_all(&self) -> Vec<SweepReport> {
        let mut names: Vec<&String> = self.stores.keys().collect();
        names.sort();

        let mut reports = Vec::with_capacity(names.len());
        for name in names {
            match self.sweep_store(name).await {
                Ok(report) => reports.push(report),
                Err(e) => error!("Sweep of store {} failed: {}", name, e),
            }
        }
        reports
    }
}
