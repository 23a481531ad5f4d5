use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use super::ArtifactStore;
use crate::artifact::{is_directory_placeholder, scope_of, ArtifactEntry, ArtifactMetadata, ArtifactPage, DeleteOutcome};
use crate::errors::StoreError;

const BACKEND: &str = "memory";

/// Most recent deletes kept by [`MemoryStore::deleted`]
pub const DELETE_LOG_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
struct StoredArtifact {
    last_modified_ms: i64,
    size_bytes: u64,
}

/// In-process store keyed by full artifact name.
///
/// Like an object store it lists directory placeholders (`scope/`) verbatim;
/// filtering them is the caller's job.
///
/// Listings never carry inline metadata, so callers go through
/// [`ArtifactStore::get_metadata`] for every entry. Failure injection hooks
/// let tests reproduce backend outages without a real service.
pub struct MemoryStore {
    artifacts: RwLock<BTreeMap<String, StoredArtifact>>,
    page_size: Option<usize>,
    listing_failures: AtomicUsize,
    metadata_failures: RwLock<HashSet<String>>,
    delete_failures: RwLock<HashSet<String>>,
    delete_log: RwLock<VecDeque<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            artifacts: RwLock::new(BTreeMap::new()),
            page_size: None,
            listing_failures: AtomicUsize::new(0),
            metadata_failures: RwLock::new(HashSet::new()),
            delete_failures: RwLock::new(HashSet::new()),
            delete_log: RwLock::new(VecDeque::new()),
        }
    }

    /// Split listings into pages of `page_size` entries.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size.max(1));
        self
    }

    pub async fn insert(&self, name: &str, last_modified_ms: i64) {
        self.artifacts.write().await.insert(
            name.to_string(),
            StoredArtifact {
                last_modified_ms,
                size_bytes: 0,
            },
        );
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.artifacts.read().await.contains_key(name)
    }

    pub async fn count_in_scope(&self, scope: &str) -> usize {
        self.artifacts
            .read()
            .await
            .keys()
            .filter(|name| !is_directory_placeholder(name) && scope_of(name) == scope)
            .count()
    }

    /// Names passed to a successful delete, in call order. Only the last
    /// [`DELETE_LOG_CAPACITY`] are kept.
    pub async fn deleted(&self) -> Vec<String> {
        self.delete_log.read().await.iter().cloned().collect()
    }

    /// Make the next `times` listing calls fail as if the backend were down.
    pub fn fail_next_listings(&self, times: usize) {
        self.listing_failures.store(times, Ordering::SeqCst);
    }

    pub async fn fail_metadata_for(&self, name: &str) {
        self.metadata_failures.write().await.insert(name.to_string());
    }

    pub async fn fail_delete_for(&self, name: &str) {
        self.delete_failures.write().await.insert(name.to_string());
    }

    fn take_listing_failure(&self) -> bool {
        self.listing_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn list_page(
        &self,
        scope: &str,
        page_token: Option<String>,
    ) -> Result<ArtifactPage, StoreError> {
        if self.take_listing_failure() {
            return Err(StoreError::Unavailable {
                backend: BACKEND.to_string(),
                reason: "injected listing failure".to_string(),
            });
        }

        let offset = match page_token {
            Some(token) => token.parse::<usize>().map_err(|_| StoreError::Backend {
                backend: BACKEND.to_string(),
                reason: format!("invalid page token '{}'", token),
            })?,
            None => 0,
        };

        let artifacts = self.artifacts.read().await;
        let in_scope: Vec<ArtifactEntry> = artifacts
            .keys()
            .filter(|name| scope_of(name) == scope)
            .map(|name| ArtifactEntry::new(name.clone()))
            .collect();

        let page_size = self.page_size.unwrap_or(in_scope.len().max(1));
        let entries: Vec<ArtifactEntry> = in_scope.iter().skip(offset).take(page_size).cloned().collect();
        let next = offset + entries.len();
        let next_page_token = if next < in_scope.len() {
            Some(next.to_string())
        } else {
            None
        };

        Ok(ArtifactPage {
            entries,
            next_page_token,
        })
    }

    async fn get_metadata(&self, name: &str) -> Result<ArtifactMetadata, StoreError> {
        if self.metadata_failures.read().await.contains(name) {
            return Err(StoreError::Unavailable {
                backend: BACKEND.to_string(),
                reason: format!("injected metadata failure for '{}'", name),
            });
        }

        let artifacts = self.artifacts.read().await;
        let stored = artifacts.get(name).ok_or_else(|| StoreError::NotFound {
            target: name.to_string(),
        })?;

        Ok(ArtifactMetadata {
            name: name.to_string(),
            last_modified_ms: stored.last_modified_ms,
            size_bytes: Some(stored.size_bytes),
        })
    }

    async fn delete(&self, name: &str) -> Result<DeleteOutcome, StoreError> {
        if self.delete_failures.read().await.contains(name) {
            return Err(StoreError::PermissionDenied {
                backend: BACKEND.to_string(),
                target: name.to_string(),
            });
        }

        match self.artifacts.write().await.remove(name) {
            Some(_) => {
                let mut log = self.delete_log.write().await;
                if log.len() == DELETE_LOG_CAPACITY {
                    log.pop_front();
                }
                log.push_back(name.to_string());
                Ok(DeleteOutcome::Deleted)
            }
            None => Ok(DeleteOutcome::NotFound),
        }
    }

    async fn list_scopes(&self) -> Result<Vec<String>, StoreError> {
        let artifacts = self.artifacts.read().await;
        let scopes: BTreeSet<String> = artifacts
            .keys()
            .filter(|name| !is_directory_placeholder(name))
            .map(|name| scope_of(name))
            .collect();
        Ok(scopes.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listing_is_scoped_and_paginated() {
        let store = MemoryStore::new().with_page_size(2);
        for i in 1..=5 {
            store.insert(&format!("backup/a/f{}", i), i).await;
        }
        store.insert("backup/b/other", 1).await;

        let first = store.list_page("backup/a", None).await.unwrap();
        assert_eq!(first.entries.len(), 2);
        assert_eq!(first.next_page_token.as_deref(), Some("2"));

        let all = store.list_artifacts("backup/a").await.unwrap();
        assert_eq!(all.len(), 5);
        assert!(all.iter().all(|e| e.last_modified_ms.is_none()));
    }

    #[tokio::test]
    async fn test_injected_listing_failures_are_consumed() {
        let store = MemoryStore::new();
        store.insert("s/a", 1).await;
        store.fail_next_listings(1);

        let err = store.list_artifacts("s").await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(store.list_artifacts("s").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_reports_missing_artifacts() {
        let store = MemoryStore::new();
        store.insert("s/a", 1).await;

        assert_eq!(store.delete("s/a").await.unwrap(), DeleteOutcome::Deleted);
        assert_eq!(store.delete("s/a").await.unwrap(), DeleteOutcome::NotFound);
        assert_eq!(store.deleted().await, vec!["s/a".to_string()]);
    }

    #[tokio::test]
    async fn test_list_scopes_is_distinct() {
        let store = MemoryStore::new();
        store.insert("backup/u1/a", 1).await;
        store.insert("backup/u1/b", 2).await;
        store.insert("backup/u2/a", 3).await;

        assert_eq!(
            store.list_scopes().await.unwrap(),
            vec!["backup/u1".to_string(), "backup/u2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_placeholders_do_not_make_scopes() {
        let store = MemoryStore::new();
        store.insert("backup/empty/", 1).await;
        store.insert("backup/u1/", 1).await;
        store.insert("backup/u1/a", 2).await;

        assert_eq!(store.list_scopes().await.unwrap(), vec!["backup/u1".to_string()]);
        assert_eq!(store.count_in_scope("backup/u1").await, 1);
    }

    #[tokio::test]
    async fn test_delete_log_is_bounded() {
        let store = MemoryStore::new();
        let total = DELETE_LOG_CAPACITY + 5;
        for i in 0..total {
            let name = format!("s/f{:05}", i);
            store.insert(&name, i as i64).await;
            store.delete(&name).await.unwrap();
        }

        let deleted = store.deleted().await;
        assert_eq!(deleted.len(), DELETE_LOG_CAPACITY);
        assert_eq!(deleted[0], "s/f00005");
        assert_eq!(deleted.last().map(String::as_str), Some("s/f01028"));
    }
}
