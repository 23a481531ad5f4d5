use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use super::ArtifactStore;
use crate::artifact::{ArtifactEntry, ArtifactMetadata, ArtifactPage, DeleteOutcome};
use crate::errors::StoreError;

const BACKEND: &str = "local";

/// Directory-backed store. A scope is a directory relative to `root` and an
/// artifact name is the `/`-separated path of a regular file under it.
#[derive(Debug, Clone)]
pub struct LocalFsStore {
    root: PathBuf,
}

impl LocalFsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a relative name onto the filesystem, refusing anything that could
    /// escape `root`.
    fn resolve(&self, relative: &str) -> Result<PathBuf, StoreError> {
        let trimmed = relative.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(self.root.clone());
        }

        let candidate = Path::new(trimmed);
        for component in candidate.components() {
            match component {
                Component::Normal(_) => {}
                _ => {
                    return Err(StoreError::InvalidName {
                        name: relative.to_string(),
                        reason: "only plain relative path segments are allowed".to_string(),
                    })
                }
            }
        }

        Ok(self.root.join(candidate))
    }

    fn join_name(scope: &str, file_name: &str) -> String {
        let scope = scope.trim_matches('/');
        if scope.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", scope, file_name)
        }
    }
}

fn map_io_error(err: io::Error, target: &str) -> StoreError {
    match err.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound {
            target: target.to_string(),
        },
        io::ErrorKind::PermissionDenied => StoreError::PermissionDenied {
            backend: BACKEND.to_string(),
            target: target.to_string(),
        },
        _ => StoreError::Unavailable {
            backend: BACKEND.to_string(),
            reason: format!("{}: {}", target, err),
        },
    }
}

fn modified_millis(metadata: &std::fs::Metadata) -> io::Result<i64> {
    let modified: DateTime<Utc> = metadata.modified()?.into();
    Ok(modified.timestamp_millis())
}

#[async_trait]
impl ArtifactStore for LocalFsStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn list_page(
        &self,
        scope: &str,
        _page_token: Option<String>,
    ) -> Result<ArtifactPage, StoreError> {
        let dir = self.resolve(scope)?;

        let mut read_dir = match fs::read_dir(&dir).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Scope directory {} does not exist, treating as empty", dir.display());
                return Ok(ArtifactPage::default());
            }
            Err(e) => return Err(map_io_error(e, scope)),
        };

        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await.map_err(|e| map_io_error(e, scope))? {
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(e) => {
                    warn!("Skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            };
            if !file_type.is_file() {
                continue;
            }

            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                warn!("Skipping non UTF-8 file name in {}", dir.display());
                continue;
            };

            let name = Self::join_name(scope, &file_name);
            // Inline metadata is best effort; the engine falls back to get_metadata.
            let last_modified_ms = match entry.metadata().await {
                Ok(metadata) => modified_millis(&metadata).ok(),
                Err(_) => None,
            };

            entries.push(match last_modified_ms {
                Some(ms) => ArtifactEntry::with_last_modified(name, ms),
                None => ArtifactEntry::new(name),
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(ArtifactPage {
            entries,
            next_page_token: None,
        })
    }

    async fn get_metadata(&self, name: &str) -> Result<ArtifactMetadata, StoreError> {
        let path = self.resolve(name)?;
        let metadata = fs::metadata(&path).await.map_err(|e| map_io_error(e, name))?;

        if !metadata.is_file() {
            return Err(StoreError::NotFound {
                target: name.to_string(),
            });
        }

        let last_modified_ms = modified_millis(&metadata).map_err(|e| map_io_error(e, name))?;

        Ok(ArtifactMetadata {
            name: name.to_string(),
            last_modified_ms,
            size_bytes: Some(metadata.len()),
        })
    }

    async fn delete(&self, name: &str) -> Result<DeleteOutcome, StoreError> {
        let path = self.resolve(name)?;
        if path == self.root {
            return Err(StoreError::InvalidName {
                name: name.to_string(),
                reason: "refusing to delete the store root".to_string(),
            });
        }

        match fs::remove_file(&path).await {
            Ok(()) => Ok(DeleteOutcome::Deleted),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(DeleteOutcome::NotFound),
            Err(e) => Err(map_io_error(e, name)),
        }
    }

    async fn list_scopes(&self) -> Result<Vec<String>, StoreError> {
        let mut scopes = Vec::new();
        let mut pending = vec![String::new()];

        while let Some(scope) = pending.pop() {
            let dir = self.resolve(&scope)?;
            let mut read_dir = match fs::read_dir(&dir).await {
                Ok(read_dir) => read_dir,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(map_io_error(e, &scope)),
            };

            let mut has_files = false;
            while let Some(entry) = read_dir.next_entry().await.map_err(|e| map_io_error(e, &scope))? {
                let Ok(file_type) = entry.file_type().await else {
                    continue;
                };
                let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                    continue;
                };

                if file_type.is_dir() {
                    pending.push(Self::join_name(&scope, &file_name));
                } else if file_type.is_file() {
                    has_files = true;
                }
            }

            if has_files {
                scopes.push(scope);
            }
        }

        scopes.sort();
        Ok(scopes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn store_with_files(files: &[&str]) -> (TempDir, LocalFsStore) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for file in files {
            let path = temp_dir.path().join(file);
            std_fs::create_dir_all(path.parent().unwrap()).unwrap();
            std_fs::write(&path, b"backup").unwrap();
        }
        let store = LocalFsStore::new(temp_dir.path());
        (temp_dir, store)
    }

    #[tokio::test]
    async fn test_lists_only_direct_files_with_inline_metadata() {
        let (_dir, store) = store_with_files(&[
            "backup/u1/a.json",
            "backup/u1/b.json",
            "backup/u1/nested/c.json",
            "backup/u2/d.json",
        ]);

        let entries = store.list_artifacts("backup/u1").await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["backup/u1/a.json", "backup/u1/b.json"]);
        assert!(entries.iter().all(|e| e.last_modified_ms.is_some()));
    }

    #[tokio::test]
    async fn test_missing_scope_is_empty() {
        let (_dir, store) = store_with_files(&[]);
        assert!(store.list_artifacts("backup/nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_and_not_found() {
        let (dir, store) = store_with_files(&["backup/u1/a.json"]);

        assert_eq!(store.delete("backup/u1/a.json").await.unwrap(), DeleteOutcome::Deleted);
        assert!(!dir.path().join("backup/u1/a.json").exists());
        assert_eq!(store.delete("backup/u1/a.json").await.unwrap(), DeleteOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_metadata_reports_size() {
        let (_dir, store) = store_with_files(&["backup/u1/a.json"]);
        let metadata = store.get_metadata("backup/u1/a.json").await.unwrap();
        assert_eq!(metadata.size_bytes, Some(6));
        assert!(metadata.last_modified().is_some());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let (_dir, store) = store_with_files(&["backup/u1/a.json"]);

        let err = store.delete("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidName { .. }));
        let err = store.list_artifacts("backup/../..").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidName { .. }));
    }

    #[tokio::test]
    async fn test_list_scopes_walks_tree() {
        let (_dir, store) = store_with_files(&[
            "root.json",
            "backup/u1/a.json",
            "backup/u1/nested/c.json",
            "backup/u2/d.json",
        ]);

        assert_eq!(
            store.list_scopes().await.unwrap(),
            vec![
                "".to_string(),
                "backup/u1".to_string(),
                "backup/u1/nested".to_string(),
                "backup/u2".to_string(),
            ]
        );
    }
}
