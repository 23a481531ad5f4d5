//! Artifact model shared by the engine and every storage backend

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One row of a scope listing.
///
/// `last_modified_ms` is filled in when the backend returns metadata inline;
/// otherwise the engine asks for it with a separate metadata call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_ms: Option<i64>,
}

impl ArtifactEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_modified_ms: None,
        }
    }

    pub fn with_last_modified(name: impl Into<String>, last_modified_ms: i64) -> Self {
        Self {
            name: name.into(),
            last_modified_ms: Some(last_modified_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub name: String,
    pub last_modified_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

impl ArtifactMetadata {
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.last_modified_ms)
    }
}

/// A single page of a listing. `next_page_token` is `None` on the last page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPage {
    pub entries: Vec<ArtifactEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Parent directory of an artifact path: `backup/uid/test.txt` -> `backup/uid`.
/// Root-level names belong to the empty scope.
pub fn scope_of(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    match trimmed.rfind('/') {
        Some(pos) => trimmed[..pos].to_string(),
        None => String::new(),
    }
}

/// Object stores create `dir/` placeholder objects; those are not artifacts.
pub fn is_directory_placeholder(path: &str) -> bool {
    path.ends_with('/')
}

pub fn millis_to_datetime(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}
