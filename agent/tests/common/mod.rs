//! Shared fixtures for agent integration tests

#![allow(dead_code)]

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use agent::{create_router, AppState};

pub const TEST_API_KEY: &str = "agent-test-key";

/// Backup directory with files whose modification times follow the given
/// offsets (seconds after the epoch).
pub fn backup_dir(files: &[(&str, u64)]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for (name, offset_secs) in files {
        write_backup(dir.path(), name, *offset_secs);
    }
    dir
}

pub fn write_backup(root: &Path, name: &str, offset_secs: u64) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"{\"backup\":true}").unwrap();
    let file = File::options().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(offset_secs))
        .unwrap();
}

pub fn state_for(dir: &TempDir) -> Arc<AppState> {
    Arc::new(AppState::new(dir.path(), TEST_API_KEY))
}

/// Serve the agent on an ephemeral port and return its base URL.
pub async fn spawn_agent(dir: &TempDir) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let app = create_router(state_for(dir));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", address)
}
