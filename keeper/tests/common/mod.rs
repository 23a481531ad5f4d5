//! Shared fixtures for keeper integration tests
//!
//! - Router state over in-memory stores
//! - Temporary config directories

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use keeper::config::Config;
use keeper::services::RetentionService;
use keeper::store::MemoryStore;
use keeper::web::AppState;

pub const TEST_API_KEY: &str = "keeper-test-key";

/// Memory store seeded with `count` artifacts named `<scope>/f<i>` whose
/// timestamps equal their index.
pub async fn seeded_store(scope: &str, count: usize) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for i in 1..=count {
        store.insert(&format!("{}/f{}", scope, i), i as i64).await;
    }
    store
}

pub fn app_state(stores: Vec<(&str, Arc<MemoryStore>, usize)>) -> AppState {
    let mut service = RetentionService::new(keeper::constants::retention::DEFAULT_MAX_COUNT);
    for (name, store, max_count) in stores {
        service
            .register(name, store, max_count)
            .expect("Failed to register store");
    }
    AppState::new(Arc::new(Config::default()), Arc::new(service), TEST_API_KEY.to_string())
}

/// Writes `main.toml` plus one file per store into a temp directory.
pub struct TestConfigDir {
    pub temp_dir: TempDir,
}

impl TestConfigDir {
    pub fn new(main_toml: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("main.toml"), main_toml).expect("Failed to write main.toml");
        Self { temp_dir }
    }

    pub fn with_store(self, name: &str, store_toml: &str) -> Self {
        fs::write(self.temp_dir.path().join(format!("{}.toml", name)), store_toml)
            .expect("Failed to write store config");
        self
    }

    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    pub fn path_string(&self) -> String {
        self.temp_dir.path().to_string_lossy().to_string()
    }
}
