// The keeper's agent backend driving a live agent over HTTP
mod common;

use std::sync::Arc;
use std::time::Duration;

use keeper::retention::{EnforceOutcome, RetentionEngine};
use keeper::store::{AgentStore, ArtifactStore};

use common::{backup_dir, spawn_agent, write_backup, TEST_API_KEY};

#[tokio::test]
async fn test_engine_evicts_oldest_through_agent() {
    let dir = backup_dir(&[]);
    for i in 1..=4u64 {
        write_backup(dir.path(), &format!("backup/u1/f{}.json", i), 100 + i);
    }
    write_backup(dir.path(), "backup/u2/other.json", 1);

    let base_url = spawn_agent(&dir).await;
    // Small pages force the client to drain several pages
    let store = AgentStore::new(base_url, TEST_API_KEY, Duration::from_secs(5))
        .unwrap()
        .with_page_size(1);
    let engine = RetentionEngine::new(Arc::new(store));

    let outcome = engine.enforce("backup/u1", 3).await.unwrap();
    assert_eq!(outcome.deleted(), Some("backup/u1/f1.json"));
    assert!(!dir.path().join("backup/u1/f1.json").exists());
    assert!(dir.path().join("backup/u2/other.json").exists());

    let outcome = engine.enforce("backup/u1", 3).await.unwrap();
    assert!(matches!(outcome, EnforceOutcome::WithinLimit { count: 3 }));
}

#[tokio::test]
async fn test_wrong_key_surfaces_permission_denied() {
    let dir = backup_dir(&[("backup/u1/a.json", 1)]);
    let base_url = spawn_agent(&dir).await;

    let store = AgentStore::new(base_url, "not-the-key", Duration::from_secs(5)).unwrap();
    let err = store.list_artifacts("backup/u1").await.unwrap_err();
    assert!(!err.is_transient());
}
