// Config directory -> service -> local filesystem eviction
mod common;

use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use keeper::config::ConfigManager;
use keeper::retention::{EnforceOutcome, FinalizeEvent};
use keeper::services::{FinalizeReport, RetentionService};
use common::TestConfigDir;

fn write_backup(root: &Path, name: &str, offset_secs: u64) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"{}").unwrap();
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(offset_secs))
        .unwrap();
}

#[tokio::test]
async fn test_local_store_from_config_evicts_oldest() {
    let backups = TempDir::new().unwrap();
    for i in 1..=4u64 {
        write_backup(backups.path(), &format!("backup/u1/b{}.json", i), 1_000 + i);
    }

    let store_toml = format!(
        "[store]\nbackend = \"local\"\nroot_path = \"{}\"\nmax_count = 3\n",
        backups.path().display()
    );
    let config_dir = TestConfigDir::new("default_max_count = 50\n").with_store("user-backups", &store_toml);

    let manager = ConfigManager::new(config_dir.path_string()).await.unwrap();
    let service = RetentionService::from_config(&manager.get_current_config()).unwrap();

    let event = FinalizeEvent::new("user-backups", "backup/u1/b4.json");
    let report = service.handle_finalize(&event).await.unwrap();

    match report {
        FinalizeReport::Enforced { outcome, .. } => {
            assert_eq!(outcome.deleted(), Some("backup/u1/b1.json"));
        }
        other => panic!("unexpected report: {:?}", other),
    }
    assert!(!backups.path().join("backup/u1/b1.json").exists());

    // A redelivered event is a no-op
    let report = service.handle_finalize(&event).await.unwrap();
    assert!(matches!(
        report,
        FinalizeReport::Enforced {
            outcome: EnforceOutcome::WithinLimit { count: 3 },
            ..
        }
    ));
}

#[tokio::test]
async fn test_zero_max_count_is_rejected_at_load() {
    let config_dir = TestConfigDir::new("").with_store("scratch", "[store]\nbackend = \"memory\"\nmax_count = 0\n");
    assert!(ConfigManager::new(config_dir.path_string()).await.is_err());
}

#[tokio::test]
async fn test_malformed_cron_is_rejected_at_load() {
    let config_dir = TestConfigDir::new("sweep_schedule = \"0 0 3 * *\"\n")
        .with_store("scratch", "[store]\nbackend = \"memory\"\n");
    assert!(ConfigManager::new(config_dir.path_string()).await.is_err());
}

#[tokio::test]
async fn test_scopes_are_isolated() {
    let backups = TempDir::new().unwrap();
    for i in 1..=3u64 {
        write_backup(backups.path(), &format!("backup/u1/b{}.json", i), i);
        write_backup(backups.path(), &format!("backup/u2/b{}.json", i), i);
    }
    write_backup(backups.path(), "backup/u2/b4.json", 4);

    let store_toml = format!(
        "[store]\nbackend = \"local\"\nroot_path = \"{}\"\nmax_count = 3\n",
        backups.path().display()
    );
    let config_dir = TestConfigDir::new("").with_store("user-backups", &store_toml);
    let manager = ConfigManager::new(config_dir.path_string()).await.unwrap();
    let service = RetentionService::from_config(&manager.get_current_config()).unwrap();

    service
        .handle_finalize(&FinalizeEvent::new("user-backups", "backup/u2/b4.json"))
        .await
        .unwrap();

    assert!(backups.path().join("backup/u1/b1.json").exists());
    assert!(!backups.path().join("backup/u2/b1.json").exists());
}
