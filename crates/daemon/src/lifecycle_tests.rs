// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use av_core::AgentRecord;

fn test_config(dir: &tempfile::TempDir) -> Config {
    Config::for_state_dir(dir.path().join("state"))
}

#[test]
fn paths_live_under_state_dir() {
    let config = Config::for_state_dir(PathBuf::from("/var/av"));
    assert_eq!(config.socket_path, PathBuf::from("/var/av/daemon.sock"));
    assert_eq!(config.lock_path, PathBuf::from("/var/av/daemon.pid"));
    assert_eq!(config.log_path, PathBuf::from("/var/av/daemon.log"));
    assert_eq!(config.registry_path, PathBuf::from("/var/av/registry.json"));
    assert_eq!(config.config_path, PathBuf::from("/var/av/config.toml"));
}

#[tokio::test]
async fn startup_binds_socket_and_records_pid() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let result = startup(&config).await.unwrap();

    assert!(config.socket_path.exists());
    let pid = std::fs::read_to_string(&config.lock_path).unwrap();
    assert_eq!(pid.trim(), std::process::id().to_string());
    assert!(result.daemon.runtime.registry().lock().is_empty());
}

#[tokio::test]
async fn second_startup_fails_on_lock_and_leaves_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let _first = startup(&config).await.unwrap();

    let second = startup(&config).await;

    assert!(matches!(second, Err(LifecycleError::LockFailed(_))));
    assert!(config.socket_path.exists());
    assert!(config.lock_path.exists());
}

#[tokio::test]
async fn startup_loads_existing_registry() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    std::fs::create_dir_all(&config.state_dir).unwrap();
    let records = serde_json::json!({
        "agent-fix-login": AgentRecord::spawned("fix-login", "/work", "fix login", 1_000),
    });
    std::fs::write(&config.registry_path, records.to_string()).unwrap();

    let result = startup(&config).await.unwrap();

    let record = result.daemon.runtime.get_record("agent-fix-login").unwrap();
    assert_eq!(record.label, "fix-login");
}

#[tokio::test]
async fn invalid_config_aborts_startup_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    std::fs::create_dir_all(&config.state_dir).unwrap();
    std::fs::write(&config.config_path, "[patterns]\nbusy = [\"(unclosed\"]\n").unwrap();

    let result = startup(&config).await;

    assert!(matches!(result, Err(LifecycleError::Config(_))));
    assert!(!config.socket_path.exists());
    assert!(!config.lock_path.exists());
}

#[tokio::test]
async fn shutdown_removes_socket_and_pid_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let mut result = startup(&config).await.unwrap();

    result.daemon.shutdown().unwrap();

    assert!(!config.socket_path.exists());
    assert!(!config.lock_path.exists());
    assert!(config.registry_path.exists());
}
