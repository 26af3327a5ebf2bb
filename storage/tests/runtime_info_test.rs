//! Integration tests for [`storage::RuntimeInfoStore`].
//!
//! Covers loading a missing file, registration, daily post recording, concurrent updates and
//! parse failures, using files in a temp directory.

use std::sync::Arc;
use std::time::Duration;

use storage::{RuntimeInfo, RuntimeInfoStore, StorageError};
use tempfile::TempDir;

fn create_store(dir: &TempDir) -> RuntimeInfoStore {
    RuntimeInfoStore::new(
        dir.path().join("runtime-info.json"),
        dir.path().join("runtime-info.lock"),
    )
}

/// **Test: A missing file loads as the default runtime info.**
#[tokio::test]
async fn test_load_missing_file_returns_default() {
    let dir = tempfile::tempdir().unwrap();
    let store = create_store(&dir);

    let info = store.load().await.unwrap();

    assert_eq!(info, RuntimeInfo::default());
    assert_eq!(store.primary_chat().await.unwrap(), None);
}

/// **Test: register_chat persists once per chat and keeps order.**
///
/// **Setup:** Empty temp dir.
/// **Action:** Register -1, -2, then -1 again.
/// **Expected:** true, true, false; file lists [-1, -2]; lock file removed.
#[tokio::test]
async fn test_register_chat_persists() {
    let dir = tempfile::tempdir().unwrap();
    let store = create_store(&dir);

    assert!(store.register_chat(-1).await.unwrap());
    assert!(store.register_chat(-2).await.unwrap());
    assert!(!store.register_chat(-1).await.unwrap());

    let raw = std::fs::read_to_string(dir.path().join("runtime-info.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["chat_id"], serde_json::json!([-1, -2]));
    assert_eq!(store.primary_chat().await.unwrap(), Some(-1));
    assert!(!dir.path().join("runtime-info.lock").exists());
}

/// **Test: record_daily_post stores the id and resets wa_count, keeping chats.**
#[tokio::test]
async fn test_record_daily_post() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("runtime-info.json"),
        r#"{"chat_id":[-5],"last_msg_id":1,"wa_count":4}"#,
    )
    .unwrap();
    let store = create_store(&dir);

    store.record_daily_post(42).await.unwrap();

    let info = store.load().await.unwrap();
    assert_eq!(info.chat_id, vec![-5]);
    assert_eq!(info.last_msg_id, Some(42));
    assert_eq!(info.wa_count, 0);
}

/// **Test: Concurrent updates do not lose writes.**
///
/// **Setup:** 10 tasks registering distinct chats through clones of one store.
/// **Action:** Await all tasks.
/// **Expected:** All 10 chats present.
#[tokio::test]
async fn test_concurrent_updates_are_serialized() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(create_store(&dir));

    let mut tasks = Vec::new();
    for chat in 0..10 {
        let store = store.clone();
        tasks.push(tokio::spawn(async move { store.register_chat(chat).await }));
    }
    for task in tasks {
        assert!(task.await.unwrap().unwrap());
    }

    let mut chats = store.load().await.unwrap().chat_id;
    chats.sort();
    assert_eq!(chats, (0..10).collect::<Vec<i64>>());
}

/// **Test: A held lock makes update time out.**
#[tokio::test]
async fn test_update_times_out_when_locked() {
    let dir = tempfile::tempdir().unwrap();
    let store = create_store(&dir).with_lock_timeout(Duration::from_millis(100));
    let _held = storage::FileLock::acquire(dir.path().join("runtime-info.lock"), Duration::from_secs(1))
        .await
        .unwrap();

    let result = store.register_chat(-1).await;

    assert!(matches!(result, Err(StorageError::Lock(_))));
}

/// **Test: A corrupt file is reported, not replaced.**
#[tokio::test]
async fn test_load_corrupt_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("runtime-info.json"), "not json").unwrap();
    let store = create_store(&dir);

    assert!(matches!(store.load().await, Err(StorageError::Serialization(_))));
    assert!(store.register_chat(-1).await.is_err());
}
