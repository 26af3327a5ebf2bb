//! Runtime info store: `runtime-info.json` guarded by a lock file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::StorageError;
use crate::file_lock::FileLock;
use crate::models::RuntimeInfo;

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);

/// Loads and updates [`RuntimeInfo`] on disk.
#[derive(Debug, Clone)]
pub struct RuntimeInfoStore {
    path: PathBuf,
    lock_path: PathBuf,
    lock_timeout: Duration,
}

impl RuntimeInfoStore {
    pub fn new(path: impl Into<PathBuf>, lock_path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_path: lock_path.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file without taking the lock. A missing file yields the default.
    pub async fn load(&self) -> Result<RuntimeInfo, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                StorageError::Serialization(format!("{}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "Runtime info not found, using defaults");
                Ok(RuntimeInfo::default())
            }
            Err(e) => Err(StorageError::io(&self.path, e)),
        }
    }

    /// Locks, loads, applies `f`, saves, unlocks. Returns what `f` returned.
    pub async fn update<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut RuntimeInfo) -> T,
    {
        let _lock = FileLock::acquire(&self.lock_path, self.lock_timeout).await?;
        let mut info = self.load().await?;
        let out = f(&mut info);
        self.save(&info).await?;
        Ok(out)
    }

    /// Adds a chat the bot was added to. Returns false if it was already registered.
    pub async fn register_chat(&self, chat_id: i64) -> Result<bool, StorageError> {
        let added = self.update(|info| info.register_chat(chat_id)).await?;
        if added {
            info!(chat_id, "Chat registered");
        } else {
            debug!(chat_id, "Chat already registered");
        }
        Ok(added)
    }

    /// Stores the id of the daily-best post and resets its wa counter.
    pub async fn record_daily_post(&self, message_id: i64) -> Result<(), StorageError> {
        self.update(|info| info.record_daily_post(message_id)).await
    }

    /// First registered chat, if any.
    pub async fn primary_chat(&self) -> Result<Option<i64>, StorageError> {
        Ok(self.load().await?.primary_chat())
    }

    /// Writes a sibling temp file then renames it over the target.
    async fn save(&self, info: &RuntimeInfo) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(info)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StorageError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        debug!(path = %self.path.display(), "Runtime info saved");
        Ok(())
    }
}
