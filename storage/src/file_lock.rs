//! Exclusive lock file shared between processes.
//!
//! The polling bot and the one-shot CLI commands both rewrite `runtime-info.json`; holding a
//! [`FileLock`] around load-modify-save keeps their updates from interleaving.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::StorageError;

const RETRY_INTERVAL: Duration = Duration::from_millis(50);
const STALE_AFTER: Duration = Duration::from_secs(60);

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(0);

/// Guard for an acquired lock file; the file is removed on drop.
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
    token: String,
}

/// What a waiter saw in a lock file it judged stale.
#[derive(Debug, PartialEq)]
struct Snapshot {
    contents: String,
    modified: SystemTime,
}

impl FileLock {
    /// Creates `path` exclusively, retrying until `timeout`.
    ///
    /// A lock file older than 60 seconds belongs to a process that died while holding it and is
    /// removed, but only if it still holds what was read when it was judged stale.
    pub async fn acquire(path: impl AsRef<Path>, timeout: Duration) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let deadline = tokio::time::Instant::now() + timeout;
        let token = new_token();

        loop {
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    // Owner pid leads the token, which helps when inspecting a stuck lock by hand.
                    file.write_all(token.as_bytes())
                        .await
                        .map_err(|e| StorageError::io(&path, e))?;
                    file.flush().await.map_err(|e| StorageError::io(&path, e))?;
                    debug!(path = %path.display(), "Lock acquired");
                    return Ok(Self { path, token });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if let Some(seen) = stale_snapshot(&path).await {
                        if remove_if_unchanged(&path, &seen).await {
                            warn!(path = %path.display(), holder = %seen.contents.trim(), "Removed stale lock file");
                            continue;
                        }
                    }
                }
                Err(e) => return Err(StorageError::io(&path, e)),
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(StorageError::Lock(format!(
                    "Timed out after {:?} waiting for {}",
                    timeout,
                    path.display()
                )));
            }
            tokio::time::sleep(RETRY_INTERVAL).await;
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // A lock taken over as stale belongs to someone else now.
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents != self.token => {
                warn!(path = %self.path.display(), "Lock file was taken over; leaving it");
                return;
            }
            _ => {}
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to remove lock file");
        }
    }
}

/// `<pid> <nanos> <counter>`, unique per acquire attempt.
fn new_token() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let counter = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
    format!("{} {} {}\n", std::process::id(), nanos, counter)
}

async fn snapshot(path: &Path) -> Option<Snapshot> {
    let modified = tokio::fs::metadata(path).await.ok()?.modified().ok()?;
    let contents = tokio::fs::read_to_string(path).await.ok()?;
    Some(Snapshot { contents, modified })
}

async fn stale_snapshot(path: &Path) -> Option<Snapshot> {
    let seen = snapshot(path).await?;
    let age = SystemTime::now().duration_since(seen.modified).ok()?;
    (age > STALE_AFTER).then_some(seen)
}

/// Removes the lock only when it still matches `seen`; a waiter that already replaced it keeps it.
async fn remove_if_unchanged(path: &Path, seen: &Snapshot) -> bool {
    if snapshot(path).await.as_ref() != Some(seen) {
        return false;
    }
    tokio::fs::remove_file(path).await.is_ok()
}
