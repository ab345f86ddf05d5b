// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Key-value storage for sync tokens and Google connection state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::SyncError;

/// Keys written by the sync engine.
pub mod keys {
    /// Checkpoint of the `CalDAV` collection.
    pub const RADICALE_SYNC_TOKEN: &str = "radicaleSyncToken";
    /// Checkpoint of the Google calendar.
    pub const GOOGLE_SYNC_TOKEN: &str = "googleSyncToken";
    /// Google credential, a JSON object with at least `access_token`.
    pub const GOOGLE_OAUTH_TOKEN: &str = "googleOAuthToken";
    /// Identifier of the target Google calendar.
    pub const GOOGLE_CALENDAR_ID: &str = "googleCalendarId";

    /// Every key, in the order they are reported.
    pub const ALL: [&str; 4] = [
        GOOGLE_OAUTH_TOKEN,
        GOOGLE_CALENDAR_ID,
        RADICALE_SYNC_TOKEN,
        GOOGLE_SYNC_TOKEN,
    ];
}

/// Opaque string store holding the only state kept between passes.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Reads the value of `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, SyncError>;

    /// Writes `value` under `key`.
    async fn put(&self, key: &str, value: &str) -> Result<(), SyncError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), SyncError>;
}

/// Removes every key written by the sync engine.
///
/// # Errors
///
/// Returns an error if the store fails.
pub async fn reset(store: &dyn CheckpointStore) -> Result<(), SyncError> {
    for key in keys::ALL {
        store.delete(key).await?;
    }
    tracing::info!("cleared connection and checkpoints");
    Ok(())
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given entries.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }
}

#[async_trait]
impl CheckpointStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SyncError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), SyncError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SyncError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Store persisted as a JSON object in a single file.
///
/// Every write replaces the file atomically by writing a temporary sibling
/// and renaming it over the original.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Name of the state file inside the state directory.
    pub const FILE_NAME: &str = "state.json";

    /// Creates a store backed by the file at `path`. The file is created on
    /// first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Creates a store backed by `state.json` in `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, SyncError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                SyncError::Checkpoint(format!(
                    "Failed to parse state file {}: {e}",
                    self.path.display()
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), SyncError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| SyncError::Checkpoint(e.to_string()))?;
        let temp = self.path.with_extension("json.tmp");
        fs::write(&temp, content).await?;
        fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl CheckpointStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SyncError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), SyncError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries).await
    }

    async fn delete(&self, key: &str) -> Result<(), SyncError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }
}
