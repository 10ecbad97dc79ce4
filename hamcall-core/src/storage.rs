///! Local key-value persistence
///!
///! A small JSON-object store on disk, standing in for the browser's
///! `storage.local`. Values are arbitrary JSON keyed by name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::StorageError;

pub const KEY_DARK_MODE: &str = "darkMode";
pub const KEY_SEARCH_HISTORY: &str = "searchHistory";

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` when the key was never written.
    async fn get(&self, key: &str) -> StorageResult<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> StorageResult<()>;
}

/// Store backed by a single pretty-printed JSON file
pub struct JsonFileStore {
    path: PathBuf,
    // serializes read-modify-write cycles on the file
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    async fn read_all(&self) -> StorageResult<Map<String, Value>> {
        if !self.path.exists() {
            debug!("Storage file does not exist: {:?}", self.path);
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        let map: Map<String, Value> = serde_json::from_str(&content)?;
        Ok(map)
    }

    async fn write_all(&self, map: &Map<String, Value>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| self.io_error(e))?;
                info!("Created storage directory: {:?}", parent);
            }
        }

        let content = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        let _guard = self.lock.lock().await;
        let map = self.read_all().await?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        let mut map = match self.read_all().await {
            Ok(map) => map,
            Err(StorageError::Malformed(e)) => {
                warn!("Storage file {:?} is malformed, starting over: {}", self.path, e);
                Map::new()
            }
            Err(e) => return Err(e),
        };
        map.insert(key.to_string(), value);
        self.write_all(&map).await?;
        debug!("Stored key '{}' in {:?}", key, self.path);
        Ok(())
    }
}

/// In-memory store, for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> StorageResult<()> {
        self.values.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallKind {
    /// Nothing stored yet
    Install,
    /// Existing data found; missing keys were backfilled
    Update,
}

/// Seed the store on first run and backfill missing keys afterwards.
///
/// First install turns dark mode on. An existing store without the flag gets
/// `false`, matching installs that predate the theme toggle.
pub async fn initialize_defaults(store: &dyn KeyValueStore) -> StorageResult<InstallKind> {
    let dark_mode = store.get(KEY_DARK_MODE).await?;
    let history = store.get(KEY_SEARCH_HISTORY).await?;

    if dark_mode.is_none() && history.is_none() {
        store.set(KEY_DARK_MODE, Value::Bool(true)).await?;
        store.set(KEY_SEARCH_HISTORY, Value::Array(Vec::new())).await?;
        info!("Initialized storage defaults (dark mode on)");
        return Ok(InstallKind::Install);
    }

    if dark_mode.is_none() {
        store.set(KEY_DARK_MODE, Value::Bool(false)).await?;
    }
    if history.is_none() {
        store.set(KEY_SEARCH_HISTORY, Value::Array(Vec::new())).await?;
    }
    Ok(InstallKind::Update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_roundtrip_and_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("nested").join("storage.json"));

        assert_eq!(store.get(KEY_DARK_MODE).await.unwrap(), None);

        store.set(KEY_DARK_MODE, json!(false)).await.unwrap();
        store.set(KEY_SEARCH_HISTORY, json!([])).await.unwrap();

        assert_eq!(store.get(KEY_DARK_MODE).await.unwrap(), Some(json!(false)));
        assert_eq!(store.get(KEY_SEARCH_HISTORY).await.unwrap(), Some(json!([])));
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_file_store_malformed_read_is_error_and_write_recovers() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::new(&path);

        assert!(matches!(
            store.get(KEY_DARK_MODE).await,
            Err(StorageError::Malformed(_))
        ));

        store.set(KEY_DARK_MODE, json!(true)).await.unwrap();
        assert_eq!(store.get(KEY_DARK_MODE).await.unwrap(), Some(json!(true)));
    }

    #[tokio::test]
    async fn test_first_install_defaults() {
        let store = MemoryStore::new();

        let kind = initialize_defaults(&store).await.unwrap();

        assert_eq!(kind, InstallKind::Install);
        assert_eq!(store.get(KEY_DARK_MODE).await.unwrap(), Some(json!(true)));
        assert_eq!(store.get(KEY_SEARCH_HISTORY).await.unwrap(), Some(json!([])));
    }

    #[tokio::test]
    async fn test_update_backfills_without_overwriting() {
        let store = MemoryStore::new();
        let history = json!([{"callsign": "W1AW", "operator": "", "timestamp": "2025-01-01T00:00:00Z"}]);
        store.set(KEY_SEARCH_HISTORY, history.clone()).await.unwrap();

        let kind = initialize_defaults(&store).await.unwrap();

        assert_eq!(kind, InstallKind::Update);
        assert_eq!(store.get(KEY_DARK_MODE).await.unwrap(), Some(json!(false)));
        assert_eq!(store.get(KEY_SEARCH_HISTORY).await.unwrap(), Some(history));
    }
}
