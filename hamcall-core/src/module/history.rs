///! Recent-lookup history
///!
///! Owns the in-memory list and its persisted copy under `searchHistory`.
///! Observers only hear about a change after it has been written.

use std::sync::Arc;

use hamcall_common::HistoryEntry;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::presenter::HistoryObserver;
use crate::storage::{KEY_SEARCH_HISTORY, KeyValueStore};

/// Maximum number of history items kept
pub const MAX_HISTORY_ITEMS: usize = 10;

pub struct HistoryStore {
    storage: Arc<dyn KeyValueStore>,
    entries: RwLock<Vec<HistoryEntry>>,
    observers: Vec<Arc<dyn HistoryObserver>>,
}

impl HistoryStore {
    /// Read the persisted list once. Missing or malformed data yields an
    /// empty history; observers get the loaded list either way.
    pub async fn load(storage: Arc<dyn KeyValueStore>, observers: Vec<Arc<dyn HistoryObserver>>) -> Self {
        let entries = match storage.get(KEY_SEARCH_HISTORY).await {
            Ok(Some(value)) => decode_entries(value),
            Ok(None) => {
                debug!("No history found in storage");
                Vec::new()
            }
            Err(e) => {
                error!("Failed to load history, starting empty: {}", e);
                Vec::new()
            }
        };
        info!("Loaded {} history items", entries.len());

        let store = Self {
            storage,
            entries: RwLock::new(entries),
            observers,
        };
        store.notify(&store.current().await);
        store
    }

    /// Move `callsign` to the front of the history and persist.
    pub async fn record(&self, callsign: &str, operator: &str) {
        self.commit(HistoryEntry::new(callsign, operator)).await;
    }

    async fn commit(&self, entry: HistoryEntry) {
        if entry.callsign.is_empty() {
            return;
        }

        let mut entries = self.entries.write().await;
        let mut updated = entries.clone();
        push_front(&mut updated, entry);

        // lock held until observers ran, so writes and notifications stay ordered
        if self.persist(&updated).await {
            debug!("Added {} to history", updated[0].callsign);
            *entries = updated;
            self.notify(&entries);
        }
    }

    /// Empty the history. Memory is left untouched if the write fails.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        if self.persist(&[]).await {
            info!("History cleared");
            entries.clear();
            self.notify(&entries);
        }
    }

    /// Most-recent-first snapshot.
    pub async fn current(&self) -> Vec<HistoryEntry> {
        self.entries.read().await.clone()
    }

    async fn persist(&self, entries: &[HistoryEntry]) -> bool {
        let value = match serde_json::to_value(entries) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to serialize history: {}", e);
                return false;
            }
        };
        match self.storage.set(KEY_SEARCH_HISTORY, value).await {
            Ok(()) => {
                debug!("Saved {} history items", entries.len());
                true
            }
            Err(e) => {
                error!("Failed to save history: {}", e);
                false
            }
        }
    }

    fn notify(&self, entries: &[HistoryEntry]) {
        for observer in &self.observers {
            observer.on_history_changed(entries);
        }
    }
}

/// Remove any entry with the same call sign, insert at the head, truncate.
fn push_front(entries: &mut Vec<HistoryEntry>, entry: HistoryEntry) {
    entries.retain(|e| e.callsign != entry.callsign);
    entries.insert(0, entry);
    entries.truncate(MAX_HISTORY_ITEMS);
}

fn decode_entries(value: Value) -> Vec<HistoryEntry> {
    match serde_json::from_value::<Vec<HistoryEntry>>(value) {
        Ok(mut entries) => {
            entries.truncate(MAX_HISTORY_ITEMS);
            entries
        }
        Err(e) => {
            warn!("Stored history is malformed, starting empty: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::{JsonFileStore, MemoryStore, StorageResult};
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::sync::atomic::{AtomicBool, Ordering};
    use serde_json::json;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingObserver {
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl HistoryObserver for RecordingObserver {
        fn on_history_changed(&self, entries: &[HistoryEntry]) {
            self.calls
                .lock()
                .unwrap()
                .push(entries.iter().map(|e| e.callsign.clone()).collect());
        }
    }

    /// Reads from memory; writes fail while `broken` is set.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        broken: AtomicBool,
    }

    #[async_trait]
    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> StorageResult<Option<Value>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: Value) -> StorageResult<()> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(StorageError::Io {
                    path: "storage.json".to_string(),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.inner.set(key, value).await
        }
    }

    async fn store_with_observer() -> (HistoryStore, Arc<RecordingObserver>, Arc<MemoryStore>) {
        let storage = Arc::new(MemoryStore::new());
        let observer = Arc::new(RecordingObserver::default());
        let store = HistoryStore::load(storage.clone(), vec![observer.clone()]).await;
        (store, observer, storage)
    }

    fn callsigns(entries: &[HistoryEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.callsign.as_str()).collect()
    }

    #[tokio::test]
    async fn test_load_notifies_with_empty_list() {
        let (store, observer, _) = store_with_observer().await;
        assert!(store.current().await.is_empty());
        assert_eq!(*observer.calls.lock().unwrap(), vec![Vec::<String>::new()]);
    }

    #[tokio::test]
    async fn test_record_dedups_and_moves_to_front() {
        let (store, _, _) = store_with_observer().await;
        let t0 = Utc::now() - Duration::minutes(5);

        store.commit(HistoryEntry { timestamp: t0, ..HistoryEntry::new("W1AW", "HIRAM") }).await;
        store.commit(HistoryEntry { timestamp: t0, ..HistoryEntry::new("K1ABC", "JOHN") }).await;
        store.record("W1AW", "HIRAM P. MAXIM").await;

        let entries = store.current().await;
        assert_eq!(callsigns(&entries), vec!["W1AW", "K1ABC"]);
        assert_eq!(entries[0].operator, "HIRAM P. MAXIM");
        assert!(entries[0].timestamp > t0);
    }

    #[tokio::test]
    async fn test_record_bounds_to_ten() {
        let (store, _, _) = store_with_observer().await;

        for i in 0..11 {
            store.record(&format!("K{}ABC", i), "").await;
        }

        let entries = store.current().await;
        assert_eq!(entries.len(), MAX_HISTORY_ITEMS);
        assert_eq!(entries[0].callsign, "K10ABC");
        assert!(!entries.iter().any(|e| e.callsign == "K0ABC"));
    }

    #[tokio::test]
    async fn test_empty_callsign_is_ignored() {
        let (store, observer, _) = store_with_observer().await;
        store.record("", "NOBODY").await;
        assert!(store.current().await.is_empty());
        assert_eq!(observer.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_record_persists_before_notifying() {
        let (store, observer, storage) = store_with_observer().await;
        store.record("W1AW", "HIRAM").await;

        let stored = storage.get(KEY_SEARCH_HISTORY).await.unwrap().unwrap();
        assert_eq!(stored[0]["callsign"], json!("W1AW"));
        assert_eq!(stored[0]["operator"], json!("HIRAM"));
        assert_eq!(observer.calls.lock().unwrap().last().unwrap(), &vec!["W1AW".to_string()]);
    }

    #[tokio::test]
    async fn test_clear() {
        let (store, observer, storage) = store_with_observer().await;
        store.record("W1AW", "").await;
        store.clear().await;

        assert!(store.current().await.is_empty());
        assert_eq!(storage.get(KEY_SEARCH_HISTORY).await.unwrap(), Some(json!([])));
        assert!(observer.calls.lock().unwrap().last().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_history_loads_empty() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(KEY_SEARCH_HISTORY, json!({"oops": true})).await.unwrap();

        let store = HistoryStore::load(storage, Vec::new()).await;
        assert!(store.current().await.is_empty());
    }

    #[tokio::test]
    async fn test_history_survives_reload_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");

        let store = HistoryStore::load(Arc::new(JsonFileStore::new(&path)), Vec::new()).await;
        store.record("W1AW", "HIRAM").await;
        store.record("K1ABC", "JOHN").await;

        let reloaded = HistoryStore::load(Arc::new(JsonFileStore::new(&path)), Vec::new()).await;
        assert_eq!(callsigns(&reloaded.current().await), vec!["K1ABC", "W1AW"]);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_history_unchanged() {
        let storage = Arc::new(FlakyStore::default());
        let observer = Arc::new(RecordingObserver::default());
        let store = HistoryStore::load(storage.clone(), vec![observer.clone()]).await;
        store.record("K1ABC", "JOHN").await;

        storage.broken.store(true, Ordering::SeqCst);
        store.record("W1AW", "HIRAM").await;

        assert_eq!(callsigns(&store.current().await), vec!["K1ABC"]);
        assert_eq!(observer.calls.lock().unwrap().last().unwrap(), &vec!["K1ABC".to_string()]);

        store.clear().await;
        assert_eq!(callsigns(&store.current().await), vec!["K1ABC"]);

        // the rejected entry must not ride along with the next good write
        storage.broken.store(false, Ordering::SeqCst);
        store.record("N0CALL", "").await;
        let stored = storage.get(KEY_SEARCH_HISTORY).await.unwrap().unwrap();
        let stored: Vec<&str> = stored
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["callsign"].as_str().unwrap())
            .collect();
        assert_eq!(stored, vec!["N0CALL", "K1ABC"]);
    }
}
