//! Bounded, deduplicated recent-query list persisted through a [`KvStore`].
//!
//! The list is most-recent first and deduplicated case-insensitively; when
//! a query is re-entered with different casing, the newest literal form
//! replaces the old one at the front. Every mutation is written back to
//! the store. Storage failures are logged and swallowed so the history
//! keeps working in memory for the rest of the session.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use crate::store::KvStore;

/// Key under which the history array is stored.
pub const DEFAULT_HISTORY_KEY: &str = "shipmate.search.history";
/// Maximum number of retained queries.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

pub struct QueryHistory {
    entries: Vec<String>,
    capacity: usize,
    key: String,
    store: Arc<dyn KvStore>,
}

impl QueryHistory {
    /// Load the persisted history, falling back to an empty list when the
    /// store is unavailable or holds something other than a string array.
    pub fn load(store: Arc<dyn KvStore>, key: impl Into<String>, capacity: usize) -> Self {
        let key = key.into();
        let capacity = capacity.max(1);

        let stored: Vec<String> = match store.get(&key) {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(list) => list,
                Err(e) => {
                    warn!(key = %key, error = %e, "ignoring malformed search history");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %key, error = %e, "search history unavailable; starting empty");
                Vec::new()
            }
        };

        let mut seen = HashSet::new();
        let entries = stored
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty() && seen.insert(q.to_lowercase()))
            .take(capacity)
            .collect();

        Self {
            entries,
            capacity,
            key,
            store,
        }
    }

    /// Most-recent-first snapshot.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn most_recent(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a query. Blank input is ignored.
    ///
    /// Returns `true` if the list changed. Re-adding the exact query that is
    /// already most recent changes nothing and skips the store write.
    pub fn add(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() || self.most_recent() == Some(query) {
            return false;
        }

        let folded = query.to_lowercase();
        self.entries.retain(|e| e.to_lowercase() != folded);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(self.capacity);
        self.persist();
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.store.remove(&self.key) {
            warn!(key = %self.key, error = %e, "failed to clear persisted search history");
        }
    }

    fn persist(&self) {
        let value = serde_json::Value::from(self.entries.clone());
        if let Err(e) = self.store.set(&self.key, &value) {
            warn!(
                key = %self.key,
                error = %e,
                "failed to persist search history; keeping it in memory"
            );
        }
    }
}

impl std::fmt::Debug for QueryHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryHistory")
            .field("entries", &self.entries)
            .field("capacity", &self.capacity)
            .field("key", &self.key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryKvStore;
    use crate::store::StorageError;
    use serde_json::json;

    struct BrokenStore;

    impl KvStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<serde_json::Value>, StorageError> {
            Err(StorageError::Unavailable("private mode".to_string()))
        }
        fn set(&self, _key: &str, _value: &serde_json::Value) -> Result<(), StorageError> {
            Err(StorageError::QuotaExceeded)
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("private mode".to_string()))
        }
    }

    fn fresh() -> (Arc<InMemoryKvStore>, QueryHistory) {
        let store = Arc::new(InMemoryKvStore::new());
        let history = QueryHistory::load(store.clone(), DEFAULT_HISTORY_KEY, 10);
        (store, history)
    }

    #[test]
    fn test_case_insensitive_dedup_keeps_latest_form() {
        let (_, mut h) = fresh();
        h.add("Muster");
        h.add("muster");
        assert_eq!(h.entries(), &["muster".to_string()]);
    }

    #[test]
    fn test_reinsert_moves_to_front() {
        let (_, mut h) = fresh();
        h.add("port");
        h.add("spa");
        h.add("PORT");
        assert_eq!(h.entries(), &["PORT".to_string(), "spa".to_string()]);
    }

    #[test]
    fn test_repeat_of_most_recent_is_a_no_op() {
        let (store, mut h) = fresh();
        assert!(h.add("spa"));
        store.remove(DEFAULT_HISTORY_KEY).unwrap();

        assert!(!h.add(" spa "));
        assert!(store.get(DEFAULT_HISTORY_KEY).unwrap().is_none());

        // Different case is a change: the newest spelling wins.
        assert!(h.add("SPA"));
        assert_eq!(store.get(DEFAULT_HISTORY_KEY).unwrap(), Some(json!(["SPA"])));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let (_, mut h) = fresh();
        for i in 0..11 {
            h.add(&format!("query {}", i));
        }
        assert_eq!(h.len(), 10);
        assert_eq!(h.most_recent(), Some("query 10"));
        assert!(!h.entries().iter().any(|e| e == "query 0"));
        assert_eq!(h.entries()[9], "query 1");
    }

    #[test]
    fn test_blank_ignored_and_input_trimmed() {
        let (store, mut h) = fresh();
        assert!(!h.add("   "));
        assert!(store.is_empty());
        h.add("  tender  ");
        assert_eq!(h.entries(), &["tender".to_string()]);
    }

    #[test]
    fn test_every_mutation_persisted() {
        let (store, mut h) = fresh();
        h.add("wifi");
        h.add("dining");
        assert_eq!(
            store.get(DEFAULT_HISTORY_KEY).unwrap(),
            Some(json!(["dining", "wifi"]))
        );
        h.clear();
        assert!(h.is_empty());
        assert!(store.get(DEFAULT_HISTORY_KEY).unwrap().is_none());
    }

    #[test]
    fn test_load_sanitizes_stored_list() {
        let store = Arc::new(InMemoryKvStore::new());
        store
            .set(DEFAULT_HISTORY_KEY, &json!(["Spa", " spa ", "", "pool", "deck"]))
            .unwrap();
        let h = QueryHistory::load(store, DEFAULT_HISTORY_KEY, 2);
        assert_eq!(h.entries(), &["Spa".to_string(), "pool".to_string()]);
    }

    #[test]
    fn test_load_ignores_malformed_value() {
        let store = Arc::new(InMemoryKvStore::new());
        store.set(DEFAULT_HISTORY_KEY, &json!({"not": "a list"})).unwrap();
        let h = QueryHistory::load(store, DEFAULT_HISTORY_KEY, 10);
        assert!(h.is_empty());
    }

    #[test]
    fn test_broken_store_degrades_to_memory() {
        let mut h = QueryHistory::load(Arc::new(BrokenStore), DEFAULT_HISTORY_KEY, 10);
        assert!(h.is_empty());
        assert!(h.add("excursions"));
        assert_eq!(h.entries(), &["excursions".to_string()]);
        h.clear();
        assert!(h.is_empty());
    }
}
