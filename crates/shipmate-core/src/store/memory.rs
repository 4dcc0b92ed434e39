//! In-memory [`KvStore`] for tests, WASM hosts, and sessions without
//! durable storage.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{KvStore, StorageError};

/// `HashMap` behind a lock. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    values: RwLock<HashMap<String, serde_json::Value>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl KvStore for InMemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        self.values.write().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.write().remove(key);
        Ok(())
    }
}
