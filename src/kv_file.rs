//! JSON-file [`KvStore`] backend.
//!
//! All keys live in one JSON object on disk. Writes go to a sibling
//! temporary file that is then renamed over the original, so a crash
//! never leaves a half-written store behind. A missing file reads as an
//! empty store.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use shipmate_core::store::{KvStore, StorageError};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    read_only: bool,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_only: false,
        }
    }

    /// Reads work; every write fails with [`StorageError::Unavailable`].
    pub fn read_only(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_only: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, StorageError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => Ok(map),
            _ => Err(StorageError::Unavailable(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    fn save(&self, map: Map<String, Value>) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Unavailable(format!(
                "{} is read-only",
                self.path.display()
            )));
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_string_pretty(&Value::Object(map))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value.clone());
        self.save(map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.load()?;
        if map.remove(key).is_some() {
            self.save(map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip_and_other_keys_preserved() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path().join("nested/store.json"));
        assert!(store.get("history").unwrap().is_none());

        store.set("history", &json!(["spa"])).unwrap();
        store.set("theme", &json!("dark")).unwrap();
        assert_eq!(store.get("history").unwrap(), Some(json!(["spa"])));

        store.remove("history").unwrap();
        assert!(store.get("history").unwrap().is_none());
        assert_eq!(store.get("theme").unwrap(), Some(json!("dark")));
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::read_only(tmp.path().join("store.json"));
        assert!(matches!(
            store.set("k", &json!(1)),
            Err(StorageError::Unavailable(_))
        ));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_reports_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.get("k"),
            Err(StorageError::Serialization(_))
        ));
    }
}
