//! Key-value persistence boundary.
//!
//! The [`KvStore`] trait is the only way the core touches durable
//! storage. Hosts plug in whatever they have (browser storage, a JSON file,
//! an in-memory map). Values are JSON so any backend can hold them.
//!
//! Callers in this crate treat every error as [`StorageError`] and degrade
//! to in-memory behavior; nothing here is allowed to take down a query.

pub mod memory;

use thiserror::Error;

/// Failure reported by a [`KvStore`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error("stored value is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Abstract key-value backend holding JSON values.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get`](KvStore::get) | Read a value, `None` if absent |
/// | [`set`](KvStore::set) | Insert or replace a value |
/// | [`remove`](KvStore::remove) | Delete a value (absent keys are fine) |
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError>;

    fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
