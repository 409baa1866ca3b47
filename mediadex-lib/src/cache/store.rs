//! Key-value store abstraction for the durable response cache

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::StoreError;

/// Trait for key-value storage backends.
///
/// The durable response cache reads and writes JSON text through this
/// interface, so it can run against local-storage-style backends, SQLite,
/// or an in-memory fake in tests.
///
/// # Example
///
/// ```
/// use mediadex_lib::cache::{KeyValueStore, MemoryStore};
///
/// # async fn demo() -> Result<(), mediadex_lib::error::StoreError> {
/// let store = MemoryStore::new();
/// store.set("greeting", "hello").await?;
/// assert_eq!(store.get("greeting").await?.as_deref(), Some("hello"));
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes the value stored under `key`.
    ///
    /// Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Lists every key currently present in the store.
    async fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// An in-memory store backed by a concurrent hash map.
///
/// The default backend, and the fake used throughout the tests. Data is
/// lost when the process exits; use [`SqliteStore`](super::SqliteStore) for
/// persistence across restarts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .entries
            .iter()
            .map(|entry| entry.key().clone())
            .collect())
    }
}
