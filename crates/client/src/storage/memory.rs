//! In-memory key-value store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyValueStore, StorageError, validate_key};

/// A process-local store backed by a `HashMap`.
///
/// Nothing outlives the process. Keys are validated the same way as in
/// [`super::FileStore`] so behaviour matches across backends.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.entries
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("favorites").await.unwrap().is_none());

        store.set("favorites", "[]").await.unwrap();
        assert_eq!(store.get("favorites").await.unwrap().as_deref(), Some("[]"));

        store.remove("favorites").await.unwrap();
        assert!(store.get("favorites").await.unwrap().is_none());

        // Removing again is fine
        store.remove("favorites").await.unwrap();
    }

    #[tokio::test]
    async fn test_keys_sorted() {
        let store = MemoryStore::new();
        store.set("orders", "[]").await.unwrap();
        store.set("cart", "[]").await.unwrap();
        assert_eq!(store.keys().await.unwrap(), vec!["cart", "orders"]);
    }

    #[tokio::test]
    async fn test_rejects_invalid_key() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.set("a/b", "x").await,
            Err(StorageError::InvalidKey(_))
        ));
    }
}
