//! Device key-value storage.
//!
//! Everything the client persists lives in a flat string-to-string store,
//! one JSON blob per key. The [`keys`] module is the de facto schema.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local map, used in tests and when nothing
//!   should outlive the process
//! - [`FileStore`] - one `<key>.json` file per key in a data directory
//!
//! Repositories hold an `Arc<dyn KeyValueStore>` and go through the typed
//! helpers [`get_json`], [`set_json`] and [`load_or_default`].

mod file;
mod memory;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage keys used by the client.
pub mod keys {
    /// Language picked on the language selection screen.
    pub const SELECTED_LANGUAGE: &str = "selectedLanguage";

    /// Language the app is currently rendered in.
    pub const CURRENT_APP_LANGUAGE: &str = "currentAppLanguage";

    /// `"true"` once onboarding has been completed.
    pub const HAS_SEEN_ONBOARDING: &str = "hasSeenOnboarding";

    /// Profile image reference (URI or asset name).
    pub const USER_PROFILE_IMAGE: &str = "userProfileImage";

    /// Last resolved delivery location.
    pub const USER_LOCATION: &str = "userLocation";

    /// `"true"` once the user confirmed their location.
    pub const LOCATION_CONFIRMED: &str = "locationConfirmed";

    /// `"true"` once the location selection flow finished.
    pub const LOCATION_SELECTION_COMPLETED: &str = "locationSelectionCompleted";

    /// Saved delivery addresses.
    pub const USER_ADDRESSES: &str = "userAddresses";

    /// Order history.
    pub const ORDERS: &str = "orders";

    /// Favorite menu items.
    pub const FAVORITES: &str = "favorites";

    /// Persisted cart contents.
    pub const CART: &str = "cart";

    /// Every key the client writes.
    pub const ALL: &[&str] = &[
        SELECTED_LANGUAGE,
        CURRENT_APP_LANGUAGE,
        HAS_SEEN_ONBOARDING,
        USER_PROFILE_IMAGE,
        USER_LOCATION,
        LOCATION_CONFIRMED,
        LOCATION_SELECTION_COMPLETED,
        USER_ADDRESSES,
        ORDERS,
        FAVORITES,
        CART,
    ];
}

/// Errors from the key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be encoded or decoded.
    #[error("serialization error for key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Key contains characters the backend cannot store.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// An asynchronous string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Missing keys return `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// List all stored keys.
    async fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Validate a storage key.
///
/// Keys become file names in [`FileStore`], so only ASCII alphanumerics,
/// `_` and `-` are accepted.
///
/// # Errors
///
/// Returns `StorageError::InvalidKey` for empty keys or other characters.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(StorageError::InvalidKey(key.to_owned()));
    }
    Ok(())
}

/// Read and decode a JSON value.
///
/// # Errors
///
/// Returns an error if the read fails or the stored JSON does not decode as `T`.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Serialization {
            key: key.to_owned(),
            source,
        })
}

/// Encode and write a JSON value.
///
/// # Errors
///
/// Returns an error if encoding or the write fails.
pub async fn set_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialization {
        key: key.to_owned(),
        source,
    })?;
    store.set(key, &raw).await
}

/// Best-effort read: missing, unreadable or corrupt values yield `T::default()`.
///
/// Failures are logged, never returned.
pub async fn load_or_default<T: DeserializeOwned + Default>(
    store: &dyn KeyValueStore,
    key: &str,
) -> T {
    match get_json(store, key).await {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to load stored value, using default");
            T::default()
        }
    }
}

/// Read a boolean stored as `"true"`/`"false"`.
///
/// Anything other than `"true"` (including a missing key) reads as `false`.
///
/// # Errors
///
/// Returns an error if the read fails.
pub async fn get_flag(store: &dyn KeyValueStore, key: &str) -> Result<bool, StorageError> {
    Ok(store.get(key).await?.is_some_and(|v| v.trim() == "true"))
}

/// Write a boolean as `"true"`/`"false"`.
///
/// # Errors
///
/// Returns an error if the write fails.
pub async fn set_flag(store: &dyn KeyValueStore, key: &str, value: bool) -> Result<(), StorageError> {
    store.set(key, if value { "true" } else { "false" }).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        for key in keys::ALL {
            assert!(validate_key(key).is_ok(), "{key} should be valid");
        }
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("user addresses").is_err());
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let store = MemoryStore::new();
        set_json(&store, "numbers", &vec![1, 2, 3]).await.unwrap();

        let numbers: Option<Vec<i32>> = get_json(&store, "numbers").await.unwrap();
        assert_eq!(numbers, Some(vec![1, 2, 3]));

        let missing: Option<Vec<i32>> = get_json(&store, "missing").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_get_json_reports_corrupt_value() {
        let store = MemoryStore::new();
        store.set("orders", "{not json").await.unwrap();

        let result: Result<Option<Vec<i32>>, _> = get_json(&store, "orders").await;
        assert!(matches!(result, Err(StorageError::Serialization { .. })));
    }

    #[tokio::test]
    async fn test_load_or_default_falls_back_on_corrupt_value() {
        let store = MemoryStore::new();
        store.set("orders", "{not json").await.unwrap();

        let orders: Vec<i32> = load_or_default(&store, "orders").await;
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_flags() {
        let store = MemoryStore::new();
        assert!(!get_flag(&store, keys::HAS_SEEN_ONBOARDING).await.unwrap());

        set_flag(&store, keys::HAS_SEEN_ONBOARDING, true).await.unwrap();
        assert!(get_flag(&store, keys::HAS_SEEN_ONBOARDING).await.unwrap());
        assert_eq!(
            store.get(keys::HAS_SEEN_ONBOARDING).await.unwrap().as_deref(),
            Some("true")
        );
    }
}
