//! Favorite items repository.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::instrument;

use dishdash_core::MenuItemId;

use crate::error::{AppError, Result};
use crate::models::{FavoriteItem, MenuItem};
use crate::storage::{self, KeyValueStore, keys};

/// Repository for bookmarked menu items, keyed by item ID.
pub struct FavoriteRepository {
    store: Arc<dyn KeyValueStore>,
    favorites: Mutex<Vec<FavoriteItem>>,
}

impl FavoriteRepository {
    /// Create an empty repository. Call [`Self::load`] to read stored favorites.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            favorites: Mutex::new(Vec::new()),
        }
    }

    /// Load stored favorites, replacing whatever is in memory.
    ///
    /// Duplicate IDs in the stored list are dropped (first one wins).
    #[instrument(skip(self))]
    pub async fn load(&self) -> usize {
        let mut loaded: Vec<FavoriteItem> =
            storage::load_or_default(self.store.as_ref(), keys::FAVORITES).await;
        let before = loaded.len();
        let mut seen = Vec::with_capacity(before);
        loaded.retain(|fav| {
            if seen.contains(&fav.id) {
                false
            } else {
                seen.push(fav.id.clone());
                true
            }
        });
        if loaded.len() != before {
            tracing::warn!(dropped = before - loaded.len(), "Dropped duplicate favorites");
        }

        let count = loaded.len();
        *self.favorites.lock().await = loaded;
        count
    }

    /// All favorites in the order they were added.
    pub async fn all(&self) -> Vec<FavoriteItem> {
        self.favorites.lock().await.clone()
    }

    /// Whether an item is bookmarked.
    pub async fn is_favorite(&self, id: &MenuItemId) -> bool {
        self.favorites.lock().await.iter().any(|fav| &fav.id == id)
    }

    /// Bookmark an item. Returns `false` if it was already a favorite.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the write fails.
    #[instrument(skip(self, item), fields(item_id = %item.id))]
    pub async fn add(&self, item: &MenuItem) -> Result<bool> {
        let mut favorites = self.favorites.lock().await;
        if favorites.iter().any(|fav| fav.id == item.id) {
            return Ok(false);
        }

        let mut next = favorites.clone();
        next.push(FavoriteItem::from_menu_item(item));
        self.persist(&next).await?;
        *favorites = next;
        Ok(true)
    }

    /// Remove a favorite.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the item is not a favorite, or
    /// `AppError::Storage` if the write fails.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &MenuItemId) -> Result<()> {
        let mut favorites = self.favorites.lock().await;
        if !favorites.iter().any(|fav| &fav.id == id) {
            return Err(AppError::NotFound(format!("favorite {id}")));
        }

        let next: Vec<FavoriteItem> = favorites.iter().filter(|fav| &fav.id != id).cloned().collect();
        self.persist(&next).await?;
        *favorites = next;
        Ok(())
    }

    /// Add the item if absent, remove it if present. Returns the new state.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the write fails.
    pub async fn toggle(&self, item: &MenuItem) -> Result<bool> {
        if self.is_favorite(&item.id).await {
            self.remove(&item.id).await?;
            Ok(false)
        } else {
            self.add(item).await?;
            Ok(true)
        }
    }

    /// Remove every favorite. The stored list becomes `[]`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the write fails.
    pub async fn clear(&self) -> Result<()> {
        let mut favorites = self.favorites.lock().await;
        self.persist(&[]).await?;
        favorites.clear();
        tracing::info!("Favorites cleared");
        Ok(())
    }

    async fn persist(&self, favorites: &[FavoriteItem]) -> Result<()> {
        storage::set_json(self.store.as_ref(), keys::FAVORITES, favorites).await?;
        Ok(())
    }
}
