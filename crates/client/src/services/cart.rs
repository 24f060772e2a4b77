//! Shopping cart.
//!
//! The cart lives in memory. When constructed with a store it also mirrors
//! itself to the `cart` key after every change so it survives restarts.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::instrument;

use dishdash_core::CartLineId;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{CartItem, MenuItem};
use crate::storage::{self, KeyValueStore, keys};

/// The user's cart.
pub struct CartService {
    store: Option<Arc<dyn KeyValueStore>>,
    items: Mutex<Vec<CartItem>>,
}

impl CartService {
    /// A cart that is never written to storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            store: None,
            items: Mutex::new(Vec::new()),
        }
    }

    /// A cart mirrored to the `cart` key of `store`.
    #[must_use]
    pub fn persistent(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store: Some(store),
            items: Mutex::new(Vec::new()),
        }
    }

    /// Restore the persisted cart, if any. In-memory carts are unaffected.
    ///
    /// Lines with a zero quantity are dropped.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> usize {
        let Some(store) = &self.store else {
            return 0;
        };
        let mut restored: Vec<CartItem> = storage::load_or_default(store.as_ref(), keys::CART).await;
        restored.retain(|item| item.quantity > 0);
        let count = restored.len();
        *self.items.lock().await = restored;
        count
    }

    /// Current cart lines in the order they were added.
    pub async fn items(&self) -> Vec<CartItem> {
        self.items.lock().await.clone()
    }

    /// Whether the cart has no lines.
    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    /// Total number of units across all lines.
    pub async fn item_count(&self) -> u32 {
        self.items.lock().await.iter().map(|item| item.quantity).sum()
    }

    /// Sum of line totals.
    pub async fn subtotal(&self) -> Decimal {
        self.items
            .lock()
            .await
            .iter()
            .map(CartItem::line_total)
            .sum()
    }

    /// Add `quantity` units of a menu item.
    ///
    /// If the same dish from the same restaurant is already in the cart its
    /// quantity grows; otherwise a new line with a fresh cart ID is appended.
    /// Returns the affected line.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a zero quantity, or
    /// `AppError::Storage` if persisting fails.
    #[instrument(skip(self, item), fields(item_id = %item.id))]
    pub async fn add(&self, item: &MenuItem, quantity: u32) -> Result<CartItem> {
        if quantity == 0 {
            return Err(AppError::Validation("quantity must be at least 1".to_owned()));
        }

        let mut items = self.items.lock().await;
        let mut next = items.clone();
        let line = if let Some(existing) = next.iter_mut().find(|line| line.is_same_item(item)) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            existing.clone()
        } else {
            let line = CartItem::from_menu_item(item, quantity);
            next.push(line.clone());
            line
        };

        self.persist(&next).await?;
        *items = next;

        add_breadcrumb("cart", "Added item", Some(&[("item_id", item.id.as_str())]));
        tracing::debug!(cart_id = %line.cart_id, quantity = line.quantity, "Cart line updated");
        Ok(line)
    }

    /// Remove exactly one line by its cart ID.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no line has that ID, or
    /// `AppError::Storage` if persisting fails.
    #[instrument(skip(self))]
    pub async fn remove(&self, cart_id: &CartLineId) -> Result<CartItem> {
        let mut items = self.items.lock().await;
        let index = items
            .iter()
            .position(|line| &line.cart_id == cart_id)
            .ok_or_else(|| AppError::NotFound(format!("cart line {cart_id}")))?;

        let mut next = items.clone();
        let removed = next.remove(index);
        self.persist(&next).await?;
        *items = next;
        Ok(removed)
    }

    /// Set a line's quantity. Zero removes the line.
    ///
    /// Returns the updated line, or `None` if it was removed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no line has that ID, or
    /// `AppError::Storage` if persisting fails.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        cart_id: &CartLineId,
        quantity: u32,
    ) -> Result<Option<CartItem>> {
        if quantity == 0 {
            self.remove(cart_id).await?;
            return Ok(None);
        }

        let mut items = self.items.lock().await;
        let mut next = items.clone();
        let line = next
            .iter_mut()
            .find(|line| &line.cart_id == cart_id)
            .ok_or_else(|| AppError::NotFound(format!("cart line {cart_id}")))?;
        line.quantity = quantity;
        let updated = line.clone();

        self.persist(&next).await?;
        *items = next;
        Ok(Some(updated))
    }

    /// Add one unit to a line.
    ///
    /// # Errors
    ///
    /// See [`Self::update_quantity`].
    pub async fn increment(&self, cart_id: &CartLineId) -> Result<Option<CartItem>> {
        let current = self.quantity_of(cart_id).await?;
        self.update_quantity(cart_id, current.saturating_add(1)).await
    }

    /// Remove one unit from a line; the last unit removes the line.
    ///
    /// # Errors
    ///
    /// See [`Self::update_quantity`].
    pub async fn decrement(&self, cart_id: &CartLineId) -> Result<Option<CartItem>> {
        let current = self.quantity_of(cart_id).await?;
        self.update_quantity(cart_id, current.saturating_sub(1)).await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if persisting fails.
    pub async fn clear(&self) -> Result<()> {
        let mut items = self.items.lock().await;
        if let Some(store) = &self.store {
            store.remove(keys::CART).await?;
        }
        items.clear();
        Ok(())
    }

    /// Empty the in-memory cart, leaving storage as it is.
    pub(crate) async fn discard(&self) {
        self.items.lock().await.clear();
    }

    async fn quantity_of(&self, cart_id: &CartLineId) -> Result<u32> {
        self.items
            .lock()
            .await
            .iter()
            .find(|line| &line.cart_id == cart_id)
            .map(|line| line.quantity)
            .ok_or_else(|| AppError::NotFound(format!("cart line {cart_id}")))
    }

    async fn persist(&self, items: &[CartItem]) -> Result<()> {
        if let Some(store) = &self.store {
            storage::set_json(store.as_ref(), keys::CART, items).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use dishdash_core::{MenuItemId, RestaurantId};

    use super::*;
    use crate::catalog::Catalog;
    use crate::storage::MemoryStore;

    fn dish(restaurant: &str, item: &str) -> MenuItem {
        Catalog::builtin()
            .find_item(&RestaurantId::new(restaurant), &MenuItemId::new(item))
            .unwrap()
            .clone()
    }

    #[tokio::test]
    async fn test_adding_same_item_increments_quantity() {
        let cart = CartService::in_memory();
        let burger = dish("burger-barn", "bb-1");

        let first = cart.add(&burger, 1).await.unwrap();
        let second = cart.add(&burger, 2).await.unwrap();

        assert_eq!(first.cart_id, second.cart_id);
        assert_eq!(second.quantity, 3);
        assert_eq!(cart.items().await.len(), 1);
        assert_eq!(cart.item_count().await, 3);
    }

    #[tokio::test]
    async fn test_same_id_from_other_restaurant_is_separate_line() {
        let cart = CartService::in_memory();
        let burger = dish("burger-barn", "bb-1");
        let mut lookalike = burger.clone();
        lookalike.restaurant_name = Some("Other Place".to_owned());

        cart.add(&burger, 1).await.unwrap();
        cart.add(&lookalike, 1).await.unwrap();
        assert_eq!(cart.items().await.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_by_cart_id_removes_exactly_one() {
        let cart = CartService::in_memory();
        let a = cart.add(&dish("burger-barn", "bb-1"), 1).await.unwrap();
        let b = cart.add(&dish("burger-barn", "bb-3"), 2).await.unwrap();
        let c = cart.add(&dish("pizza-palace", "pp-1"), 1).await.unwrap();

        let removed = cart.remove(&b.cart_id).await.unwrap();
        assert_eq!(removed.cart_id, b.cart_id);

        let remaining = cart.items().await;
        assert_eq!(remaining, vec![a, c]);

        assert!(matches!(
            cart.remove(&b.cart_id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected() {
        let cart = CartService::in_memory();
        assert!(matches!(
            cart.add(&dish("burger-barn", "bb-1"), 0).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_increment_decrement() {
        let cart = CartService::in_memory();
        let line = cart.add(&dish("sushi-zen", "sz-1"), 1).await.unwrap();

        let updated = cart.update_quantity(&line.cart_id, 4).await.unwrap().unwrap();
        assert_eq!(updated.quantity, 4);

        let bumped = cart.increment(&line.cart_id).await.unwrap().unwrap();
        assert_eq!(bumped.quantity, 5);

        cart.update_quantity(&line.cart_id, 1).await.unwrap();
        assert!(cart.decrement(&line.cart_id).await.unwrap().is_none());
        assert!(cart.is_empty().await);
    }

    #[tokio::test]
    async fn test_subtotal() {
        let cart = CartService::in_memory();
        cart.add(&dish("burger-barn", "bb-1"), 2).await.unwrap(); // 2 x 8.99
        cart.add(&dish("burger-barn", "bb-3"), 1).await.unwrap(); // 1 x 3.49
        assert_eq!(cart.subtotal().await, Decimal::new(2147, 2));
    }

    #[tokio::test]
    async fn test_persistent_cart_survives_restore() {
        let store = Arc::new(MemoryStore::new());
        let cart = CartService::persistent(store.clone());
        cart.add(&dish("pizza-palace", "pp-2"), 2).await.unwrap();

        let restored = CartService::persistent(store.clone());
        assert_eq!(restored.restore().await, 1);
        assert_eq!(restored.item_count().await, 2);

        restored.clear().await.unwrap();
        assert!(store.get(keys::CART).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_cart_restores_nothing() {
        let cart = CartService::in_memory();
        cart.add(&dish("pizza-palace", "pp-2"), 1).await.unwrap();
        assert_eq!(cart.restore().await, 0);
        assert_eq!(cart.item_count().await, 1);
    }
}
