//! Order history repository.
//!
//! Orders are stored newest-last as a JSON array under `orders` and loaded
//! wholesale at startup.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::instrument;

use dishdash_core::{OrderId, OrderStatus};

use crate::error::{AppError, Result};
use crate::models::Order;
use crate::storage::{self, KeyValueStore, keys};

/// Repository for placed orders.
pub struct OrderRepository {
    store: Arc<dyn KeyValueStore>,
    orders: Mutex<Vec<Order>>,
}

impl OrderRepository {
    /// Create an empty repository. Call [`Self::load`] to read stored orders.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            orders: Mutex::new(Vec::new()),
        }
    }

    /// Load stored orders, replacing whatever is in memory.
    ///
    /// A missing or corrupt blob loads as an empty history.
    #[instrument(skip(self))]
    pub async fn load(&self) -> usize {
        let loaded: Vec<Order> = storage::load_or_default(self.store.as_ref(), keys::ORDERS).await;
        let count = loaded.len();
        *self.orders.lock().await = loaded;
        tracing::debug!(count, "Loaded orders");
        count
    }

    /// All orders, newest first.
    ///
    /// Orders sharing a timestamp keep reverse insertion order.
    pub async fn all(&self) -> Vec<Order> {
        let mut orders = self.orders.lock().await.clone();
        orders.reverse();
        orders.sort_by(|a, b| b.date.cmp(&a.date));
        orders
    }

    /// Orders with the given status, newest first.
    pub async fn with_status(&self, status: OrderStatus) -> Vec<Order> {
        self.all()
            .await
            .into_iter()
            .filter(|order| order.status == status)
            .collect()
    }

    /// Look up an order by ID.
    pub async fn get(&self, id: &OrderId) -> Option<Order> {
        self.orders
            .lock()
            .await
            .iter()
            .find(|order| &order.id == id)
            .cloned()
    }

    /// Append a new order and persist.
    ///
    /// If another order already uses the ID, a numeric suffix is added so
    /// two orders placed in the same millisecond stay distinct. Returns the
    /// order as stored.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the write fails; memory is left unchanged.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn insert(&self, mut order: Order) -> Result<Order> {
        let mut orders = self.orders.lock().await;

        if orders.iter().any(|o| o.id == order.id) {
            let base = order.id.clone();
            let mut n = 1;
            while orders.iter().any(|o| o.id == order.id) {
                order.id = OrderId::new(format!("{base}-{n}"));
                n += 1;
            }
        }

        let mut next = orders.clone();
        next.push(order.clone());
        storage::set_json(self.store.as_ref(), keys::ORDERS, &next).await?;
        *orders = next;

        tracing::info!(order_id = %order.id, total = %order.total, "Order saved");
        Ok(order)
    }

    /// Cancel a pending order.
    ///
    /// Cancelling an already cancelled order is a no-op. Item contents are
    /// never touched.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown ID,
    /// `AppError::InvalidTransition` if the order was delivered, or
    /// `AppError::Storage` if the write fails.
    pub async fn cancel(&self, id: &OrderId) -> Result<Order> {
        self.transition(id, OrderStatus::Cancelled).await
    }

    /// Mark a pending order as delivered.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown ID,
    /// `AppError::InvalidTransition` if the order was cancelled, or
    /// `AppError::Storage` if the write fails.
    pub async fn mark_delivered(&self, id: &OrderId) -> Result<Order> {
        self.transition(id, OrderStatus::Delivered).await
    }

    #[instrument(skip(self), fields(order_id = %id))]
    async fn transition(&self, id: &OrderId, to: OrderStatus) -> Result<Order> {
        let mut orders = self.orders.lock().await;

        let index = orders
            .iter()
            .position(|order| &order.id == id)
            .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
        let mut next = orders.clone();
        let Some(order) = next.get_mut(index) else {
            return Err(AppError::NotFound(format!("order {id}")));
        };

        let from = order.status;
        if !from.can_transition_to(to) {
            return Err(AppError::InvalidTransition { from, to });
        }
        if from == to {
            return Ok(order.clone());
        }

        order.status = to;
        let updated = order.clone();
        storage::set_json(self.store.as_ref(), keys::ORDERS, &next).await?;
        *orders = next;

        tracing::info!(%from, %to, "Order status changed");
        Ok(updated)
    }

    /// Delete the whole order history.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the key cannot be removed.
    pub async fn clear(&self) -> Result<()> {
        let mut orders = self.orders.lock().await;
        self.store.remove(keys::ORDERS).await?;
        orders.clear();
        tracing::info!("Order history cleared");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    use dishdash_core::{PaymentMethod, PhoneNumber};

    use super::*;
    use crate::catalog::Catalog;
    use crate::models::CartItem;
    use crate::storage::MemoryStore;

    fn order(id: &str, minutes_ago: i64) -> Order {
        let item = Catalog::builtin().items().next().unwrap();
        Order {
            id: OrderId::new(id),
            items: vec![CartItem::from_menu_item(item, 2)],
            subtotal: Decimal::new(1798, 2),
            delivery_fee: Decimal::new(299, 2),
            total: Decimal::new(2097, 2),
            delivery_address: "1 Main St".to_owned(),
            phone: PhoneNumber::parse("5550102030").unwrap(),
            payment_method: PaymentMethod::Cash,
            status: OrderStatus::Pending,
            date: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    fn repo() -> (Arc<MemoryStore>, OrderRepository) {
        let store = Arc::new(MemoryStore::new());
        let repo = OrderRepository::new(store.clone());
        (store, repo)
    }

    #[tokio::test]
    async fn test_insert_persists_and_lists_newest_first() {
        let (store, repo) = repo();
        repo.insert(order("1", 10)).await.unwrap();
        repo.insert(order("2", 0)).await.unwrap();

        let all = repo.all().await;
        assert_eq!(all[0].id.as_str(), "2");
        assert_eq!(all[1].id.as_str(), "1");

        let reloaded = OrderRepository::new(store);
        assert_eq!(reloaded.load().await, 2);
    }

    #[tokio::test]
    async fn test_insert_deduplicates_ids() {
        let (_store, repo) = repo();
        repo.insert(order("1700000000000", 1)).await.unwrap();
        let second = repo.insert(order("1700000000000", 0)).await.unwrap();
        assert_eq!(second.id.as_str(), "1700000000000-1");
    }

    #[tokio::test]
    async fn test_same_timestamp_lists_latest_insert_first() {
        let (_store, repo) = repo();
        let first = order("1700000000000", 0);
        let mut second = first.clone();
        second.total = Decimal::new(999, 2);

        repo.insert(first).await.unwrap();
        repo.insert(second).await.unwrap();

        let ids: Vec<_> = repo.all().await.into_iter().map(|o| o.id).collect();
        assert_eq!(
            ids,
            vec![OrderId::new("1700000000000-1"), OrderId::new("1700000000000")]
        );
    }

    #[tokio::test]
    async fn test_cancel_changes_only_status() {
        let (_store, repo) = repo();
        let placed = repo.insert(order("1", 0)).await.unwrap();

        let cancelled = repo.cancel(&placed.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.items, placed.items);
        assert_eq!(cancelled.total, placed.total);

        // Idempotent
        let again = repo.cancel(&placed.id).await.unwrap();
        assert_eq!(again.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_cannot_cancel_delivered() {
        let (_store, repo) = repo();
        let placed = repo.insert(order("1", 0)).await.unwrap();
        repo.mark_delivered(&placed.id).await.unwrap();

        let err = repo.cancel(&placed.id).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Cancelled
            }
        ));
        assert_eq!(
            repo.get(&placed.id).await.unwrap().status,
            OrderStatus::Delivered
        );
    }

    #[tokio::test]
    async fn test_cancel_unknown_order() {
        let (_store, repo) = repo();
        assert!(matches!(
            repo.cancel(&OrderId::new("nope")).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_with_status_and_clear() {
        let (store, repo) = repo();
        let a = repo.insert(order("1", 5)).await.unwrap();
        repo.insert(order("2", 0)).await.unwrap();
        repo.cancel(&a.id).await.unwrap();

        assert_eq!(repo.with_status(OrderStatus::Pending).await.len(), 1);
        assert_eq!(repo.with_status(OrderStatus::Cancelled).await.len(), 1);

        repo.clear().await.unwrap();
        assert!(repo.all().await.is_empty());
        assert!(store.get(keys::ORDERS).await.unwrap().is_none());
    }
}
