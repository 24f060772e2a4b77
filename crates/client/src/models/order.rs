//! Orders placed at checkout.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dishdash_core::{OrderId, OrderStatus, PaymentMethod, PhoneNumber};

use super::CartItem;

/// A finalized cart snapshot with delivery and payment details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Timestamp-derived ID.
    pub id: OrderId,
    pub items: Vec<CartItem>,
    /// Sum of line totals.
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub delivery_fee: Decimal,
    /// Amount charged: subtotal plus delivery fee.
    pub total: Decimal,
    pub delivery_address: String,
    pub phone: PhoneNumber,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub date: DateTime<Utc>,
}

impl Order {
    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Whether the user can still cancel this order.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        !self.status.is_final()
    }

    /// Condensed view for order history lists.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        OrderSummary {
            id: self.id.clone(),
            item_count: self.item_count(),
            total: self.total,
            status: self.status,
            date: self.date,
        }
    }
}

/// Order history row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub item_count: u32,
    pub total: Decimal,
    pub status: OrderStatus,
    pub date: DateTime<Utc>,
}
