//! Checkout: turns the cart into a persisted order.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::instrument;

use dishdash_core::{OrderId, OrderStatus, PaymentMethod, PhoneNumber};

use crate::db::{AddressRepository, OrderRepository};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{CartItem, Order};
use crate::services::cart::CartService;

/// Details collected on the checkout screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Contact phone. Falls back to the default address's phone when `None`.
    pub phone: Option<String>,
    pub payment_method: PaymentMethod,
    /// Delivery address. Falls back to the default saved address when `None`.
    pub address: Option<String>,
}

/// Places orders from the cart.
pub struct CheckoutService {
    cart: Arc<CartService>,
    orders: Arc<OrderRepository>,
    addresses: Arc<AddressRepository>,
    delivery_fee: Decimal,
}

impl CheckoutService {
    #[must_use]
    pub const fn new(
        cart: Arc<CartService>,
        orders: Arc<OrderRepository>,
        addresses: Arc<AddressRepository>,
        delivery_fee: Decimal,
    ) -> Self {
        Self {
            cart,
            orders,
            addresses,
            delivery_fee,
        }
    }

    /// Flat fee added to every order.
    #[must_use]
    pub const fn delivery_fee(&self) -> Decimal {
        self.delivery_fee
    }

    /// Place an order for everything in the cart.
    ///
    /// The order snapshots the cart lines, totals them with the delivery fee
    /// and is saved as `pending`. The cart is emptied only after the order
    /// has been written. If the stored cart cannot be removed, the failure
    /// is logged, the in-memory cart is still emptied and the order is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `AppError::EmptyCart` if the cart is empty,
    /// `AppError::Validation` for a missing address or invalid phone, or
    /// `AppError::Storage` if saving the order fails.
    #[instrument(skip(self, request), fields(payment = %request.payment_method))]
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<Order> {
        let items = self.cart.items().await;
        if items.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let default_address = self.addresses.default_address().await;

        let delivery_address = match request.address.as_deref().map(str::trim) {
            Some(address) if !address.is_empty() => address.to_owned(),
            Some(_) => {
                return Err(AppError::Validation("delivery address is required".to_owned()));
            }
            None => default_address
                .as_ref()
                .map(|a| a.address.clone())
                .ok_or_else(|| {
                    AppError::Validation(
                        "delivery address is required (no default address saved)".to_owned(),
                    )
                })?,
        };

        let phone = match request.phone.as_deref() {
            Some(raw) => PhoneNumber::parse(raw)
                .map_err(|e| AppError::Validation(format!("phone: {e}")))?,
            None => default_address
                .map(|a| a.phone)
                .ok_or_else(|| AppError::Validation("phone number is required".to_owned()))?,
        };

        let subtotal: Decimal = items.iter().map(CartItem::line_total).sum();
        let now = Utc::now();
        let order = Order {
            id: OrderId::from_timestamp(now),
            items,
            subtotal,
            delivery_fee: self.delivery_fee,
            total: subtotal + self.delivery_fee,
            delivery_address,
            phone,
            payment_method: request.payment_method,
            status: OrderStatus::Pending,
            date: now,
        };

        let order = self.orders.insert(order).await?;
        add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order.id.as_str())]));

        // The order is saved, so clearing is best-effort from here.
        if let Err(e) = self.cart.clear().await {
            tracing::warn!(order_id = %order.id, error = %e, "Failed to clear cart after checkout");
            self.cart.discard().await;
            add_breadcrumb(
                "checkout",
                "Cart not cleared",
                Some(&[("order_id", order.id.as_str())]),
            );
        }

        Ok(order)
    }
}
