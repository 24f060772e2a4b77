//! Checkout and order history commands.

use dishdash_client::models::Order;
use dishdash_client::services::CheckoutRequest;
use dishdash_client::state::AppState;
use dishdash_core::{OrderId, OrderStatus, PaymentMethod};

use super::{CommandError, money};

/// Place an order for the cart contents.
///
/// # Errors
///
/// Returns an error for an unknown payment method, an empty cart, missing
/// delivery details, or a storage failure.
#[allow(clippy::print_stdout)]
pub async fn checkout(
    state: &AppState,
    phone: Option<String>,
    payment: &str,
    address: Option<String>,
) -> Result<(), CommandError> {
    let payment_method: PaymentMethod = payment
        .parse()
        .map_err(CommandError::InvalidArgument)?;

    let order = state
        .checkout()
        .checkout(CheckoutRequest {
            phone,
            payment_method,
            address,
        })
        .await?;

    println!("Order {} placed", order.id);
    print_order(&order);
    Ok(())
}

/// List orders, optionally filtered by status.
///
/// # Errors
///
/// Returns an error for an unknown status.
#[allow(clippy::print_stdout)]
pub async fn list(state: &AppState, status: Option<&str>) -> Result<(), CommandError> {
    let orders = match status {
        Some(status) => {
            let status: OrderStatus = status
                .parse()
                .map_err(CommandError::InvalidArgument)?;
            state.orders().with_status(status).await
        }
        None => state.orders().all().await,
    };

    if orders.is_empty() {
        println!("No orders");
        return Ok(());
    }
    for summary in orders.iter().map(Order::summary) {
        println!(
            "{:<16} {}  {:>2} items  {:>8}  {}",
            summary.id.as_str(),
            summary.date.format("%Y-%m-%d %H:%M"),
            summary.item_count,
            money(summary.total).to_string(),
            summary.status
        );
    }
    Ok(())
}

/// Show one order in full.
///
/// # Errors
///
/// Returns an error if the order does not exist.
pub async fn show(state: &AppState, id: &str) -> Result<(), CommandError> {
    let id = OrderId::new(id);
    let order = state
        .orders()
        .get(&id)
        .await
        .ok_or_else(|| CommandError::InvalidArgument(format!("unknown order '{id}'")))?;
    print_order(&order);
    Ok(())
}

/// Cancel a pending order.
///
/// # Errors
///
/// Returns an error if the order does not exist, was delivered, or cannot
/// be saved.
#[allow(clippy::print_stdout)]
pub async fn cancel(state: &AppState, id: &str) -> Result<(), CommandError> {
    let order = state.orders().cancel(&OrderId::new(id)).await?;
    println!("Order {} is {}", order.id, order.status);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_order(order: &Order) {
    println!("Status:   {}", order.status);
    println!("Placed:   {}", order.date.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Deliver:  {}", order.delivery_address);
    println!("Phone:    {}", order.phone);
    println!("Payment:  {}", order.payment_method);
    for line in &order.items {
        println!(
            "  {} x {:<24} {:>8}",
            line.quantity,
            line.name,
            money(line.line_total()).to_string()
        );
    }
    println!("Subtotal: {}", money(order.subtotal));
    println!("Delivery: {}", money(order.delivery_fee));
    println!("Total:    {}", money(order.total));
    if order.is_cancellable() {
        println!("Cancel with: dishdash orders cancel {}", order.id);
    }
}
