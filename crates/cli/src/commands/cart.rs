//! Cart commands.

use dishdash_client::state::AppState;
use dishdash_core::{CartLineId, MenuItemId, RestaurantId};

use super::{CommandError, money};

/// Print the cart with totals.
#[allow(clippy::print_stdout)]
pub async fn show(state: &AppState) {
    let items = state.cart().items().await;
    if items.is_empty() {
        println!("Cart is empty");
        return;
    }

    for line in &items {
        println!(
            "{}  {} x {:<24} {:>8}  ({})",
            line.cart_id,
            line.quantity,
            line.name,
            money(line.line_total()).to_string(),
            line.restaurant_name.as_deref().unwrap_or_default()
        );
    }

    let subtotal = state.cart().subtotal().await;
    let fee = state.checkout().delivery_fee();
    println!("Subtotal:     {}", money(subtotal));
    println!("Delivery fee: {}", money(fee));
    println!("Total:        {}", money(subtotal + fee));
}

/// Add a dish from a restaurant's menu.
///
/// # Errors
///
/// Returns an error if the dish does not exist or the cart cannot be saved.
#[allow(clippy::print_stdout)]
pub async fn add(
    state: &AppState,
    restaurant: &str,
    item: &str,
    quantity: u32,
) -> Result<(), CommandError> {
    let restaurant_id = RestaurantId::new(restaurant);
    let item_id = MenuItemId::new(item);
    let dish = state
        .catalog()
        .find_item(&restaurant_id, &item_id)
        .ok_or_else(|| {
            CommandError::InvalidArgument(format!("no dish '{item_id}' at '{restaurant_id}'"))
        })?;

    let line = state.cart().add(dish, quantity).await?;
    println!("{} x {} in cart ({})", line.quantity, line.name, line.cart_id);
    Ok(())
}

/// Remove a cart line.
///
/// # Errors
///
/// Returns an error if the line does not exist or the cart cannot be saved.
#[allow(clippy::print_stdout)]
pub async fn remove(state: &AppState, cart_id: &str) -> Result<(), CommandError> {
    let removed = state.cart().remove(&CartLineId::new(cart_id)).await?;
    println!("Removed {}", removed.name);
    Ok(())
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns an error if the line does not exist or the cart cannot be saved.
#[allow(clippy::print_stdout)]
pub async fn set_quantity(
    state: &AppState,
    cart_id: &str,
    quantity: u32,
) -> Result<(), CommandError> {
    match state
        .cart()
        .update_quantity(&CartLineId::new(cart_id), quantity)
        .await?
    {
        Some(line) => println!("{} x {}", line.quantity, line.name),
        None => println!("Removed {cart_id}"),
    }
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
#[allow(clippy::print_stdout)]
pub async fn clear(state: &AppState) -> Result<(), CommandError> {
    state.cart().clear().await?;
    println!("Cart cleared");
    Ok(())
}
