//! Favorites commands.

use dishdash_client::state::AppState;
use dishdash_core::MenuItemId;

use super::{CommandError, money};

/// List favorites.
#[allow(clippy::print_stdout)]
pub async fn list(state: &AppState) {
    let favorites = state.favorites().all().await;
    if favorites.is_empty() {
        println!("No favorites yet");
        return;
    }
    for fav in favorites {
        println!(
            "{:<6} {:<24} {:>8}  {}",
            fav.id.as_str(),
            fav.name,
            money(fav.price).to_string(),
            fav.restaurant_name.as_deref().unwrap_or_default()
        );
    }
}

/// Bookmark a dish by its item ID.
///
/// # Errors
///
/// Returns an error if the dish does not exist or favorites cannot be saved.
#[allow(clippy::print_stdout)]
pub async fn add(state: &AppState, item: &str) -> Result<(), CommandError> {
    let id = MenuItemId::new(item);
    let dish = state
        .catalog()
        .find_item_anywhere(&id)
        .ok_or_else(|| CommandError::InvalidArgument(format!("unknown dish '{id}'")))?;

    if state.favorites().add(dish).await? {
        println!("Added {} to favorites", dish.name);
    } else {
        println!("{} is already a favorite", dish.name);
    }
    Ok(())
}

/// Remove a favorite.
///
/// # Errors
///
/// Returns an error if the dish is not a favorite or favorites cannot be saved.
#[allow(clippy::print_stdout)]
pub async fn remove(state: &AppState, item: &str) -> Result<(), CommandError> {
    state.favorites().remove(&MenuItemId::new(item)).await?;
    println!("Removed {item} from favorites");
    Ok(())
}

/// Remove every favorite.
///
/// # Errors
///
/// Returns an error if favorites cannot be saved.
#[allow(clippy::print_stdout)]
pub async fn clear(state: &AppState) -> Result<(), CommandError> {
    state.favorites().clear().await?;
    println!("Favorites cleared");
    Ok(())
}
