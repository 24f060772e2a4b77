//! Catalog browsing commands.

use dishdash_client::models::MenuItem;
use dishdash_client::state::AppState;
use dishdash_core::RestaurantId;

use super::{CommandError, money};

/// List every restaurant.
#[allow(clippy::print_stdout)]
pub fn restaurants(state: &AppState) {
    for restaurant in state.catalog().restaurants() {
        println!(
            "{:<14} {:<16} {:<10} ★{} {}",
            restaurant.id.as_str(),
            restaurant.name,
            restaurant.cuisine,
            restaurant.rating,
            restaurant.delivery_time
        );
    }
}

/// Show one restaurant's menu.
///
/// # Errors
///
/// Returns an error if the restaurant does not exist.
#[allow(clippy::print_stdout)]
pub fn menu(state: &AppState, restaurant: &str) -> Result<(), CommandError> {
    let id = RestaurantId::new(restaurant);
    let restaurant = state
        .catalog()
        .restaurant(&id)
        .ok_or_else(|| CommandError::InvalidArgument(format!("unknown restaurant '{id}'")))?;

    println!("{} ({}, {})", restaurant.name, restaurant.cuisine, restaurant.delivery_time);
    for item in &restaurant.menu {
        print_item(item);
    }
    Ok(())
}

/// Search dishes across all restaurants.
#[allow(clippy::print_stdout)]
pub fn search(state: &AppState, query: &str) {
    let results = state.catalog().search(query);
    if results.is_empty() {
        println!("No dishes match '{query}'");
        return;
    }
    for item in results {
        print_item(item);
    }
}

/// List tags, or the dishes carrying `tag`.
#[allow(clippy::print_stdout)]
pub fn tags(state: &AppState, tag: Option<&str>) {
    match tag {
        Some(tag) => {
            for item in state.catalog().by_tag(tag) {
                print_item(item);
            }
        }
        None => {
            for tag in state.catalog().tags() {
                println!("{tag}");
            }
        }
    }
}

/// Show the highest-rated dishes.
pub fn popular(state: &AppState, limit: usize) {
    for item in state.catalog().popular(limit) {
        print_item(item);
    }
}

#[allow(clippy::print_stdout)]
fn print_item(item: &MenuItem) {
    println!(
        "  {:<6} {:<24} {:>8}  ★{}  [{}] {}",
        item.id.as_str(),
        item.name,
        money(item.price).to_string(),
        item.rating,
        item.tag,
        item.restaurant_name.as_deref().unwrap_or_default()
    );
}
