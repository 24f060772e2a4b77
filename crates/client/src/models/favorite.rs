//! Favorite (bookmarked) menu items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dishdash_core::MenuItemId;

use super::MenuItem;

/// A bookmarked menu item. Favorites are keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub description: String,
    pub tag: String,
    pub rating: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
    /// When the item was bookmarked; absent in blobs written by older versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl FavoriteItem {
    /// Bookmark a menu item now.
    #[must_use]
    pub fn from_menu_item(item: &MenuItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            image: item.image.clone(),
            description: item.description.clone(),
            tag: item.tag.clone(),
            rating: item.rating,
            restaurant_name: item.restaurant_name.clone(),
            added_at: Some(Utc::now()),
        }
    }
}
