//! Restaurant and menu item types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dishdash_core::{MenuItemId, RestaurantId};

/// A dish offered by a restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    /// Unit price, serialized as a decimal string (e.g. `"12.99"`).
    pub price: Decimal,
    /// Image reference (asset name or URL).
    pub image: String,
    pub description: String,
    /// Short category label such as `"Burger"` or `"Vegan"`.
    pub tag: String,
    /// Average rating, 0.0-5.0.
    pub rating: Decimal,
    /// Owning restaurant's display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
}

/// A restaurant and its menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub cuisine: String,
    pub rating: Decimal,
    /// Estimated delivery window, e.g. `"20-30 min"`.
    pub delivery_time: String,
    pub image: String,
    pub menu: Vec<MenuItem>,
}

impl Restaurant {
    /// Look up an item on this restaurant's menu.
    #[must_use]
    pub fn item(&self, id: &MenuItemId) -> Option<&MenuItem> {
        self.menu.iter().find(|item| &item.id == id)
    }
}
