//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dishdash_core::{CartLineId, MenuItemId};

use super::MenuItem;

/// A menu item in the cart with a quantity.
///
/// `cart_id` is generated when the line is first created and identifies the
/// line for removal and quantity updates; `id` is the menu item's ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub cart_id: CartLineId,
    pub id: MenuItemId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
    pub description: String,
    pub tag: String,
    pub rating: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
}

impl CartItem {
    /// Create a new cart line for `item` with a fresh composite cart ID.
    #[must_use]
    pub fn from_menu_item(item: &MenuItem, quantity: u32) -> Self {
        Self {
            cart_id: Self::generate_cart_id(&item.id),
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            image: item.image.clone(),
            quantity,
            description: item.description.clone(),
            tag: item.tag.clone(),
            rating: item.rating,
            restaurant_name: item.restaurant_name.clone(),
        }
    }

    /// Composite line ID: `<menu item id>-<random suffix>`.
    fn generate_cart_id(id: &MenuItemId) -> CartLineId {
        CartLineId::new(format!("{id}-{}", Uuid::new_v4().simple()))
    }

    /// Whether this line holds the same dish from the same restaurant.
    #[must_use]
    pub fn is_same_item(&self, item: &MenuItem) -> bool {
        self.id == item.id && self.restaurant_name == item.restaurant_name
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}
