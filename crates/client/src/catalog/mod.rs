//! Static restaurant and menu catalog.
//!
//! The catalog ships with the app; there is no backend to fetch it from.

mod data;

use std::sync::LazyLock;

use dishdash_core::{MenuItemId, RestaurantId};

use crate::models::{MenuItem, Restaurant};

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| Catalog::new(data::restaurants()));

/// Read-only view over a set of restaurants.
#[derive(Debug, Clone)]
pub struct Catalog {
    restaurants: Vec<Restaurant>,
}

impl Catalog {
    /// Create a catalog from an explicit restaurant list.
    #[must_use]
    pub const fn new(restaurants: Vec<Restaurant>) -> Self {
        Self { restaurants }
    }

    /// The catalog embedded in the binary.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// All restaurants, in listing order.
    #[must_use]
    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    /// Look up a restaurant by ID.
    #[must_use]
    pub fn restaurant(&self, id: &RestaurantId) -> Option<&Restaurant> {
        self.restaurants.iter().find(|r| &r.id == id)
    }

    /// A restaurant's menu, if the restaurant exists.
    #[must_use]
    pub fn menu(&self, restaurant_id: &RestaurantId) -> Option<&[MenuItem]> {
        self.restaurant(restaurant_id).map(|r| r.menu.as_slice())
    }

    /// Look up one item on one restaurant's menu.
    #[must_use]
    pub fn find_item(&self, restaurant_id: &RestaurantId, item_id: &MenuItemId) -> Option<&MenuItem> {
        self.restaurant(restaurant_id)?.item(item_id)
    }

    /// Look up an item by ID across every menu.
    #[must_use]
    pub fn find_item_anywhere(&self, item_id: &MenuItemId) -> Option<&MenuItem> {
        self.items().find(|item| &item.id == item_id)
    }

    /// Every menu item across all restaurants.
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.restaurants.iter().flat_map(|r| r.menu.iter())
    }

    /// Case-insensitive search over item name and tag, and restaurant name
    /// and cuisine. A restaurant match returns its whole menu.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&MenuItem> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.restaurants
            .iter()
            .flat_map(|restaurant| {
                let restaurant_hit = restaurant.name.to_lowercase().contains(&needle)
                    || restaurant.cuisine.to_lowercase().contains(&needle);
                let needle = needle.clone();
                restaurant.menu.iter().filter(move |item| {
                    restaurant_hit
                        || item.name.to_lowercase().contains(&needle)
                        || item.tag.to_lowercase().contains(&needle)
                })
            })
            .collect()
    }

    /// Items whose tag matches exactly (case-insensitive).
    #[must_use]
    pub fn by_tag(&self, tag: &str) -> Vec<&MenuItem> {
        self.items()
            .filter(|item| item.tag.eq_ignore_ascii_case(tag.trim()))
            .collect()
    }

    /// Highest-rated items, best first. Ties keep listing order.
    #[must_use]
    pub fn popular(&self, limit: usize) -> Vec<&MenuItem> {
        let mut items: Vec<&MenuItem> = self.items().collect();
        items.sort_by(|a, b| b.rating.cmp(&a.rating));
        items.truncate(limit);
        items
    }

    /// Distinct tags in first-seen order.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = Vec::new();
        for item in self.items() {
            if !tags.contains(&item.tag.as_str()) {
                tags.push(&item.tag);
            }
        }
        tags
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.restaurants().len(), 4);
        for restaurant in catalog.restaurants() {
            assert!(!restaurant.menu.is_empty());
            for item in &restaurant.menu {
                assert_eq!(item.restaurant_name.as_deref(), Some(restaurant.name.as_str()));
            }
        }
    }

    #[test]
    fn test_item_ids_are_unique() {
        let catalog = Catalog::builtin();
        let mut ids: Vec<&str> = catalog.items().map(|item| item.id.as_str()).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_find_item() {
        let catalog = Catalog::builtin();
        let item = catalog
            .find_item(&RestaurantId::new("pizza-palace"), &MenuItemId::new("pp-2"))
            .unwrap();
        assert_eq!(item.name, "Pepperoni Pizza");

        assert!(
            catalog
                .find_item(&RestaurantId::new("burger-barn"), &MenuItemId::new("pp-2"))
                .is_none()
        );
        assert!(catalog.menu(&RestaurantId::new("nowhere")).is_none());
    }

    #[test]
    fn test_search() {
        let catalog = Catalog::builtin();

        let pizza = catalog.search("PIZZA");
        assert_eq!(pizza.len(), 4, "restaurant name match returns the whole menu");

        let vegan = catalog.search("vegan");
        assert_eq!(vegan.len(), 2);

        assert!(catalog.search("   ").is_empty());
        assert!(catalog.search("zzz-no-match").is_empty());
    }

    #[test]
    fn test_by_tag_and_tags() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.by_tag("drinks").len(), 2);
        assert_eq!(catalog.tags()[0], "Burger");
    }

    #[test]
    fn test_popular() {
        let catalog = Catalog::builtin();
        let top = catalog.popular(3);
        assert_eq!(top.len(), 3);
        assert!(top[0].rating >= top[1].rating && top[1].rating >= top[2].rating);
        assert_eq!(top[0].name, "Tiramisu");
    }
}
