//! Built-in restaurant catalog.

use rust_decimal::Decimal;

use dishdash_core::{MenuItemId, RestaurantId};

use crate::models::{MenuItem, Restaurant};

struct Dish {
    id: &'static str,
    name: &'static str,
    cents: i64,
    image: &'static str,
    description: &'static str,
    tag: &'static str,
    rating_tenths: i64,
}

struct Listing {
    id: &'static str,
    name: &'static str,
    cuisine: &'static str,
    rating_tenths: i64,
    delivery_time: &'static str,
    image: &'static str,
    dishes: &'static [Dish],
}

const LISTINGS: &[Listing] = &[
    Listing {
        id: "burger-barn",
        name: "Burger Barn",
        cuisine: "American",
        rating_tenths: 46,
        delivery_time: "20-30 min",
        image: "restaurants/burger-barn.jpg",
        dishes: &[
            Dish {
                id: "bb-1",
                name: "Classic Cheeseburger",
                cents: 899,
                image: "food/cheeseburger.jpg",
                description: "Beef patty, cheddar, lettuce, tomato and house sauce",
                tag: "Burger",
                rating_tenths: 47,
            },
            Dish {
                id: "bb-2",
                name: "Double Smash Burger",
                cents: 1249,
                image: "food/smash-burger.jpg",
                description: "Two smashed patties, American cheese, pickles, onions",
                tag: "Burger",
                rating_tenths: 48,
            },
            Dish {
                id: "bb-3",
                name: "Crispy Fries",
                cents: 349,
                image: "food/fries.jpg",
                description: "Skin-on fries with sea salt",
                tag: "Sides",
                rating_tenths: 44,
            },
            Dish {
                id: "bb-4",
                name: "Vanilla Milkshake",
                cents: 499,
                image: "food/milkshake.jpg",
                description: "Thick vanilla bean shake",
                tag: "Drinks",
                rating_tenths: 45,
            },
        ],
    },
    Listing {
        id: "pizza-palace",
        name: "Pizza Palace",
        cuisine: "Italian",
        rating_tenths: 45,
        delivery_time: "25-35 min",
        image: "restaurants/pizza-palace.jpg",
        dishes: &[
            Dish {
                id: "pp-1",
                name: "Margherita Pizza",
                cents: 1099,
                image: "food/margherita.jpg",
                description: "San Marzano tomato, fresh mozzarella, basil",
                tag: "Pizza",
                rating_tenths: 46,
            },
            Dish {
                id: "pp-2",
                name: "Pepperoni Pizza",
                cents: 1299,
                image: "food/pepperoni.jpg",
                description: "Tomato, mozzarella, double pepperoni",
                tag: "Pizza",
                rating_tenths: 47,
            },
            Dish {
                id: "pp-3",
                name: "Garlic Knots",
                cents: 599,
                image: "food/garlic-knots.jpg",
                description: "Six knots brushed with garlic butter",
                tag: "Sides",
                rating_tenths: 43,
            },
            Dish {
                id: "pp-4",
                name: "Tiramisu",
                cents: 699,
                image: "food/tiramisu.jpg",
                description: "Espresso-soaked ladyfingers and mascarpone",
                tag: "Dessert",
                rating_tenths: 49,
            },
        ],
    },
    Listing {
        id: "sushi-zen",
        name: "Sushi Zen",
        cuisine: "Japanese",
        rating_tenths: 48,
        delivery_time: "30-40 min",
        image: "restaurants/sushi-zen.jpg",
        dishes: &[
            Dish {
                id: "sz-1",
                name: "Salmon Nigiri",
                cents: 799,
                image: "food/salmon-nigiri.jpg",
                description: "Four pieces of fresh Atlantic salmon over rice",
                tag: "Sushi",
                rating_tenths: 48,
            },
            Dish {
                id: "sz-2",
                name: "Dragon Roll",
                cents: 1399,
                image: "food/dragon-roll.jpg",
                description: "Shrimp tempura, avocado, eel sauce",
                tag: "Sushi",
                rating_tenths: 49,
            },
            Dish {
                id: "sz-3",
                name: "Miso Soup",
                cents: 299,
                image: "food/miso-soup.jpg",
                description: "Tofu, wakame and scallions",
                tag: "Soup",
                rating_tenths: 42,
            },
            Dish {
                id: "sz-4",
                name: "Vegetable Gyoza",
                cents: 649,
                image: "food/gyoza.jpg",
                description: "Pan-fried dumplings with ponzu",
                tag: "Vegan",
                rating_tenths: 44,
            },
        ],
    },
    Listing {
        id: "green-bowl",
        name: "Green Bowl",
        cuisine: "Healthy",
        rating_tenths: 44,
        delivery_time: "15-25 min",
        image: "restaurants/green-bowl.jpg",
        dishes: &[
            Dish {
                id: "gb-1",
                name: "Falafel Bowl",
                cents: 1049,
                image: "food/falafel-bowl.jpg",
                description: "Falafel, hummus, tabbouleh, tahini",
                tag: "Vegan",
                rating_tenths: 46,
            },
            Dish {
                id: "gb-2",
                name: "Chicken Caesar Salad",
                cents: 1149,
                image: "food/caesar.jpg",
                description: "Grilled chicken, romaine, parmesan, croutons",
                tag: "Salad",
                rating_tenths: 43,
            },
            Dish {
                id: "gb-3",
                name: "Acai Bowl",
                cents: 899,
                image: "food/acai.jpg",
                description: "Acai, banana, granola, honey",
                tag: "Dessert",
                rating_tenths: 45,
            },
            Dish {
                id: "gb-4",
                name: "Cold-Pressed Juice",
                cents: 599,
                image: "food/juice.jpg",
                description: "Apple, kale, ginger and lemon",
                tag: "Drinks",
                rating_tenths: 41,
            },
        ],
    },
];

/// Build the catalog from the embedded listings.
pub(super) fn restaurants() -> Vec<Restaurant> {
    LISTINGS
        .iter()
        .map(|listing| Restaurant {
            id: RestaurantId::new(listing.id),
            name: listing.name.to_owned(),
            cuisine: listing.cuisine.to_owned(),
            rating: Decimal::new(listing.rating_tenths, 1),
            delivery_time: listing.delivery_time.to_owned(),
            image: listing.image.to_owned(),
            menu: listing
                .dishes
                .iter()
                .map(|dish| MenuItem {
                    id: MenuItemId::new(dish.id),
                    name: dish.name.to_owned(),
                    price: Decimal::new(dish.cents, 2),
                    image: dish.image.to_owned(),
                    description: dish.description.to_owned(),
                    tag: dish.tag.to_owned(),
                    rating: Decimal::new(dish.rating_tenths, 1),
                    restaurant_name: Some(listing.name.to_owned()),
                })
                .collect(),
        })
        .collect()
}
