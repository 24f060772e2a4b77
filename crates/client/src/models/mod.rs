//! Domain models persisted in the key-value store.
//!
//! Field names are serialized camelCase so stored blobs keep the shape
//! the rest of the app reads.

pub mod address;
pub mod cart;
pub mod favorite;
pub mod menu;
pub mod order;

pub use address::{Address, AddressChanges, NewAddress};
pub use cart::CartItem;
pub use favorite::FavoriteItem;
pub use menu::{MenuItem, Restaurant};
pub use order::{Order, OrderSummary};
