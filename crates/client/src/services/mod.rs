//! Services that coordinate repositories or talk to the outside world.

pub mod cart;
pub mod checkout;
pub mod geocoding;

pub use cart::CartService;
pub use checkout::{CheckoutRequest, CheckoutService};
pub use geocoding::{GeocodingClient, GeocodingError};
