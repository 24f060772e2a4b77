//! Repositories over the device key-value store.
//!
//! # Keys
//!
//! Each list repository owns one key holding a JSON array:
//!
//! - `orders` - [`OrderRepository`]
//! - `favorites` - [`FavoriteRepository`]
//! - `userAddresses` - [`AddressRepository`]
//!
//! [`PreferenceRepository`] owns the scalar keys (language, onboarding,
//! profile image, location flags).
//!
//! # Consistency
//!
//! List repositories load the whole array once at startup and keep it
//! behind a `tokio::sync::Mutex`. Every mutation holds the lock across
//! modify-and-write, so writes from one process never interleave. Nothing
//! guards against a second process writing the same directory.

pub mod addresses;
pub mod favorites;
pub mod orders;
pub mod preferences;

pub use addresses::AddressRepository;
pub use favorites::FavoriteRepository;
pub use orders::OrderRepository;
pub use preferences::PreferenceRepository;
