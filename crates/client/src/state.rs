//! Application state shared across front ends.

use std::sync::Arc;

use dishdash_core::{Coordinates, Location};

use crate::catalog::Catalog;
use crate::config::ClientConfig;
use crate::db::{AddressRepository, FavoriteRepository, OrderRepository, PreferenceRepository};
use crate::error::Result;
use crate::services::{CartService, CheckoutService, GeocodingClient};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

/// Counts reported by [`AppState::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub orders: usize,
    pub favorites: usize,
    pub addresses: usize,
    pub cart_lines: usize,
}

/// Application state shared across the app.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// store, repositories and services.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ClientConfig,
    store: Arc<dyn KeyValueStore>,
    orders: Arc<OrderRepository>,
    favorites: Arc<FavoriteRepository>,
    addresses: Arc<AddressRepository>,
    preferences: PreferenceRepository,
    cart: Arc<CartService>,
    checkout: CheckoutService,
    geocoder: GeocodingClient,
}

impl AppState {
    /// Create state backed by files under `config.data_dir`.
    ///
    /// Nothing is read until [`Self::load`] is called.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Geocoding` if the HTTP client cannot be built.
    pub fn open(config: ClientConfig) -> Result<Self> {
        let store = Arc::new(FileStore::new(config.data_dir.clone()));
        Self::with_store(config, store)
    }

    /// Create state backed by a process-local store.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Geocoding` if the HTTP client cannot be built.
    pub fn in_memory(config: ClientConfig) -> Result<Self> {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Create state over an arbitrary store.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Geocoding` if the HTTP client cannot be built.
    pub fn with_store(config: ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let geocoder = GeocodingClient::new(&config.geocoder)?;

        let orders = Arc::new(OrderRepository::new(store.clone()));
        let favorites = Arc::new(FavoriteRepository::new(store.clone()));
        let addresses = Arc::new(AddressRepository::new(store.clone()));
        let preferences = PreferenceRepository::new(store.clone());
        let cart = Arc::new(if config.persist_cart {
            CartService::persistent(store.clone())
        } else {
            CartService::in_memory()
        });
        let checkout = CheckoutService::new(
            cart.clone(),
            orders.clone(),
            addresses.clone(),
            config.delivery_fee,
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                orders,
                favorites,
                addresses,
                preferences,
                cart,
                checkout,
                geocoder,
            }),
        })
    }

    /// Read persisted lists into memory.
    ///
    /// Missing or unreadable data loads as empty; failures are logged, not
    /// returned.
    pub async fn load(&self) -> LoadSummary {
        let (orders, favorites, addresses, cart_lines) = tokio::join!(
            self.inner.orders.load(),
            self.inner.favorites.load(),
            self.inner.addresses.load(),
            self.inner.cart.restore(),
        );
        let summary = LoadSummary {
            orders,
            favorites,
            addresses,
            cart_lines,
        };
        tracing::debug!(?summary, "State loaded");
        summary
    }

    /// Resolve `coordinates` to an address and save it as the user's
    /// confirmed location.
    ///
    /// Geocoding failures fall back to a placeholder address at the same
    /// coordinates; only storage failures are returned.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the location cannot be saved.
    pub async fn locate_and_save(&self, coordinates: Coordinates) -> Result<Location> {
        let location = self.inner.geocoder.reverse_or_fallback(coordinates).await;
        self.inner.preferences.set_location(&location).await?;
        self.inner.preferences.set_location_confirmed(true).await?;
        tracing::info!(address = %location.address, "Location saved");
        Ok(location)
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the underlying key-value store.
    #[must_use]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.inner.store.as_ref()
    }

    /// The built-in restaurant catalog.
    #[must_use]
    pub fn catalog(&self) -> &'static Catalog {
        Catalog::builtin()
    }

    #[must_use]
    pub fn orders(&self) -> &OrderRepository {
        &self.inner.orders
    }

    #[must_use]
    pub fn favorites(&self) -> &FavoriteRepository {
        &self.inner.favorites
    }

    #[must_use]
    pub fn addresses(&self) -> &AddressRepository {
        &self.inner.addresses
    }

    #[must_use]
    pub fn preferences(&self) -> &PreferenceRepository {
        &self.inner.preferences
    }

    #[must_use]
    pub fn cart(&self) -> &CartService {
        &self.inner.cart
    }

    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }

    #[must_use]
    pub fn geocoder(&self) -> &GeocodingClient {
        &self.inner.geocoder
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::AppError;
    use crate::storage::keys;

    fn offline_config() -> ClientConfig {
        let mut config = ClientConfig::with_data_dir("unused");
        config.geocoder.url = "http://127.0.0.1:1/reverse".to_owned();
        config.geocoder.timeout = Duration::from_secs(2);
        config
    }

    #[tokio::test]
    async fn test_load_on_empty_store() {
        let state = AppState::in_memory(offline_config()).unwrap();
        assert_eq!(state.load().await, LoadSummary::default());
    }

    #[test]
    fn test_invalid_user_agent_is_geocoding_error() {
        let mut config = offline_config();
        config.geocoder.user_agent = "dishdash\n".to_owned();

        let result = AppState::in_memory(config);
        assert!(matches!(result, Err(AppError::Geocoding(_))));
    }

    #[tokio::test]
    async fn test_locate_and_save_falls_back_and_persists() {
        let state = AppState::in_memory(offline_config()).unwrap();
        let coordinates = Coordinates::new(40.7128, -74.006).unwrap();

        let location = state.locate_and_save(coordinates).await.unwrap();
        assert!(location.is_fallback());

        assert_eq!(state.preferences().location().await, Some(location));
        assert!(state.preferences().location_confirmed().await.unwrap());
        assert!(state.store().get(keys::USER_LOCATION).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unpersisted_cart_leaves_store_untouched() {
        let mut config = offline_config();
        config.persist_cart = false;
        let state = AppState::in_memory(config).unwrap();

        let item = state.catalog().items().next().unwrap();
        state.cart().add(item, 1).await.unwrap();
        assert!(state.store().get(keys::CART).await.unwrap().is_none());
    }
}
