//! User preferences: language, onboarding, profile image and location.
//!
//! These are scalar keys read on demand rather than cached lists, so the
//! repository holds no state of its own.

use std::sync::Arc;

use dishdash_core::{LanguageCode, Location};

use crate::error::Result;
use crate::storage::{self, KeyValueStore, keys};

/// Image shown when no profile image has been chosen.
pub const DEFAULT_PROFILE_IMAGE: &str = "assets/profile-placeholder.png";

/// Typed access to the preference keys.
pub struct PreferenceRepository {
    store: Arc<dyn KeyValueStore>,
}

/// Snapshot of every preference, for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceSnapshot {
    pub selected_language: Option<LanguageCode>,
    pub app_language: LanguageCode,
    pub has_seen_onboarding: bool,
    pub profile_image: String,
    pub location: Option<Location>,
    pub location_confirmed: bool,
    pub location_selection_completed: bool,
}

impl PreferenceRepository {
    /// Create a repository over `store`.
    #[must_use]
    pub const fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Language picked by the user, if any. Invalid stored values read as unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the read fails.
    pub async fn selected_language(&self) -> Result<Option<LanguageCode>> {
        self.read_language(keys::SELECTED_LANGUAGE).await
    }

    /// Language the app renders in, defaulting to English.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the read fails.
    pub async fn app_language(&self) -> Result<LanguageCode> {
        Ok(self
            .read_language(keys::CURRENT_APP_LANGUAGE)
            .await?
            .unwrap_or_default())
    }

    /// Pick a language: records it as selected and switches the app to it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if a write fails.
    pub async fn set_language(&self, language: &LanguageCode) -> Result<()> {
        self.store
            .set(keys::SELECTED_LANGUAGE, language.as_str())
            .await?;
        self.store
            .set(keys::CURRENT_APP_LANGUAGE, language.as_str())
            .await?;
        tracing::info!(%language, "Language changed");
        Ok(())
    }

    /// Whether onboarding has been completed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the read fails.
    pub async fn has_seen_onboarding(&self) -> Result<bool> {
        Ok(storage::get_flag(self.store.as_ref(), keys::HAS_SEEN_ONBOARDING).await?)
    }

    /// Record onboarding as completed (or not).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the write fails.
    pub async fn set_seen_onboarding(&self, seen: bool) -> Result<()> {
        Ok(storage::set_flag(self.store.as_ref(), keys::HAS_SEEN_ONBOARDING, seen).await?)
    }

    /// Profile image reference, or [`DEFAULT_PROFILE_IMAGE`].
    ///
    /// Read failures fall back to the placeholder.
    pub async fn profile_image(&self) -> String {
        match self.store.get(keys::USER_PROFILE_IMAGE).await {
            Ok(Some(image)) if !image.trim().is_empty() => image,
            Ok(_) => DEFAULT_PROFILE_IMAGE.to_owned(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read profile image, using placeholder");
                DEFAULT_PROFILE_IMAGE.to_owned()
            }
        }
    }

    /// Store a profile image reference.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the write fails.
    pub async fn set_profile_image(&self, image: &str) -> Result<()> {
        Ok(self.store.set(keys::USER_PROFILE_IMAGE, image.trim()).await?)
    }

    /// Last saved location. Missing or corrupt values read as `None`.
    pub async fn location(&self) -> Option<Location> {
        storage::load_or_default(self.store.as_ref(), keys::USER_LOCATION).await
    }

    /// Last saved location, or [`Location::fallback`].
    pub async fn location_or_fallback(&self) -> Location {
        self.location().await.unwrap_or_else(Location::fallback)
    }

    /// Persist a location.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the write fails.
    pub async fn set_location(&self, location: &Location) -> Result<()> {
        storage::set_json(self.store.as_ref(), keys::USER_LOCATION, location).await?;
        Ok(())
    }

    /// Whether the user confirmed their location.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the read fails.
    pub async fn location_confirmed(&self) -> Result<bool> {
        Ok(storage::get_flag(self.store.as_ref(), keys::LOCATION_CONFIRMED).await?)
    }

    /// Set the location-confirmed flag.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the write fails.
    pub async fn set_location_confirmed(&self, confirmed: bool) -> Result<()> {
        Ok(storage::set_flag(self.store.as_ref(), keys::LOCATION_CONFIRMED, confirmed).await?)
    }

    /// Whether the location selection flow has finished.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the read fails.
    pub async fn location_selection_completed(&self) -> Result<bool> {
        Ok(storage::get_flag(self.store.as_ref(), keys::LOCATION_SELECTION_COMPLETED).await?)
    }

    /// Set the location-selection-completed flag.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the write fails.
    pub async fn set_location_selection_completed(&self, completed: bool) -> Result<()> {
        Ok(
            storage::set_flag(self.store.as_ref(), keys::LOCATION_SELECTION_COMPLETED, completed)
                .await?,
        )
    }

    /// Read every preference at once.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if a read fails.
    pub async fn snapshot(&self) -> Result<PreferenceSnapshot> {
        Ok(PreferenceSnapshot {
            selected_language: self.selected_language().await?,
            app_language: self.app_language().await?,
            has_seen_onboarding: self.has_seen_onboarding().await?,
            profile_image: self.profile_image().await,
            location: self.location().await,
            location_confirmed: self.location_confirmed().await?,
            location_selection_completed: self.location_selection_completed().await?,
        })
    }

    /// Remove every preference key.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if a removal fails.
    pub async fn reset(&self) -> Result<()> {
        for key in [
            keys::SELECTED_LANGUAGE,
            keys::CURRENT_APP_LANGUAGE,
            keys::HAS_SEEN_ONBOARDING,
            keys::USER_PROFILE_IMAGE,
            keys::USER_LOCATION,
            keys::LOCATION_CONFIRMED,
            keys::LOCATION_SELECTION_COMPLETED,
        ] {
            self.store.remove(key).await?;
        }
        tracing::info!("Preferences reset");
        Ok(())
    }

    async fn read_language(&self, key: &str) -> Result<Option<LanguageCode>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        // Older writers stored the code JSON-encoded ("\"en\"").
        let code = raw.trim().trim_matches('"');
        match LanguageCode::parse(code) {
            Ok(language) => Ok(Some(language)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring invalid stored language");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dishdash_core::Coordinates;

    use super::*;
    use crate::storage::MemoryStore;

    fn repo() -> (Arc<MemoryStore>, PreferenceRepository) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), PreferenceRepository::new(store))
    }

    #[tokio::test]
    async fn test_language_defaults_and_set() {
        let (store, prefs) = repo();
        assert!(prefs.selected_language().await.unwrap().is_none());
        assert_eq!(prefs.app_language().await.unwrap().as_str(), "en");

        prefs
            .set_language(&LanguageCode::parse("ar").unwrap())
            .await
            .unwrap();
        assert_eq!(prefs.app_language().await.unwrap().as_str(), "ar");
        assert_eq!(
            store.get(keys::SELECTED_LANGUAGE).await.unwrap().as_deref(),
            Some("ar")
        );
    }

    #[tokio::test]
    async fn test_language_accepts_json_encoded_value() {
        let (store, prefs) = repo();
        store.set(keys::CURRENT_APP_LANGUAGE, "\"fr\"").await.unwrap();
        assert_eq!(prefs.app_language().await.unwrap().as_str(), "fr");

        store.set(keys::CURRENT_APP_LANGUAGE, "klingon").await.unwrap();
        assert_eq!(prefs.app_language().await.unwrap().as_str(), "en");
    }

    #[tokio::test]
    async fn test_profile_image_fallback() {
        let (_store, prefs) = repo();
        assert_eq!(prefs.profile_image().await, DEFAULT_PROFILE_IMAGE);
        prefs.set_profile_image("file:///me.jpg").await.unwrap();
        assert_eq!(prefs.profile_image().await, "file:///me.jpg");
    }

    #[tokio::test]
    async fn test_location_round_trip_and_corrupt_fallback() {
        let (store, prefs) = repo();
        assert!(prefs.location_or_fallback().await.is_fallback());

        let location = Location::new(Coordinates::new(24.7, 46.7).unwrap(), "King Fahd Rd");
        prefs.set_location(&location).await.unwrap();
        assert_eq!(prefs.location().await, Some(location));

        store.set(keys::USER_LOCATION, "not json").await.unwrap();
        assert!(prefs.location().await.is_none());
    }

    #[tokio::test]
    async fn test_flags_and_reset() {
        let (store, prefs) = repo();
        prefs.set_seen_onboarding(true).await.unwrap();
        prefs.set_location_confirmed(true).await.unwrap();
        prefs.set_location_selection_completed(true).await.unwrap();

        let snapshot = prefs.snapshot().await.unwrap();
        assert!(snapshot.has_seen_onboarding);
        assert!(snapshot.location_confirmed);
        assert!(snapshot.location_selection_completed);

        prefs.reset().await.unwrap();
        assert!(!prefs.has_seen_onboarding().await.unwrap());
        assert!(store.keys().await.unwrap().is_empty());
    }
}
