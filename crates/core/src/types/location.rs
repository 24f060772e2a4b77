//! Geographic coordinates and resolved delivery locations.

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing [`Coordinates`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum CoordinatesError {
    /// Latitude outside -90..=90 or not finite.
    #[error("latitude must be between -90 and 90 (got {0})")]
    InvalidLatitude(f64),
    /// Longitude outside -180..=180 or not finite.
    #[error("longitude must be between -180 and 180 (got {0})")]
    InvalidLongitude(f64),
}

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting out-of-range or non-finite values.
    ///
    /// # Errors
    ///
    /// Returns an error if either component is out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinatesError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Fixed-precision key (1e-4 degrees, roughly 11 m) for cache lookups.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // bounded by the range check in `new`
    pub fn grid_key(&self) -> (i32, i32) {
        (
            (self.latitude * 10_000.0).round() as i32,
            (self.longitude * 10_000.0).round() as i32,
        )
    }
}

/// A resolved location: coordinates plus a human-readable address.
///
/// This is the shape persisted under the `userLocation` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Display address as returned by reverse geocoding.
    pub address: String,
    /// City or locality, when the geocoder reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl Location {
    /// Address shown when no real location is known.
    pub const FALLBACK_ADDRESS: &'static str = "Current Location";

    /// Build a location from validated coordinates.
    #[must_use]
    pub fn new(coordinates: Coordinates, address: impl Into<String>) -> Self {
        Self {
            latitude: coordinates.latitude(),
            longitude: coordinates.longitude(),
            address: address.into(),
            city: None,
        }
    }

    /// Placeholder location used when lookup or storage fails.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            address: Self::FALLBACK_ADDRESS.to_owned(),
            city: None,
        }
    }

    /// Placeholder address at known coordinates.
    #[must_use]
    pub fn fallback_at(coordinates: Coordinates) -> Self {
        Self::new(coordinates, Self::FALLBACK_ADDRESS)
    }

    /// The coordinates of this location, if they are valid.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::new(self.latitude, self.longitude).ok()
    }

    /// Whether this is the placeholder address.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.address == Self::FALLBACK_ADDRESS
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_range() {
        assert!(Coordinates::new(24.7136, 46.6753).is_ok());
        assert!(Coordinates::new(-90.0, 180.0).is_ok());
        assert_eq!(
            Coordinates::new(90.5, 0.0),
            Err(CoordinatesError::InvalidLatitude(90.5))
        );
        assert!(matches!(
            Coordinates::new(0.0, f64::NAN),
            Err(CoordinatesError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_grid_key_rounds_nearby_points_together() {
        let a = Coordinates::new(24.713_61, 46.675_29).unwrap();
        let b = Coordinates::new(24.713_64, 46.675_31).unwrap();
        assert_eq!(a.grid_key(), b.grid_key());
    }

    #[test]
    fn test_location_wire_format() {
        let location = Location::new(Coordinates::new(1.5, 2.5).unwrap(), "Main St");
        let json = serde_json::to_value(&location).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"latitude": 1.5, "longitude": 2.5, "address": "Main St"})
        );
    }

    #[test]
    fn test_fallback() {
        assert!(Location::fallback().is_fallback());
        let at = Location::fallback_at(Coordinates::new(10.0, 20.0).unwrap());
        assert!(at.is_fallback());
        assert!((at.latitude - 10.0).abs() < f64::EPSILON);
    }
}
