//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. IDs are string-backed
//! because the key-value blobs they round-trip through store them as strings.

use chrono::{DateTime, Utc};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use dishdash_core::define_id;
/// define_id!(DriverId);
/// define_id!(TicketId);
///
/// let driver_id = DriverId::new("d-1");
/// let ticket_id = TicketId::new("d-1");
///
/// // These are different types, so this won't compile:
/// // let _: DriverId = ticket_id;
/// assert_eq!(driver_id.as_str(), ticket_id.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(RestaurantId);
define_id!(MenuItemId);
define_id!(CartLineId);
define_id!(OrderId);
define_id!(AddressId);

impl OrderId {
    /// Create an order ID derived from a timestamp (milliseconds since epoch).
    #[must_use]
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis().to_string())
    }
}

impl AddressId {
    /// Create an address ID derived from a timestamp (milliseconds since epoch).
    #[must_use]
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis().to_string())
    }
}
