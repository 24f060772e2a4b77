//! Core types for DishDash.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod language;
pub mod location;
pub mod phone;
pub mod price;
pub mod status;

pub use id::*;
pub use language::{LanguageCode, LanguageError};
pub use location::{Coordinates, CoordinatesError, Location};
pub use phone::{PhoneError, PhoneNumber};
pub use price::{CurrencyCode, Price, PriceError};
pub use status::*;
