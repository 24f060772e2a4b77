//! Unified error handling with Sentry integration.
//!
//! Provides the client-wide `AppError` type. Repositories and services
//! return `Result<T, AppError>`; front ends call [`AppError::report`] once
//! at the edge so server-side failures reach Sentry exactly once.

use thiserror::Error;

use dishdash_core::OrderStatus;

use crate::services::geocoding::GeocodingError;
use crate::storage::StorageError;

/// Application-level error type for the client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Key-value storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Reverse geocoding failed.
    #[error("Geocoding error: {0}")]
    Geocoding(#[from] GeocodingError),

    /// Referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input failed validation.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Order status change not allowed from the current status.
    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}

impl AppError {
    /// Whether the error is caused by user input rather than the environment.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Validation(_) | Self::EmptyCart | Self::InvalidTransition { .. }
        )
    }

    /// Log the error and, for environment failures, capture it to Sentry.
    pub fn report(&self) {
        if self.is_user_error() {
            tracing::debug!(error = %self, "Rejected request");
            return;
        }

        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Operation failed"
        );
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error. Without an initialized Sentry client this is a no-op.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("item_id", "7")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 123".to_string());
        assert_eq!(err.to_string(), "Not found: order 123");

        let err = AppError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Cancelled,
        };
        assert_eq!(
            err.to_string(),
            "Cannot change order status from delivered to cancelled"
        );
    }

    #[test]
    fn test_user_errors() {
        assert!(AppError::EmptyCart.is_user_error());
        assert!(AppError::Validation("bad".to_string()).is_user_error());
        assert!(!AppError::Storage(StorageError::InvalidKey("x".to_string())).is_user_error());
    }
}
