//! Status enums for orders and payments.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Orders are created `Pending`. A pending order can be cancelled by the
/// user or marked delivered; both end states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether a transition from `self` to `next` is allowed.
    ///
    /// Re-applying the current status is allowed and is a no-op.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, _)
                | (Self::Delivered, Self::Delivered)
                | (Self::Cancelled, Self::Cancelled)
        )
    }

    /// Whether the status is final.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cash,
    /// Credit or debit card.
    Card,
    /// Mobile wallet.
    Wallet,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Card => write!(f, "card"),
            Self::Wallet => write!(f, "wallet"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "wallet" => Ok(Self::Wallet),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}
