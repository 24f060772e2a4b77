//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog and cart prices are plain [`Decimal`] amounts in the store's
//! currency. [`Price`] pairs an amount with a currency for display and
//! parses user-facing strings such as `"$12.50"`.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The amount is negative.
    #[error("price cannot be negative")]
    Negative,
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the default currency.
    #[must_use]
    pub fn from_amount(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }

    /// Create a price from an integer number of cents.
    #[must_use]
    pub fn from_cents(cents: i64, currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::new(cents, 2), currency_code)
    }

    /// Parse a price string, accepting an optional leading currency symbol.
    ///
    /// The currency is inferred from the symbol; a bare number uses the
    /// default currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a number, or negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let (currency_code, number) = CurrencyCode::strip_symbol(trimmed);
        let amount: Decimal = number
            .trim()
            .replace(',', "")
            .parse()
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;

        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        Ok(Self::new(amount, currency_code))
    }

    /// Amount rounded half-up to two decimal places.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.currency_code.symbol(), self.rounded())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO 4217 code for the currency.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// Split a leading currency symbol off a price string.
    fn strip_symbol(s: &str) -> (Self, &str) {
        if let Some(rest) = s.strip_prefix('€') {
            (Self::EUR, rest)
        } else if let Some(rest) = s.strip_prefix('£') {
            (Self::GBP, rest)
        } else if let Some(rest) = s.strip_prefix('$') {
            (Self::USD, rest)
        } else {
            (Self::default(), s)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_symbol() {
        let price = Price::parse("$12.50").unwrap();
        assert_eq!(price.amount, Decimal::new(1250, 2));
        assert_eq!(price.currency_code, CurrencyCode::USD);

        let price = Price::parse("€3").unwrap();
        assert_eq!(price.currency_code, CurrencyCode::EUR);
    }

    #[test]
    fn test_parse_bare_number() {
        let price = Price::parse(" 1,299.99 ").unwrap();
        assert_eq!(price.amount, Decimal::new(129_999, 2));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert!(matches!(Price::parse("abc"), Err(PriceError::Invalid(_))));
        assert_eq!(Price::parse("-1.00"), Err(PriceError::Negative));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(999, CurrencyCode::USD).to_string(), "$9.99");
        assert_eq!(
            Price::new(Decimal::new(12345, 3), CurrencyCode::GBP).to_string(),
            "£12.35"
        );
    }
}
