//! Contact phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains a character that is not a digit or separator.
    #[error("phone number contains invalid character '{0}'")]
    InvalidCharacter(char),
    /// Too few or too many digits.
    #[error("phone number must have {min}-{max} digits (got {got})")]
    InvalidLength {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
        /// Digits found in the input.
        got: usize,
    },
}

/// A contact phone number.
///
/// Stored as entered (trimmed) so it displays the way the user typed it;
/// validation only checks the digits.
///
/// ## Constraints
///
/// - 7-15 digits (E.164 maximum)
/// - Optional leading `+`
/// - Spaces, dashes, dots and parentheses are accepted as separators
///
/// ## Examples
///
/// ```
/// use dishdash_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("+1 (555) 010-2030").is_ok());
/// assert!(PhoneNumber::parse("0501234567").is_ok());
///
/// assert!(PhoneNumber::parse("").is_err());        // empty
/// assert!(PhoneNumber::parse("12345").is_err());   // too short
/// assert!(PhoneNumber::parse("555-CALL").is_err()); // letters
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 7;
    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Contains characters other than digits, separators, or a leading `+`
    /// - Has fewer than 7 or more than 15 digits
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        let mut digits = 0;
        for (i, c) in trimmed.chars().enumerate() {
            match c {
                '0'..='9' => digits += 1,
                '+' if i == 0 => {}
                ' ' | '-' | '.' | '(' | ')' => {}
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }

        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits) {
            return Err(PhoneError::InvalidLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
                got: digits,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the phone number as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns only the digits (and a leading `+` if present).
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0
            .chars()
            .enumerate()
            .filter(|&(i, c)| c.is_ascii_digit() || (i == 0 && c == '+'))
            .map(|(_, c)| c)
            .collect()
    }

    /// Consumes the `PhoneNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_numbers() {
        assert!(PhoneNumber::parse("5550102").is_ok());
        assert!(PhoneNumber::parse("+966 50 123 4567").is_ok());
        assert!(PhoneNumber::parse("(555) 010-2030").is_ok());
        assert!(PhoneNumber::parse("555.010.2030").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(PhoneNumber::parse("   "), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert_eq!(
            PhoneNumber::parse("555-01x2030"),
            Err(PhoneError::InvalidCharacter('x'))
        );
        // '+' is only allowed in the leading position
        assert_eq!(
            PhoneNumber::parse("555+0102030"),
            Err(PhoneError::InvalidCharacter('+'))
        );
    }

    #[test]
    fn test_parse_length() {
        assert!(matches!(
            PhoneNumber::parse("123456"),
            Err(PhoneError::InvalidLength { got: 6, .. })
        ));
        assert!(matches!(
            PhoneNumber::parse("1234567890123456"),
            Err(PhoneError::InvalidLength { got: 16, .. })
        ));
    }

    #[test]
    fn test_normalized() {
        let phone = PhoneNumber::parse(" +1 (555) 010-2030 ").unwrap();
        assert_eq!(phone.as_str(), "+1 (555) 010-2030");
        assert_eq!(phone.normalized(), "+15550102030");
    }

    #[test]
    fn test_deserialize_validates() {
        let phone: PhoneNumber = serde_json::from_str(r#"" 555-010-2030 ""#).unwrap();
        assert_eq!(phone.as_str(), "555-010-2030");
        assert_eq!(serde_json::to_string(&phone).unwrap(), r#""555-010-2030""#);

        assert!(serde_json::from_str::<PhoneNumber>(r#""12""#).is_err());
        assert!(serde_json::from_str::<PhoneNumber>(r#""call me""#).is_err());
    }
}
