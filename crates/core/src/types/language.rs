//! App language preference.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`LanguageCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LanguageError {
    /// Not a two-letter ASCII code.
    #[error("language code must be two ASCII letters (got '{0}')")]
    Invalid(String),
}

/// A two-letter ISO 639-1 language code, stored lowercase.
///
/// ```
/// use dishdash_core::LanguageCode;
///
/// assert_eq!(LanguageCode::parse("AR").unwrap().as_str(), "ar");
/// assert!(LanguageCode::parse("english").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parse a language code.
    ///
    /// # Errors
    ///
    /// Returns an error unless the input is exactly two ASCII letters.
    pub fn parse(s: &str) -> Result<Self, LanguageError> {
        let trimmed = s.trim();
        if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LanguageError::Invalid(s.to_owned()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the language is written right to left.
    #[must_use]
    pub fn is_rtl(&self) -> bool {
        matches!(self.0.as_str(), "ar" | "he" | "fa" | "ur")
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self("en".to_owned())
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for LanguageCode {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = LanguageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}
