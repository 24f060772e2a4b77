//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `DISHDASH_DATA_DIR` - Key-value store directory (default: platform data dir + `dishdash`)
//! - `DISHDASH_GEOCODER_URL` - Reverse-geocoding endpoint (default: Nominatim)
//! - `DISHDASH_GEOCODER_USER_AGENT` - User-Agent sent to the geocoder
//! - `DISHDASH_GEOCODER_API_KEY` - API key for geocoders that require one
//! - `DISHDASH_GEOCODER_TIMEOUT_SECS` - HTTP timeout (default: 10)
//! - `DISHDASH_GEOCODER_CACHE_TTL_SECS` - Lookup cache lifetime (default: 3600)
//! - `DISHDASH_DELIVERY_FEE` - Flat delivery fee (default: 2.99)
//! - `DISHDASH_PERSIST_CART` - Keep the cart across restarts (default: true)
//! - `DISHDASH_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use dishdash_core::Price;

const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/reverse";
const DEFAULT_DELIVERY_FEE: &str = "2.99";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Directory of the file-backed key-value store
    pub data_dir: PathBuf,
    /// Reverse-geocoding configuration
    pub geocoder: GeocoderConfig,
    /// Flat delivery fee added to every order
    pub delivery_fee: Decimal,
    /// Persist the cart under the `cart` key
    pub persist_cart: bool,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Reverse-geocoding service configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeocoderConfig {
    /// Endpoint queried with `lat`/`lon` parameters
    pub url: String,
    /// User-Agent header (Nominatim rejects requests without one)
    pub user_agent: String,
    /// Optional API key, sent as the `key` query parameter
    pub api_key: Option<SecretString>,
    /// Request timeout
    pub timeout: Duration,
    /// How long lookups stay cached
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for GeocoderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocoderConfig")
            .field("url", &self.url)
            .field("user_agent", &self.user_agent)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_GEOCODER_URL.to_string(),
            user_agent: default_user_agent(),
            api_key: None,
            timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(3600),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid, or if the
    /// geocoder API key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(&Vars(&|key: &str| std::env::var(key).ok()))
    }

    fn from_vars(vars: &Vars<'_>) -> Result<Self, ConfigError> {
        let data_dir = vars
            .optional("DISHDASH_DATA_DIR")
            .map_or_else(default_data_dir, PathBuf::from);
        let fee = vars.or_default("DISHDASH_DELIVERY_FEE", DEFAULT_DELIVERY_FEE);
        let delivery_fee = Price::parse(&fee)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("DISHDASH_DELIVERY_FEE".to_string(), e.to_string())
            })?
            .amount;
        let persist_cart = vars.parse_bool("DISHDASH_PERSIST_CART", true)?;
        let log_format = match vars.or_default("DISHDASH_LOG_FORMAT", "pretty").as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "DISHDASH_LOG_FORMAT".to_string(),
                    format!("expected 'pretty' or 'json', got '{other}'"),
                ));
            }
        };

        Ok(Self {
            data_dir,
            geocoder: GeocoderConfig::from_vars(vars)?,
            delivery_fee,
            persist_cart,
            log_format,
            sentry_dsn: vars.optional("SENTRY_DSN"),
        })
    }

    /// Configuration for tests and embedding: everything at defaults,
    /// storing data under `data_dir`.
    #[must_use]
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            geocoder: GeocoderConfig::default(),
            delivery_fee: Decimal::new(299, 2),
            persist_cart: true,
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
        }
    }
}

impl GeocoderConfig {
    fn from_vars(vars: &Vars<'_>) -> Result<Self, ConfigError> {
        let url = vars.or_default("DISHDASH_GEOCODER_URL", DEFAULT_GEOCODER_URL);
        Url::parse(&url).map_err(|e| {
            ConfigError::InvalidEnvVar("DISHDASH_GEOCODER_URL".to_string(), e.to_string())
        })?;

        let api_key = vars
            .optional("DISHDASH_GEOCODER_API_KEY")
            .map(|key| {
                validate_secret_strength(&key, "DISHDASH_GEOCODER_API_KEY")?;
                Ok::<_, ConfigError>(SecretString::from(key))
            })
            .transpose()?;

        Ok(Self {
            url,
            user_agent: vars
                .optional("DISHDASH_GEOCODER_USER_AGENT")
                .unwrap_or_else(default_user_agent),
            api_key,
            timeout: Duration::from_secs(vars.parse_u64("DISHDASH_GEOCODER_TIMEOUT_SECS", 10)?),
            cache_ttl: Duration::from_secs(
                vars.parse_u64("DISHDASH_GEOCODER_CACHE_TTL_SECS", 3600)?,
            ),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn default_user_agent() -> String {
    format!("dishdash/{}", env!("CARGO_PKG_VERSION"))
}

/// Platform data directory, falling back to `./.dishdash`.
fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".dishdash"), |dir| dir.join("dishdash"))
}

/// Variable source, normally the process environment.
struct Vars<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_u64(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        self.optional(key).map_or(Ok(default), |v| {
            v.trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    fn parse_bool(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        self.optional(key).map_or(Ok(default), |v| {
            match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                other => Err(ConfigError::InvalidEnvVar(
                    key.to_string(),
                    format!("expected a boolean, got '{other}'"),
                )),
            }
        })
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("pk.9f3Kq7ZxW2mN8vB4tR6y", "TEST_VAR");
        assert!(result.is_ok());
    }

    fn load(pairs: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_vars(&Vars(&|key: &str| map.get(key).cloned()))
    }

    fn invalid_var(result: Result<ClientConfig, ConfigError>) -> String {
        match result {
            Err(ConfigError::InvalidEnvVar(key, _)) => key,
            other => panic!("expected InvalidEnvVar, got {other:?}"),
        }
    }

    #[test]
    fn test_from_vars_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.delivery_fee, Decimal::new(299, 2));
        assert!(config.persist_cart);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.geocoder.timeout, Duration::from_secs(10));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_from_vars_overrides() {
        let config = load(&[
            ("DISHDASH_DATA_DIR", "/var/lib/dishdash"),
            ("DISHDASH_DELIVERY_FEE", "4.50"),
            ("DISHDASH_PERSIST_CART", " Off "),
            ("DISHDASH_LOG_FORMAT", "json"),
            ("DISHDASH_GEOCODER_TIMEOUT_SECS", "3"),
            ("SENTRY_DSN", "   "),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/dishdash"));
        assert_eq!(config.delivery_fee, Decimal::new(450, 2));
        assert!(!config.persist_cart);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.geocoder.timeout, Duration::from_secs(3));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_from_vars_rejects_invalid_values() {
        assert_eq!(
            invalid_var(load(&[("DISHDASH_PERSIST_CART", "maybe")])),
            "DISHDASH_PERSIST_CART"
        );
        assert_eq!(
            invalid_var(load(&[("DISHDASH_LOG_FORMAT", "xml")])),
            "DISHDASH_LOG_FORMAT"
        );
        assert_eq!(
            invalid_var(load(&[("DISHDASH_DELIVERY_FEE", "free")])),
            "DISHDASH_DELIVERY_FEE"
        );
        assert_eq!(
            invalid_var(load(&[("DISHDASH_GEOCODER_URL", "not a url")])),
            "DISHDASH_GEOCODER_URL"
        );
        assert_eq!(
            invalid_var(load(&[("DISHDASH_GEOCODER_TIMEOUT_SECS", "-1")])),
            "DISHDASH_GEOCODER_TIMEOUT_SECS"
        );
    }

    #[test]
    fn test_from_vars_rejects_placeholder_api_key() {
        assert!(matches!(
            load(&[("DISHDASH_GEOCODER_API_KEY", "your-key-here")]),
            Err(ConfigError::InsecureSecret(_, _))
        ));
    }

    #[test]
    fn test_with_data_dir_defaults() {
        let config = ClientConfig::with_data_dir("/tmp/dishdash-test");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/dishdash-test"));
        assert_eq!(config.delivery_fee, Decimal::new(299, 2));
        assert!(config.persist_cart);
        assert_eq!(config.geocoder.url, DEFAULT_GEOCODER_URL);
        assert!(config.geocoder.user_agent.starts_with("dishdash/"));
    }

    #[test]
    fn test_geocoder_config_debug_redacts_key() {
        let config = GeocoderConfig {
            api_key: Some(SecretString::from("super_secret_geocoder_key")),
            ..GeocoderConfig::default()
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("nominatim.openstreetmap.org"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_geocoder_key"));
        assert_eq!(
            config.api_key.unwrap().expose_secret(),
            "super_secret_geocoder_key"
        );
    }
}
