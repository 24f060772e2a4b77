//! Reverse-geocoding client.
//!
//! Resolves coordinates into a display address using a Nominatim-compatible
//! `reverse` endpoint. Addresses are cached per ~11 m grid cell; returned
//! locations always carry the requested coordinates.

use std::sync::Arc;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use dishdash_core::{Coordinates, Location};

use crate::config::GeocoderConfig;

/// Errors that can occur when talking to the geocoder.
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Geocoder returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Response carried no usable address.
    #[error("No address found for coordinates")]
    MissingAddress,
}

/// Reverse-geocoding client.
#[derive(Clone)]
pub struct GeocodingClient {
    inner: Arc<GeocodingClientInner>,
}

struct GeocodingClientInner {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    cache: Cache<(i32, i32), ResolvedAddress>,
}

impl GeocodingClient {
    /// Create a new geocoding client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodingError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(256)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(GeocodingClientInner {
                client,
                endpoint: config.url.clone(),
                api_key: config
                    .api_key
                    .as_ref()
                    .map(|key| key.expose_secret().to_owned()),
                cache,
            }),
        })
    }

    /// Look up the address at `coordinates`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the geocoder answers with an
    /// error, or the response has no address.
    #[instrument(skip(self), fields(lat = coordinates.latitude(), lon = coordinates.longitude()))]
    pub async fn reverse(&self, coordinates: Coordinates) -> Result<Location, GeocodingError> {
        let cache_key = coordinates.grid_key();
        if let Some(resolved) = self.inner.cache.get(&cache_key).await {
            debug!("Geocoding cache hit");
            return Ok(resolved.at(coordinates));
        }

        let lat = coordinates.latitude().to_string();
        let lon = coordinates.longitude().to_string();
        let mut query = vec![("format", "json"), ("lat", lat.as_str()), ("lon", lon.as_str())];
        if let Some(key) = &self.inner.api_key {
            query.push(("key", key.as_str()));
        }

        let response = self
            .inner
            .client
            .get(&self.inner.endpoint)
            .query(&query)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocodingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let resolved = parse_reverse_response(&body)?;

        self.inner.cache.insert(cache_key, resolved.clone()).await;
        Ok(resolved.at(coordinates))
    }

    /// Look up the address at `coordinates`, falling back to a placeholder
    /// address at the same coordinates on any failure.
    pub async fn reverse_or_fallback(&self, coordinates: Coordinates) -> Location {
        match self.reverse(coordinates).await {
            Ok(location) => location,
            Err(e) => {
                tracing::warn!(error = %e, "Reverse geocoding failed, using fallback location");
                Location::fallback_at(coordinates)
            }
        }
    }
}

/// Reverse-geocoding response body.
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    error: Option<String>,
    #[serde(default)]
    address: AddressParts,
}

#[derive(Debug, Default, Deserialize)]
struct AddressParts {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
}

/// Address details shared by every point in a grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedAddress {
    address: String,
    city: Option<String>,
}

impl ResolvedAddress {
    /// Place the address at `coordinates`, so the stored location matches
    /// what the user picked rather than what the geocoder snapped to.
    fn at(self, coordinates: Coordinates) -> Location {
        let mut location = Location::new(coordinates, self.address);
        location.city = self.city;
        location
    }
}

/// Map a reverse-geocoding JSON body into its address details.
fn parse_reverse_response(body: &str) -> Result<ResolvedAddress, GeocodingError> {
    let parsed: ReverseResponse =
        serde_json::from_str(body).map_err(|e| GeocodingError::Parse(e.to_string()))?;

    if let Some(error) = parsed.error {
        debug!(%error, "Geocoder reported no result");
        return Err(GeocodingError::MissingAddress);
    }

    let address = parsed
        .display_name
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .ok_or(GeocodingError::MissingAddress)?;

    Ok(ResolvedAddress {
        address,
        city: parsed
            .address
            .city
            .or(parsed.address.town)
            .or(parsed.address.village),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    fn riyadh() -> Coordinates {
        Coordinates::new(24.7136, 46.6753).unwrap()
    }

    #[test]
    fn test_parse_display_name_and_city() {
        let body = r#"{
            "place_id": 1,
            "display_name": "King Fahd Road, Al Olaya, Riyadh, Saudi Arabia",
            "address": { "road": "King Fahd Road", "city": "Riyadh", "country": "Saudi Arabia" }
        }"#;
        let location = parse_reverse_response(body).unwrap().at(riyadh());
        assert_eq!(
            location.address,
            "King Fahd Road, Al Olaya, Riyadh, Saudi Arabia"
        );
        assert_eq!(location.city.as_deref(), Some("Riyadh"));
        assert!((location.latitude - 24.7136).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_town_when_no_city() {
        let body = r#"{ "display_name": "Main St, Smallville", "address": { "town": "Smallville" } }"#;
        let resolved = parse_reverse_response(body).unwrap();
        assert_eq!(resolved.city.as_deref(), Some("Smallville"));
    }

    #[test]
    fn test_parse_error_and_missing_address() {
        assert!(matches!(
            parse_reverse_response(r#"{ "error": "Unable to geocode" }"#),
            Err(GeocodingError::MissingAddress)
        ));
        assert!(matches!(
            parse_reverse_response(r#"{ "display_name": "  " }"#),
            Err(GeocodingError::MissingAddress)
        ));
        assert!(matches!(
            parse_reverse_response("<html>"),
            Err(GeocodingError::Parse(_))
        ));
    }

    /// Serve `body` to every request on a local port, counting requests.
    async fn serve_json(body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/reverse", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let mut request = [0_u8; 4096];
                let _ = socket.read(&mut request).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (url, hits)
    }

    #[tokio::test]
    async fn test_cache_hit_keeps_requested_coordinates() {
        let (url, hits) =
            serve_json(r#"{ "display_name": "Olaya St, Riyadh", "address": { "city": "Riyadh" } }"#)
                .await;
        let config = GeocoderConfig {
            url,
            timeout: Duration::from_secs(5),
            ..GeocoderConfig::default()
        };
        let client = GeocodingClient::new(&config).unwrap();

        let first = Coordinates::new(24.71361, 46.67529).unwrap();
        let second = Coordinates::new(24.71364, 46.67531).unwrap();
        assert_eq!(first.grid_key(), second.grid_key());

        let a = client.reverse(first).await.unwrap();
        let b = client.reverse(second).await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(a.coordinates(), Some(first));
        assert_eq!(b.coordinates(), Some(second));
        assert_eq!(b.address, "Olaya St, Riyadh");
        assert_eq!(b.city.as_deref(), Some("Riyadh"));
    }

    #[tokio::test]
    async fn test_unreachable_geocoder_falls_back() {
        let config = GeocoderConfig {
            url: "http://127.0.0.1:1/reverse".to_owned(),
            timeout: Duration::from_secs(2),
            ..GeocoderConfig::default()
        };
        let client = GeocodingClient::new(&config).unwrap();

        assert!(client.reverse(riyadh()).await.is_err());

        let location = client.reverse_or_fallback(riyadh()).await;
        assert!(location.is_fallback());
        assert_eq!(location.coordinates(), Some(riyadh()));
    }
}
