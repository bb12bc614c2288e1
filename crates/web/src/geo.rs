//! Geocoding and routing client.
//!
//! Wraps two public OpenStreetMap services:
//! - Nominatim for place search and reverse geocoding
//! - OSRM for driving distance and duration
//!
//! Geocoding answers are cached with `moka` (10-minute TTL). Every call has
//! a short timeout and callers fall back to something sensible on failure,
//! so a slow map service never blocks a booking.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use naqlah_core::Locale;
use naqlah_core::order::{DEFAULT_CITY, Location};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::GeoConfig;

/// Shortest query worth sending to the geocoder.
pub const MIN_QUERY_CHARS: usize = 3;

/// Country appended to free-text searches.
const SEARCH_COUNTRY_SUFFIX: &str = ",Saudi Arabia";

/// Average speed used when estimating a straight-line trip.
const FALLBACK_SPEED_KMH: f64 = 40.0;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Errors that can occur when calling the map services.
#[derive(Debug, Error)]
pub enum GeoError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned a non-success status.
    #[error("API error: {status}")]
    Api { status: u16 },

    /// Response body was not what we expected.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The service found nothing.
    #[error("No results")]
    NoResults,

    /// Search text too short to be useful.
    #[error("Query must be at least {MIN_QUERY_CHARS} characters")]
    QueryTooShort,

    /// A base URL could not be extended with a path.
    #[error("Invalid service URL: {0}")]
    Url(#[from] url::ParseError),
}

/// A geocoded place.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
    pub city: String,
}

impl From<Place> for Location {
    fn from(place: Place) -> Self {
        Self {
            lat: place.lat,
            lng: place.lng,
            address: place.display_name,
            city: place.city,
        }
    }
}

/// Driving distance and time between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSummary {
    pub distance_km: f64,
    pub duration_min: u32,
    /// True when estimated from the straight-line distance.
    pub approximate: bool,
}

impl RouteSummary {
    /// Great-circle estimate used when the router is unavailable.
    #[must_use]
    pub fn straight_line(from: (f64, f64), to: (f64, f64)) -> Self {
        let distance_km = haversine_km(from, to);
        Self {
            distance_km,
            duration_min: minutes(distance_km / FALLBACK_SPEED_KMH * 3600.0),
            approximate: true,
        }
    }

    /// Distance rounded to one decimal for display.
    #[must_use]
    pub fn distance_label(&self) -> String {
        format!("{:.1}", self.distance_km)
    }
}

// =============================================================================
// API Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimError {
    error: String,
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
}

impl NominatimPlace {
    fn into_place(self) -> Result<Place, GeoError> {
        let lat: f64 = self
            .lat
            .parse()
            .map_err(|_| GeoError::Parse(format!("bad latitude '{}'", self.lat)))?;
        let lng: f64 = self
            .lon
            .parse()
            .map_err(|_| GeoError::Parse(format!("bad longitude '{}'", self.lon)))?;
        let city = self
            .address
            .and_then(|a| a.city.or(a.town).or(a.state))
            .unwrap_or_else(|| DEFAULT_CITY.to_owned());
        let display_name = self
            .display_name
            .unwrap_or_else(|| format!("{lat:.6}, {lng:.6}"));
        Ok(Place {
            lat,
            lng,
            display_name,
            city,
        })
    }
}

// =============================================================================
// Client
// =============================================================================

/// Client for the geocoding and routing services.
#[derive(Clone)]
pub struct GeoClient {
    inner: Arc<GeoClientInner>,
}

struct GeoClientInner {
    client: reqwest::Client,
    geocoder: Url,
    router: Url,
    cache: Cache<String, Option<Place>>,
}

impl GeoClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &GeoConfig) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(600)) // 10 minutes
            .build();

        Ok(Self {
            inner: Arc::new(GeoClientInner {
                client,
                geocoder: config.geocoder_base_url.clone(),
                router: config.router_base_url.clone(),
                cache,
            }),
        })
    }

    /// Find the best match for a free-text query inside Saudi Arabia.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::QueryTooShort`] for queries of two characters or
    /// fewer, [`GeoError::NoResults`] when nothing matches, or a transport
    /// error.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search(&self, query: &str, locale: Locale) -> Result<Place, GeoError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Err(GeoError::QueryTooShort);
        }

        let cache_key = format!("search:{locale}:{query}");
        if let Some(cached) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for search");
            return cached.ok_or(GeoError::NoResults);
        }

        let mut url = self.inner.geocoder.join("search")?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", &format!("{query}{SEARCH_COUNTRY_SUFFIX}"))
            .append_pair("countrycodes", "sa")
            .append_pair("limit", "1")
            .append_pair("addressdetails", "1")
            .append_pair("accept-language", locale.code());

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::Api {
                status: status.as_u16(),
            });
        }

        let results: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| GeoError::Parse(e.to_string()))?;

        let place = results
            .into_iter()
            .next()
            .map(NominatimPlace::into_place)
            .transpose()?;

        self.inner.cache.insert(cache_key, place.clone()).await;
        place.ok_or(GeoError::NoResults)
    }

    /// Describe the place at a point.
    ///
    /// # Errors
    ///
    /// Returns a transport or parse error, or [`GeoError::NoResults`] when the
    /// point is not on any known address.
    #[instrument(skip(self))]
    pub async fn reverse(&self, lat: f64, lng: f64, locale: Locale) -> Result<Place, GeoError> {
        let cache_key = format!("reverse:{locale}:{lat:.5},{lng:.5}");
        if let Some(cached) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for reverse");
            return cached.ok_or(GeoError::NoResults);
        }

        let mut url = self.inner.geocoder.join("reverse")?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lng.to_string())
            .append_pair("accept-language", locale.code());

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::Api {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let place = match serde_json::from_str::<NominatimPlace>(&body) {
            Ok(found) => Some(found.into_place()?),
            // Nominatim answers `{"error": "Unable to geocode"}` for points at sea
            Err(e) => match serde_json::from_str::<NominatimError>(&body) {
                Ok(NominatimError { error }) => {
                    debug!(%error, "No address for point");
                    None
                }
                Err(_) => return Err(GeoError::Parse(e.to_string())),
            },
        };

        self.inner.cache.insert(cache_key, place.clone()).await;
        place.ok_or(GeoError::NoResults)
    }

    /// Reverse geocode a point, labelling it by its coordinates when the
    /// service cannot.
    pub async fn locate(&self, lat: f64, lng: f64, locale: Locale) -> Location {
        match self.reverse(lat, lng, locale).await {
            Ok(place) => Location {
                lat,
                lng,
                address: place.display_name,
                city: place.city,
            },
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed, using coordinates");
                Location::fallback(lat, lng)
            }
        }
    }

    /// Driving route between two points.
    ///
    /// # Errors
    ///
    /// Returns a transport or parse error, or [`GeoError::NoResults`] if OSRM
    /// finds no route.
    #[instrument(skip(self))]
    pub async fn route(&self, from: (f64, f64), to: (f64, f64)) -> Result<RouteSummary, GeoError> {
        let path = format!(
            "route/v1/driving/{},{};{},{}",
            from.1, from.0, to.1, to.0
        );
        let mut url = self.inner.router.join(&path)?;
        url.query_pairs_mut().append_pair("overview", "false");

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::Api {
                status: status.as_u16(),
            });
        }

        let body: OsrmResponse = response
            .json()
            .await
            .map_err(|e| GeoError::Parse(e.to_string()))?;
        if body.code != "Ok" {
            return Err(GeoError::NoResults);
        }
        let route = body.routes.into_iter().next().ok_or(GeoError::NoResults)?;

        Ok(RouteSummary {
            distance_km: route.distance / 1000.0,
            duration_min: minutes(route.duration),
            approximate: false,
        })
    }

    /// Route summary that never fails: OSRM when reachable, otherwise a
    /// straight-line estimate.
    pub async fn route_or_estimate(&self, from: (f64, f64), to: (f64, f64)) -> RouteSummary {
        match self.route(from, to).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "Routing failed, using straight-line estimate");
                RouteSummary::straight_line(from, to)
            }
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Great-circle distance between two `(lat, lng)` points.
fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lat2) = (from.0.to_radians(), to.0.to_radians());
    let d_lat = lat2 - lat1;
    let d_lng = (to.1 - from.1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Seconds to whole minutes, rounded up.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to u32 range first
fn minutes(seconds: f64) -> u32 {
    (seconds / 60.0).ceil().clamp(0.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn unreachable_config() -> GeoConfig {
        GeoConfig {
            geocoder_base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            router_base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            user_agent: "naqlah-tests".to_owned(),
            timeout: Duration::from_millis(500),
        }
    }

    #[test]
    fn test_haversine_riyadh_to_jeddah() {
        let km = haversine_km((24.7136, 46.6753), (21.5433, 39.1728));
        assert!((km - 845.0).abs() < 10.0, "got {km}");
    }

    #[test]
    fn test_haversine_same_point() {
        assert!(haversine_km((24.0, 46.0), (24.0, 46.0)).abs() < 1e-9);
    }

    #[test]
    fn test_straight_line_estimate() {
        let summary = RouteSummary::straight_line((24.7136, 46.6753), (24.7136, 46.6753));
        assert!(summary.approximate);
        assert_eq!(summary.duration_min, 0);
        assert_eq!(summary.distance_label(), "0.0");
    }

    #[test]
    fn test_minutes_rounds_up() {
        assert_eq!(minutes(61.0), 2);
        assert_eq!(minutes(0.0), 0);
        assert_eq!(minutes(-5.0), 0);
    }

    #[test]
    fn test_nominatim_place_city_fallbacks() {
        let json = r#"{"lat":"21.5","lon":"39.2","display_name":"جدة","address":{"town":"Town"}}"#;
        let place: NominatimPlace = serde_json::from_str(json).unwrap();
        let place = place.into_place().unwrap();
        assert_eq!(place.city, "Town");

        let json = r#"{"lat":"21.5","lon":"39.2"}"#;
        let place: NominatimPlace = serde_json::from_str(json).unwrap();
        let place = place.into_place().unwrap();
        assert_eq!(place.city, DEFAULT_CITY);
        assert_eq!(place.display_name, "21.500000, 39.200000");
    }

    #[test]
    fn test_nominatim_bad_coordinates() {
        let json = r#"{"lat":"north","lon":"39.2"}"#;
        let place: NominatimPlace = serde_json::from_str(json).unwrap();
        assert!(matches!(place.into_place(), Err(GeoError::Parse(_))));
    }

    #[test]
    fn test_nominatim_error_body_is_not_a_place() {
        let json = r#"{"error":"Unable to geocode"}"#;
        assert!(serde_json::from_str::<NominatimPlace>(json).is_err());
        let error: NominatimError = serde_json::from_str(json).unwrap();
        assert_eq!(error.error, "Unable to geocode");
    }

    #[tokio::test]
    async fn test_short_query_is_not_sent() {
        let client = GeoClient::new(&unreachable_config()).unwrap();
        let err = client.search("جد", Locale::Ar).await.unwrap_err();
        assert!(matches!(err, GeoError::QueryTooShort));
    }

    #[tokio::test]
    async fn test_locate_falls_back_to_coordinates() {
        let client = GeoClient::new(&unreachable_config()).unwrap();
        let location = client.locate(24.71361, 46.67529, Locale::Ar).await;
        assert_eq!(location.address, "24.7136, 46.6753");
        assert_eq!(location.city, DEFAULT_CITY);
    }

    #[tokio::test]
    async fn test_route_falls_back_to_estimate() {
        let client = GeoClient::new(&unreachable_config()).unwrap();
        let summary = client
            .route_or_estimate((24.7136, 46.6753), (24.80, 46.70))
            .await;
        assert!(summary.approximate);
        assert!(summary.distance_km > 0.0);
    }
}
