//! Mapbox API HTTP client.

use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use travelsmart_core::{Coordinate, GeocodingService, RoutingProfile, RoutingService};

use crate::token::AccessToken;

pub const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";

#[derive(Debug, Error)]
pub enum MapboxError {
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("service answered {0}")]
    Service(String),

    #[error("response has no route geometry")]
    MissingGeometry,

    #[error("response has no country code")]
    MissingCountry,
}

/// HTTP client for the Mapbox Directions and Geocoding APIs.
#[derive(Clone)]
pub struct MapboxClient {
    client: Client,
    base_url: String,
    token: AccessToken,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    code: Option<String>,
    routes: Option<Vec<DirectionsRoute>>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    geometry: Option<LineGeometry>,
}

#[derive(Debug, Deserialize)]
struct LineGeometry {
    coordinates: Option<Vec<Vec<f64>>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    features: Option<Vec<GeocodingFeature>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingFeature {
    properties: Option<GeocodingProperties>,
}

#[derive(Debug, Deserialize)]
struct GeocodingProperties {
    short_code: Option<String>,
}

impl MapboxClient {
    /// Create a new client against `base_url` (normally [`DEFAULT_BASE_URL`]).
    ///
    /// `timeout` bounds every request end to end.
    pub fn new(
        base_url: impl Into<String>,
        token: AccessToken,
        timeout: Duration,
    ) -> Result<Self, MapboxError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(MapboxError::Client)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn directions_url(
        &self,
        profile: RoutingProfile,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Url, MapboxError> {
        let url = format!(
            "{}/directions/v5/mapbox/{}/{},{};{},{}",
            self.base_url,
            profile,
            origin.lon(),
            origin.lat(),
            destination.lon(),
            destination.lat()
        );
        Url::parse_with_params(
            &url,
            &[
                ("geometries", "geojson"),
                ("overview", "full"),
                ("access_token", self.token.as_str()),
            ],
        )
        .map_err(|err| MapboxError::InvalidUrl(err.to_string()))
    }

    pub(crate) fn reverse_geocode_url(&self, at: Coordinate) -> Result<Url, MapboxError> {
        let url = format!(
            "{}/geocoding/v5/mapbox.places/{},{}.json",
            self.base_url,
            at.lon(),
            at.lat()
        );
        Url::parse_with_params(
            &url,
            &[
                ("types", "country"),
                ("limit", "1"),
                ("access_token", self.token.as_str()),
            ],
        )
        .map_err(|err| MapboxError::InvalidUrl(err.to_string()))
    }

    /// Fetch the full route geometry between two points.
    pub async fn directions(
        &self,
        profile: RoutingProfile,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, MapboxError> {
        let url = self.directions_url(profile, origin, destination)?;
        tracing::trace!(%profile, "Requesting directions");
        let body = self.get_bytes(url).await?;
        parse_directions(&body)
    }

    /// Look up the raw country short code at a point.
    pub async fn reverse_country_code(&self, at: Coordinate) -> Result<String, MapboxError> {
        let url = self.reverse_geocode_url(at)?;
        tracing::trace!(lon = at.lon(), lat = at.lat(), "Requesting reverse geocode");
        let body = self.get_bytes(url).await?;
        parse_country_code(&body)
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, MapboxError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(MapboxError::Transport)?;

        if !response.status().is_success() {
            return Err(MapboxError::Status(response.status()));
        }

        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(MapboxError::Transport)
    }
}

impl std::fmt::Debug for MapboxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapboxClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token)
            .finish()
    }
}

impl RoutingService for MapboxClient {
    type Error = MapboxError;

    fn route(
        &self,
        profile: RoutingProfile,
        origin: Coordinate,
        destination: Coordinate,
    ) -> impl std::future::Future<Output = Result<Vec<Coordinate>, Self::Error>> + Send {
        self.directions(profile, origin, destination)
    }
}

impl GeocodingService for MapboxClient {
    type Error = MapboxError;

    fn country_short_code(
        &self,
        at: Coordinate,
    ) -> impl std::future::Future<Output = Result<String, Self::Error>> + Send {
        self.reverse_country_code(at)
    }
}

/// Extract the first route's coordinates from a Directions response body.
pub fn parse_directions(body: &[u8]) -> Result<Vec<Coordinate>, MapboxError> {
    let payload: DirectionsResponse =
        serde_json::from_slice(body).map_err(|err| MapboxError::Decode(err.to_string()))?;

    if let Some(code) = payload.code.as_deref() {
        if code != "Ok" {
            return Err(MapboxError::Service(code.to_string()));
        }
    }

    let raw = payload
        .routes
        .and_then(|routes| routes.into_iter().next())
        .and_then(|route| route.geometry)
        .and_then(|geometry| geometry.coordinates)
        .filter(|coordinates| !coordinates.is_empty())
        .ok_or(MapboxError::MissingGeometry)?;

    raw.into_iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Coordinate::new(*lon, *lat)
                .map_err(|err| MapboxError::Decode(err.to_string())),
            _ => Err(MapboxError::Decode("position with fewer than 2 values".to_string())),
        })
        .collect()
}

/// Extract the first feature's short code from a Geocoding response body.
pub fn parse_country_code(body: &[u8]) -> Result<String, MapboxError> {
    let payload: GeocodingResponse =
        serde_json::from_slice(body).map_err(|err| MapboxError::Decode(err.to_string()))?;

    payload
        .features
        .and_then(|features| features.into_iter().next())
        .and_then(|feature| feature.properties)
        .and_then(|properties| properties.short_code)
        .filter(|code| !code.trim().is_empty())
        .ok_or(MapboxError::MissingCountry)
}
