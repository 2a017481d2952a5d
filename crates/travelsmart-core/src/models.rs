//! Core data models for itinerary routing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::CoreError;

pub type DestinationId = u64;

/// A point on the globe as (longitude, latitude) in degrees.
///
/// Serialized as a `[lon, lat]` array, matching GeoJSON position order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    lon: f64,
    lat: f64,
}

impl Coordinate {
    /// Create a validated coordinate.
    pub fn new(lon: f64, lat: f64) -> Result<Self, CoreError> {
        let valid = lon.is_finite()
            && lat.is_finite()
            && (-180.0..=180.0).contains(&lon)
            && (-90.0..=90.0).contains(&lat);
        if !valid {
            return Err(CoreError::InvalidCoordinate { lon, lat });
        }
        Ok(Self { lon, lat })
    }

    /// Build a coordinate from values already known to be in range
    /// (e.g. the output of `atan2`/`asin`).
    pub(crate) fn from_radians_unchecked(lon_rad: f64, lat_rad: f64) -> Self {
        Self {
            lon: lon_rad.to_degrees().clamp(-180.0, 180.0),
            lat: lat_rad.to_degrees().clamp(-90.0, 90.0),
        }
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = CoreError;

    fn try_from(value: [f64; 2]) -> Result<Self, Self::Error> {
        Coordinate::new(value[0], value[1])
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(value: Coordinate) -> Self {
        [value.lon, value.lat]
    }
}

/// How the traveler moves from a destination to the next one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Car,
    Walk,
    Bike,
    Train,
    Plane,
    #[default]
    Unspecified,
}

impl TransportMode {
    /// Routing profile for modes the routing service can follow.
    /// Train, plane and unspecified legs are always drawn as great circles.
    pub fn routing_profile(self) -> Option<RoutingProfile> {
        match self {
            TransportMode::Car => Some(RoutingProfile::Driving),
            TransportMode::Walk => Some(RoutingProfile::Walking),
            TransportMode::Bike => Some(RoutingProfile::Cycling),
            TransportMode::Train | TransportMode::Plane | TransportMode::Unspecified => None,
        }
    }
}

/// Named profile accepted by the routing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingProfile {
    Driving,
    Walking,
    Cycling,
}

impl RoutingProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            RoutingProfile::Driving => "driving",
            RoutingProfile::Walking => "walking",
            RoutingProfile::Cycling => "cycling",
        }
    }
}

impl std::fmt::Display for RoutingProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stop of the itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    pub city: String,
    pub coordinates: Coordinate,
    pub days: u32,
    /// Mode used to travel on to the next destination.
    #[serde(default)]
    pub transport: TransportMode,
}

impl Destination {
    pub fn new(id: DestinationId, city: impl Into<String>, coordinates: Coordinate, days: u32) -> Self {
        Self {
            id,
            city: city.into(),
            coordinates,
            days,
            transport: TransportMode::Unspecified,
        }
    }

    pub fn with_transport(mut self, transport: TransportMode) -> Self {
        self.transport = transport;
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.days < 1 {
            return Err(CoreError::InvalidDays {
                id: self.id,
                days: self.days,
            });
        }
        if self.city.trim().is_empty() {
            return Err(CoreError::EmptyName);
        }
        Ok(())
    }
}

/// A consecutive origin -> destination hop. Derived from the itinerary, never stored.
#[derive(Debug, Clone, Copy)]
pub struct Leg<'a> {
    pub origin: &'a Destination,
    pub destination: &'a Destination,
}

impl<'a> Leg<'a> {
    /// Transport mode of the leg, taken from its origin.
    pub fn mode(&self) -> TransportMode {
        self.origin.transport
    }
}

/// Consecutive legs of an itinerary, in traversal order.
pub fn legs(destinations: &[Destination]) -> impl Iterator<Item = Leg<'_>> + '_ {
    destinations.windows(2).map(|pair| Leg {
        origin: &pair[0],
        destination: &pair[1],
    })
}

/// Where a segment's geometry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentSource {
    Routed,
    Geodesic,
}

/// Resolved path for one leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathSegment {
    pub from_id: DestinationId,
    pub to_id: DestinationId,
    pub mode: TransportMode,
    pub source: SegmentSource,
    coordinates: Vec<Coordinate>,
}

impl PathSegment {
    /// Segment built from an interpolated great-circle path.
    ///
    /// Ends are pinned to the leg's endpoints so the segment always
    /// starts at the origin and stops at the destination.
    pub fn geodesic(leg: &Leg<'_>, path: Vec<Coordinate>) -> Self {
        let mut coordinates = path;
        pin_ends(&mut coordinates, leg, false);
        Self::from_leg(leg, SegmentSource::Geodesic, coordinates)
    }

    /// Segment built from routing service geometry.
    ///
    /// The service snaps to the road network, so its first and last points
    /// rarely coincide with the destinations; the exact endpoints are added
    /// around the geometry instead of replacing any of it.
    pub fn routed(leg: &Leg<'_>, geometry: Vec<Coordinate>) -> Self {
        let mut coordinates = geometry;
        pin_ends(&mut coordinates, leg, true);
        Self::from_leg(leg, SegmentSource::Routed, coordinates)
    }

    fn from_leg(leg: &Leg<'_>, source: SegmentSource, coordinates: Vec<Coordinate>) -> Self {
        Self {
            from_id: leg.origin.id,
            to_id: leg.destination.id,
            mode: leg.mode(),
            source,
            coordinates,
        }
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn into_coordinates(self) -> Vec<Coordinate> {
        self.coordinates
    }
}

fn pin_ends(coordinates: &mut Vec<Coordinate>, leg: &Leg<'_>, extend: bool) {
    let origin = leg.origin.coordinates;
    let destination = leg.destination.coordinates;

    match coordinates.first().copied() {
        Some(first) if first == origin => {}
        Some(_) if extend => coordinates.insert(0, origin),
        Some(_) => coordinates[0] = origin,
        None => coordinates.push(origin),
    }

    // A single-point path needs its own closing point.
    if coordinates.len() < 2 {
        coordinates.push(destination);
        return;
    }

    let last_idx = coordinates.len() - 1;
    if coordinates[last_idx] != destination {
        if extend {
            coordinates.push(destination);
        } else {
            coordinates[last_idx] = destination;
        }
    }
}

/// Ordered path segments for one itinerary snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RouteSet {
    segments: Vec<PathSegment>,
}

impl RouteSet {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathSegment> {
        self.segments.iter()
    }
}

impl<'a> IntoIterator for &'a RouteSet {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Deduplicated set of visited ISO country codes (two uppercase letters).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VisitedCountrySet {
    codes: BTreeSet<String>,
}

impl VisitedCountrySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and admit a raw short code. Returns true if the code was
    /// valid and not already present.
    pub fn admit(&mut self, raw: &str) -> bool {
        match normalize_country_code(raw) {
            Some(code) => self.codes.insert(code),
            None => false,
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }
}

/// Normalize a geocoder short code such as `"es"` or `"us-ca"` to `"ES"` / `"US"`.
///
/// Only the part before the first `-` is kept; it must be exactly two ASCII letters.
pub fn normalize_country_code(raw: &str) -> Option<String> {
    let head = raw.trim().split('-').next()?;
    if head.len() != 2 || !head.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(head.to_ascii_uppercase())
}
