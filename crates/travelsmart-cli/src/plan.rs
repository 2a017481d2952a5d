//! One-shot itinerary planning.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use travelsmart_core::{
    build_routes, geojson::feature_collection, resolve_visited_countries, Destination,
    GeocodingService, Itinerary, LegResolver, RoutingService,
};

/// Parse a JSON array of destinations into a validated itinerary.
pub fn parse_itinerary(input: &str) -> Result<Itinerary> {
    let destinations: Vec<Destination> =
        serde_json::from_str(input).context("Input must be a JSON array of destinations")?;
    Itinerary::from_destinations(destinations).context("Invalid itinerary")
}

pub fn load_itinerary(path: &Path) -> Result<Itinerary> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_itinerary(&input)
}

/// Resolve routes and visited countries once and render them as a
/// GeoJSON FeatureCollection with a `visited_countries` member.
pub async fn plan_itinerary<R, G>(
    itinerary: &Itinerary,
    routing: Option<Arc<R>>,
    geocoding: Option<&G>,
    timeout: Duration,
) -> Value
where
    R: RoutingService,
    G: GeocodingService,
{
    let resolver = LegResolver::new(routing, timeout);
    let destinations = itinerary.destinations();

    let (routes, countries) = tokio::join!(
        build_routes(destinations, &resolver),
        resolve_visited_countries(destinations, geocoding, timeout),
    );
    tracing::info!(
        legs = routes.len(),
        countries = countries.len(),
        "Resolved itinerary"
    );

    feature_collection(destinations, &routes, Some(&countries))
}
