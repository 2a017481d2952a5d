//! GeoJSON payloads for map rendering.

use serde_json::{json, Value};

use crate::geodesic::path_length_m;
use crate::models::{Destination, RouteSet, VisitedCountrySet};

/// Build a `FeatureCollection` with one point per destination followed by
/// one line per resolved leg.
///
/// Visited countries, when given, are attached as a foreign member.
pub fn feature_collection(
    destinations: &[Destination],
    routes: &RouteSet,
    countries: Option<&VisitedCountrySet>,
) -> Value {
    let mut features = Vec::with_capacity(destinations.len() + routes.len());

    for (index, destination) in destinations.iter().enumerate() {
        features.push(json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": destination.coordinates,
            },
            "properties": {
                "kind": "destination",
                "id": destination.id,
                "city": destination.city,
                "days": destination.days,
                "stop": index + 1,
            },
        }));
    }

    for segment in routes {
        features.push(json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": segment.coordinates(),
            },
            "properties": {
                "kind": "leg",
                "from_id": segment.from_id,
                "to_id": segment.to_id,
                "mode": segment.mode,
                "source": segment.source,
                "length_km": (path_length_m(segment.coordinates()) / 1000.0 * 10.0).round() / 10.0,
            },
        }));
    }

    let mut collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    if let (Some(countries), Some(object)) = (countries, collection.as_object_mut()) {
        object.insert("visited_countries".to_string(), json!(countries));
    }
    collection
}
