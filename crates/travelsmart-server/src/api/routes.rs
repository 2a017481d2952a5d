//! REST API routes.

use axum::{
    extract::State,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;

use travelsmart_core::{geojson::feature_collection, RouteSet, VisitedCountrySet};

use crate::api::{itinerary, ws};
use crate::publisher::Published;
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/v1/itinerary",
            get(itinerary::get_itinerary).put(itinerary::replace_itinerary),
        )
        .route("/v1/itinerary/destinations", post(itinerary::add_destination))
        .route(
            "/v1/itinerary/destinations/:id",
            patch(itinerary::update_destination).delete(itinerary::delete_destination),
        )
        .route("/v1/itinerary/reorder", post(itinerary::reorder_destinations))
        .route("/v1/routes", get(get_routes))
        .route("/v1/routes/geojson", get(get_routes_geojson))
        .route("/v1/countries", get(get_countries))
        // WebSocket streaming
        .route("/v1/stream", get(ws::stream_handler))
}

async fn health_check() -> &'static str {
    "OK"
}

/// Latest published route set.
async fn get_routes(State(state): State<Arc<AppState>>) -> Json<Published<RouteSet>> {
    Json(state.routes())
}

/// Latest published route set as a GeoJSON FeatureCollection.
///
/// Destination points come from the current itinerary, which may be newer
/// than the route set while a rebuild is in flight.
async fn get_routes_geojson(State(state): State<Arc<AppState>>) -> Json<Value> {
    let itinerary = state.itinerary();
    let routes = state.routes();
    let countries = state.countries();
    Json(feature_collection(
        itinerary.destinations(),
        &routes.value,
        Some(&countries.value),
    ))
}

/// Latest published visited-country set.
async fn get_countries(
    State(state): State<Arc<AppState>>,
) -> Json<Published<VisitedCountrySet>> {
    Json(state.countries())
}
