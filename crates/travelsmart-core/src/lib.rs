pub mod error;
pub mod geodesic;
pub mod geojson;
pub mod itinerary;
pub mod models;
pub mod resolve;
pub mod services;

pub use error::CoreError;
pub use geodesic::{haversine_distance_m, interpolate_great_circle, path_length_m};
pub use itinerary::{demo_itinerary, Itinerary, NewDestination};
pub use models::{
    legs, normalize_country_code, Coordinate, Destination, DestinationId, Leg, PathSegment,
    RouteSet, RoutingProfile, SegmentSource, TransportMode, VisitedCountrySet,
};
pub use resolve::{
    build_routes, geodesic_segment, resolve_visited_countries, LegResolver, GEODESIC_STEPS,
};
pub use services::{GeocodingService, RoutingService};
