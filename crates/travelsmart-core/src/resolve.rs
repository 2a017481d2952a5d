//! One-shot resolution of an itinerary into drawable legs and visited countries.
//!
//! Nothing here fails outward: routing problems degrade to great-circle arcs
//! and geocoding problems drop the affected destination.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

use crate::geodesic::interpolate_great_circle;
use crate::models::{
    legs, normalize_country_code, Destination, Leg, PathSegment, RouteSet, VisitedCountrySet,
};
use crate::services::{GeocodingService, RoutingService};

/// Interpolation steps for fallback arcs (97 points per leg).
pub const GEODESIC_STEPS: usize = 96;

/// Resolves a single leg to a drawable path.
///
/// Never fails: any routing problem degrades to a great-circle arc.
pub struct LegResolver<R> {
    routing: Option<Arc<R>>,
    timeout: Duration,
}

impl<R> Clone for LegResolver<R> {
    fn clone(&self) -> Self {
        Self {
            routing: self.routing.clone(),
            timeout: self.timeout,
        }
    }
}

impl<R: RoutingService> LegResolver<R> {
    /// `routing` is `None` when no usable credential is configured.
    pub fn new(routing: Option<Arc<R>>, timeout: Duration) -> Self {
        Self { routing, timeout }
    }

    pub fn has_routing(&self) -> bool {
        self.routing.is_some()
    }

    pub async fn resolve_leg(&self, leg: Leg<'_>) -> PathSegment {
        let Some(profile) = leg.mode().routing_profile() else {
            return geodesic_segment(&leg);
        };
        let Some(routing) = self.routing.as_deref() else {
            return geodesic_segment(&leg);
        };

        let origin = leg.origin.coordinates;
        let destination = leg.destination.coordinates;

        match tokio::time::timeout(self.timeout, routing.route(profile, origin, destination)).await {
            Ok(Ok(geometry)) if geometry.len() >= 2 => PathSegment::routed(&leg, geometry),
            Ok(Ok(geometry)) => {
                tracing::debug!(
                    from = leg.origin.id,
                    to = leg.destination.id,
                    %profile,
                    points = geometry.len(),
                    "Routing returned degenerate geometry, using great circle"
                );
                geodesic_segment(&leg)
            }
            Ok(Err(err)) => {
                tracing::debug!(
                    from = leg.origin.id,
                    to = leg.destination.id,
                    %profile,
                    error = %err,
                    "Routing failed, using great circle"
                );
                geodesic_segment(&leg)
            }
            Err(_) => {
                tracing::debug!(
                    from = leg.origin.id,
                    to = leg.destination.id,
                    %profile,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Routing timed out, using great circle"
                );
                geodesic_segment(&leg)
            }
        }
    }
}

/// Great-circle arc for a leg, as used whenever routing is not applicable.
pub fn geodesic_segment(leg: &Leg<'_>) -> PathSegment {
    let path = interpolate_great_circle(
        leg.origin.coordinates,
        leg.destination.coordinates,
        GEODESIC_STEPS,
    );
    PathSegment::geodesic(leg, path)
}

/// Resolve every leg concurrently; segments keep itinerary order.
pub async fn build_routes<R: RoutingService>(
    destinations: &[Destination],
    resolver: &LegResolver<R>,
) -> RouteSet {
    let segments = join_all(legs(destinations).map(|leg| resolver.resolve_leg(leg))).await;
    RouteSet::new(segments)
}

/// Reverse-geocode each destination in order and collect normalized codes.
///
/// A failing, slow or unrecognized lookup only drops that destination.
/// Without a geocoder the result is empty.
pub async fn resolve_visited_countries<G: GeocodingService>(
    destinations: &[Destination],
    geocoding: Option<&G>,
    timeout: Duration,
) -> VisitedCountrySet {
    let mut countries = VisitedCountrySet::new();
    let Some(geocoding) = geocoding else {
        return countries;
    };

    for destination in destinations {
        match tokio::time::timeout(timeout, geocoding.country_short_code(destination.coordinates)).await {
            Ok(Ok(raw)) => {
                if normalize_country_code(&raw).is_none() {
                    tracing::debug!(id = destination.id, code = %raw, "Ignoring unrecognized country code");
                }
                countries.admit(&raw);
            }
            Ok(Err(err)) => {
                tracing::debug!(id = destination.id, error = %err, "Reverse geocoding failed");
            }
            Err(_) => {
                tracing::debug!(id = destination.id, "Reverse geocoding timed out");
            }
        }
    }

    countries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary::demo_itinerary;
    use crate::models::{Coordinate, RoutingProfile, SegmentSource, TransportMode};
    use std::future::Future;

    #[derive(Debug, thiserror::Error)]
    #[error("unavailable")]
    struct Unavailable;

    /// Routing that always fails.
    struct DownRouting;

    impl RoutingService for DownRouting {
        type Error = Unavailable;

        fn route(
            &self,
            _profile: RoutingProfile,
            _origin: Coordinate,
            _destination: Coordinate,
        ) -> impl Future<Output = Result<Vec<Coordinate>, Self::Error>> + Send {
            async { Err(Unavailable) }
        }
    }

    /// Geocoding that answers Spain everywhere.
    struct Spain;

    impl GeocodingService for Spain {
        type Error = Unavailable;

        fn country_short_code(
            &self,
            _at: Coordinate,
        ) -> impl Future<Output = Result<String, Self::Error>> + Send {
            async { Ok("es".to_string()) }
        }
    }

    #[tokio::test]
    async fn failed_routing_matches_fallback_arc() {
        let mut itinerary = demo_itinerary();
        itinerary.set_transport(1, TransportMode::Car).unwrap();
        let resolver = LegResolver::new(Some(Arc::new(DownRouting)), Duration::from_secs(5));

        let routes = build_routes(itinerary.destinations(), &resolver).await;

        assert_eq!(routes.len(), 3);
        let first = &routes.segments()[0];
        assert_eq!(first.source, SegmentSource::Geodesic);
        let madrid = itinerary.destinations()[0].coordinates;
        let paris = itinerary.destinations()[1].coordinates;
        assert_eq!(
            first.coordinates(),
            interpolate_great_circle(madrid, paris, GEODESIC_STEPS).as_slice()
        );
    }

    #[tokio::test]
    async fn same_country_is_counted_once() {
        let itinerary = demo_itinerary();
        let countries =
            resolve_visited_countries(itinerary.destinations(), Some(&Spain), Duration::from_secs(5))
                .await;
        assert_eq!(countries.iter().collect::<Vec<_>>(), vec!["ES"]);

        let none = resolve_visited_countries::<Spain>(
            itinerary.destinations(),
            None,
            Duration::from_secs(5),
        )
        .await;
        assert!(none.is_empty());
    }
}
