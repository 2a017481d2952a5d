//! Contracts for the external routing and reverse-geocoding services.
//!
//! Implementations own their credentials; the pipeline only ever sees a
//! service when a usable credential was configured.

use std::future::Future;

use crate::models::{Coordinate, RoutingProfile};

/// Road/path routing between two points.
pub trait RoutingService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the full geometry of the best route for `profile`.
    fn route(
        &self,
        profile: RoutingProfile,
        origin: Coordinate,
        destination: Coordinate,
    ) -> impl Future<Output = Result<Vec<Coordinate>, Self::Error>> + Send;
}

/// Reverse geocoding constrained to country-level results.
pub trait GeocodingService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Raw short code of the country containing `at`, e.g. `"es"` or `"us-ca"`.
    fn country_short_code(
        &self,
        at: Coordinate,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
