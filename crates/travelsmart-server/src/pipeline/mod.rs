//! Route synthesis pipeline.
//!
//! Every accepted itinerary edit produces a new immutable snapshot which is
//! handed to [`Pipeline::itinerary_changed`]. Routes and visited countries
//! are recomputed in the background and published with the generation of the
//! snapshot they were computed from; results of superseded snapshots are
//! dropped.

pub mod countries;
pub mod route_builder;

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use travelsmart_core::{GeocodingService, Itinerary, RouteSet, RoutingService, VisitedCountrySet};
use travelsmart_mapbox::MapboxClient;

use crate::config::Config;
use crate::publisher::Published;

pub use countries::CountryAggregator;
pub use route_builder::RouteBuilder;
pub use travelsmart_core::{
    build_routes, geodesic_segment, resolve_visited_countries, LegResolver, GEODESIC_STEPS,
};

pub struct Pipeline<R, G> {
    routes: RouteBuilder<R>,
    countries: CountryAggregator<G>,
}

/// Pipeline backed by the Mapbox APIs for both services.
pub type MapboxPipeline = Pipeline<MapboxClient, MapboxClient>;

impl<R, G> Pipeline<R, G>
where
    R: RoutingService + 'static,
    G: GeocodingService + 'static,
{
    pub fn new(routing: Option<Arc<R>>, geocoding: Option<Arc<G>>, timeout: Duration) -> Self {
        Self {
            routes: RouteBuilder::new(LegResolver::new(routing, timeout)),
            countries: CountryAggregator::new(geocoding, timeout),
        }
    }

    /// Schedule recomputation for a new snapshot.
    ///
    /// Generations are claimed synchronously, so calling this in edit order
    /// guarantees the last edit wins.
    pub fn itinerary_changed(&self, snapshot: Arc<Itinerary>) {
        tracing::debug!(destinations = snapshot.len(), "Itinerary changed, rebuilding");
        tokio::spawn(self.routes.rebuild(Arc::clone(&snapshot)));
        tokio::spawn(self.countries.refresh(snapshot));
    }

    pub fn routes(&self) -> Published<RouteSet> {
        self.routes.current()
    }

    pub fn countries(&self) -> Published<VisitedCountrySet> {
        self.countries.current()
    }

    pub fn subscribe_routes(&self) -> watch::Receiver<Published<RouteSet>> {
        self.routes.subscribe()
    }

    pub fn subscribe_countries(&self) -> watch::Receiver<Published<VisitedCountrySet>> {
        self.countries.subscribe()
    }
}

impl MapboxPipeline {
    /// Build the pipeline from configuration. Without a usable token both
    /// services are disabled and the pipeline runs in degraded mode.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = match &config.mapbox_token {
            Some(token) => {
                let client = MapboxClient::new(
                    config.mapbox_api_url.clone(),
                    token.clone(),
                    config.request_timeout,
                )
                .context("Failed to create Mapbox client")?;
                tracing::info!(base_url = client.base_url(), "Mapbox routing enabled");
                Some(Arc::new(client))
            }
            None => {
                tracing::warn!(
                    "No usable Mapbox access token; legs fall back to great circles and countries are not resolved"
                );
                None
            }
        };

        Ok(Self::new(client.clone(), client, config.request_timeout))
    }
}
