//! Visited-country aggregation over itinerary destinations.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use travelsmart_core::{resolve_visited_countries, GeocodingService, Itinerary, VisitedCountrySet};

use crate::publisher::{GenerationPublisher, Published};

/// Recomputes and publishes the visited-country set on itinerary changes.
pub struct CountryAggregator<G> {
    geocoding: Option<Arc<G>>,
    timeout: Duration,
    publisher: Arc<GenerationPublisher<VisitedCountrySet>>,
}

impl<G: GeocodingService + 'static> CountryAggregator<G> {
    pub fn new(geocoding: Option<Arc<G>>, timeout: Duration) -> Self {
        Self {
            geocoding,
            timeout,
            publisher: Arc::new(GenerationPublisher::new(VisitedCountrySet::new())),
        }
    }

    /// Start a recomputation for `snapshot`; see `RouteBuilder::rebuild`.
    pub fn refresh(&self, snapshot: Arc<Itinerary>) -> impl Future<Output = bool> + Send + 'static {
        let generation = self.publisher.begin();
        let geocoding = self.geocoding.clone();
        let timeout = self.timeout;
        let publisher = Arc::clone(&self.publisher);

        async move {
            let countries =
                resolve_visited_countries(snapshot.destinations(), geocoding.as_deref(), timeout).await;
            let count = countries.len();
            let published = publisher.publish(generation, countries);
            if published {
                tracing::debug!(generation, count, "Published visited countries");
            } else {
                tracing::trace!(
                    generation,
                    latest = publisher.latest(),
                    "Discarded superseded country set"
                );
            }
            published
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Published<VisitedCountrySet>> {
        self.publisher.subscribe()
    }

    pub fn current(&self) -> Published<VisitedCountrySet> {
        self.publisher.current()
    }
}
