//! Route set construction for itinerary snapshots.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use travelsmart_core::{build_routes, Itinerary, LegResolver, RouteSet, RoutingService};

use crate::publisher::{GenerationPublisher, Published};

/// Rebuilds and publishes the route set whenever the itinerary changes.
pub struct RouteBuilder<R> {
    resolver: LegResolver<R>,
    publisher: Arc<GenerationPublisher<RouteSet>>,
}

impl<R: RoutingService + 'static> RouteBuilder<R> {
    pub fn new(resolver: LegResolver<R>) -> Self {
        Self {
            resolver,
            publisher: Arc::new(GenerationPublisher::new(RouteSet::default())),
        }
    }

    /// Start a rebuild for `snapshot`.
    ///
    /// The generation is claimed before this returns, so callers that start
    /// rebuilds in snapshot order get them ranked in the same order no matter
    /// when the returned future is polled. Resolves to whether the result was
    /// published.
    pub fn rebuild(&self, snapshot: Arc<Itinerary>) -> impl Future<Output = bool> + Send + 'static {
        let generation = self.publisher.begin();
        let resolver = self.resolver.clone();
        let publisher = Arc::clone(&self.publisher);

        async move {
            let routes = build_routes(snapshot.destinations(), &resolver).await;
            let segments = routes.len();
            let published = publisher.publish(generation, routes);
            if published {
                tracing::debug!(generation, segments, "Published route set");
            } else {
                tracing::trace!(
                    generation,
                    latest = publisher.latest(),
                    "Discarded superseded route set"
                );
            }
            published
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Published<RouteSet>> {
        self.publisher.subscribe()
    }

    pub fn current(&self) -> Published<RouteSet> {
        self.publisher.current()
    }
}
