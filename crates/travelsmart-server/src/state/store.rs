//! In-memory itinerary store feeding the route pipeline.

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use tokio::sync::watch;
use travelsmart_core::{CoreError, Itinerary, RouteSet, VisitedCountrySet};

use crate::config::Config;
use crate::pipeline::MapboxPipeline;
use crate::publisher::Published;

/// Application state - the current itinerary snapshot and its derived views.
pub struct AppState {
    config: Config,
    itinerary: RwLock<Arc<Itinerary>>,
    pipeline: MapboxPipeline,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let pipeline = MapboxPipeline::from_config(&config)?;
        Ok(Self {
            config,
            itinerary: RwLock::new(Arc::new(Itinerary::new())),
            pipeline,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current itinerary snapshot.
    pub fn itinerary(&self) -> Arc<Itinerary> {
        let guard = self.itinerary.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Apply an edit to a copy of the current itinerary.
    ///
    /// If the edit succeeds and changed anything, the copy becomes the new
    /// snapshot and the pipeline is notified while the lock is still held,
    /// so rebuilds are started in edit order.
    pub fn edit<T>(
        &self,
        apply: impl FnOnce(&mut Itinerary) -> Result<T, CoreError>,
    ) -> Result<(T, Arc<Itinerary>), CoreError> {
        let mut guard = self.write();
        let mut next = Itinerary::clone(&guard);
        let outcome = apply(&mut next)?;

        if next != **guard {
            let snapshot = Arc::new(next);
            *guard = Arc::clone(&snapshot);
            self.pipeline.itinerary_changed(Arc::clone(&snapshot));
            Ok((outcome, snapshot))
        } else {
            Ok((outcome, Arc::clone(&guard)))
        }
    }

    /// Replace the whole itinerary.
    pub fn replace(&self, itinerary: Itinerary) -> Arc<Itinerary> {
        let mut guard = self.write();
        let snapshot = Arc::new(itinerary);
        *guard = Arc::clone(&snapshot);
        self.pipeline.itinerary_changed(Arc::clone(&snapshot));
        snapshot
    }

    pub fn routes(&self) -> Published<RouteSet> {
        self.pipeline.routes()
    }

    pub fn countries(&self) -> Published<VisitedCountrySet> {
        self.pipeline.countries()
    }

    pub fn subscribe_routes(&self) -> watch::Receiver<Published<RouteSet>> {
        self.pipeline.subscribe_routes()
    }

    pub fn subscribe_countries(&self) -> watch::Receiver<Published<VisitedCountrySet>> {
        self.pipeline.subscribe_countries()
    }

    fn write(&self) -> RwLockWriteGuard<'_, Arc<Itinerary>> {
        self.itinerary.write().unwrap_or_else(PoisonError::into_inner)
    }
}
