//! Generation-tagged publishing of derived itinerary state.
//!
//! Every rebuild takes a generation from [`GenerationPublisher::begin`]
//! before doing any work. Its result is only published if no newer
//! generation was started in the meantime; otherwise it is dropped.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

pub type Generation = u64;

/// A derived value as handed to the rendering side.
#[derive(Debug, Clone, Serialize)]
pub struct Published<T> {
    pub generation: Generation,
    pub computed_at: DateTime<Utc>,
    pub value: T,
}

pub struct GenerationPublisher<T> {
    latest: Mutex<Generation>,
    tx: watch::Sender<Published<T>>,
}

impl<T> GenerationPublisher<T> {
    /// Start at generation 0 with `initial` already published.
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(Published {
            generation: 0,
            computed_at: Utc::now(),
            value: initial,
        });
        Self {
            latest: Mutex::new(0),
            tx,
        }
    }

    /// Claim the next generation. Any in-flight rebuild becomes stale.
    pub fn begin(&self) -> Generation {
        let mut latest = self.lock();
        *latest += 1;
        *latest
    }

    /// Most recently started generation.
    pub fn latest(&self) -> Generation {
        *self.lock()
    }

    /// Publish `value` if `generation` is still the latest one started.
    ///
    /// The check and the send happen under the same lock as `begin`.
    pub fn publish(&self, generation: Generation, value: T) -> bool {
        let latest = self.lock();
        if *latest != generation {
            return false;
        }
        self.tx.send_replace(Published {
            generation,
            computed_at: Utc::now(),
            value,
        });
        true
    }

    pub fn subscribe(&self) -> watch::Receiver<Published<T>> {
        self.tx.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, Generation> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> GenerationPublisher<T> {
    pub fn current(&self) -> Published<T> {
        self.tx.borrow().clone()
    }
}
