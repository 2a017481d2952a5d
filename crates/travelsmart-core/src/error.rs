//! Error types for itinerary validation and edits.

use thiserror::Error;

use crate::models::DestinationId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid coordinate [{lon}, {lat}]: longitude must be within [-180, 180] and latitude within [-90, 90]")]
    InvalidCoordinate { lon: f64, lat: f64 },

    #[error("destination {id} must stay at least 1 day (got {days})")]
    InvalidDays { id: DestinationId, days: u32 },

    #[error("destination {0} not found")]
    UnknownDestination(DestinationId),

    #[error("duplicate destination id {0}")]
    DuplicateDestination(DestinationId),

    #[error("reorder index {index} out of range for itinerary of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no destination id left after {0}")]
    IdsExhausted(DestinationId),

    #[error("destination name must not be empty")]
    EmptyName,
}
