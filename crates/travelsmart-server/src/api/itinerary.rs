//! Itinerary editing endpoints.
//!
//! Every successful edit that changes the itinerary replaces the current
//! snapshot and triggers a rebuild of routes and visited countries.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use travelsmart_core::{
    CoreError, Destination, DestinationId, Itinerary, NewDestination, TransportMode,
};

use crate::api::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ItineraryResponse {
    pub destinations: Vec<Destination>,
    pub total_days: u64,
}

impl From<&Itinerary> for ItineraryResponse {
    fn from(itinerary: &Itinerary) -> Self {
        Self {
            destinations: itinerary.destinations().to_vec(),
            total_days: itinerary.total_days(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PatchDestination {
    pub days: Option<u32>,
    pub transport: Option<TransportMode>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

/// Get the current itinerary.
pub async fn get_itinerary(State(state): State<Arc<AppState>>) -> Json<ItineraryResponse> {
    Json(ItineraryResponse::from(state.itinerary().as_ref()))
}

/// Replace the whole itinerary.
pub async fn replace_itinerary(
    State(state): State<Arc<AppState>>,
    Json(destinations): Json<Vec<Destination>>,
) -> Result<Json<ItineraryResponse>, ApiError> {
    let itinerary = Itinerary::from_destinations(destinations)?;
    let snapshot = state.replace(itinerary);
    tracing::info!(destinations = snapshot.len(), "Replaced itinerary");
    Ok(Json(ItineraryResponse::from(snapshot.as_ref())))
}

/// Append a destination.
pub async fn add_destination(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewDestination>,
) -> Result<(StatusCode, Json<Destination>), ApiError> {
    let (id, snapshot) = state.edit(|itinerary| itinerary.add(req))?;
    let destination = snapshot
        .get(id)
        .cloned()
        .ok_or(ApiError::Itinerary(CoreError::UnknownDestination(id)))?;
    tracing::info!(id, city = %destination.city, "Added destination");
    Ok((StatusCode::CREATED, Json(destination)))
}

/// Update days and/or transport of a destination.
pub async fn update_destination(
    State(state): State<Arc<AppState>>,
    Path(id): Path<DestinationId>,
    Json(req): Json<PatchDestination>,
) -> Result<Json<Destination>, ApiError> {
    let (_, snapshot) = state.edit(|itinerary| {
        if let Some(days) = req.days {
            itinerary.set_days(id, days)?;
        }
        if let Some(transport) = req.transport {
            itinerary.set_transport(id, transport)?;
        }
        // An empty patch still has to name an existing destination.
        itinerary
            .get(id)
            .map(|_| ())
            .ok_or(CoreError::UnknownDestination(id))
    })?;
    let destination = snapshot
        .get(id)
        .cloned()
        .ok_or(ApiError::Itinerary(CoreError::UnknownDestination(id)))?;
    Ok(Json(destination))
}

/// Remove a destination.
pub async fn delete_destination(
    State(state): State<Arc<AppState>>,
    Path(id): Path<DestinationId>,
) -> Result<StatusCode, ApiError> {
    let (removed, _) = state.edit(|itinerary| itinerary.remove(id))?;
    tracing::info!(id, city = %removed.city, "Removed destination");
    Ok(StatusCode::NO_CONTENT)
}

/// Move a destination from one position to another.
pub async fn reorder_destinations(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<ItineraryResponse>, ApiError> {
    let (moved, snapshot) = state.edit(|itinerary| itinerary.reorder(req.from, req.to))?;
    if moved {
        tracing::info!(from = req.from, to = req.to, "Reordered itinerary");
    }
    Ok(Json(ItineraryResponse::from(snapshot.as_ref())))
}
