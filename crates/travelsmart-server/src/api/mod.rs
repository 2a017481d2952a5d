//! API routes for the itinerary server.

pub mod error;
pub mod itinerary;
pub mod request_id;
mod routes;
pub mod ws;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    routes::create_router()
}

#[cfg(test)]
mod tests;
