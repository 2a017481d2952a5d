//! TravelSmart server - itinerary route synthesis behind REST and WebSocket APIs.

pub mod api;
pub mod config;
pub mod pipeline;
pub mod publisher;
pub mod state;

use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the full application router with middleware.
pub fn app(state: Arc<AppState>) -> Router {
    api::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(api::request_id::ensure_request_id))
        .layer(CorsLayer::permissive())
}
