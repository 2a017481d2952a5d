//! TravelSmart CLI - Command line tools for itinerary routing.
//!
//! This crate provides the CLI binaries:
//! - plan_itinerary: resolve an itinerary file to GeoJSON

pub mod plan;

pub use plan::{load_itinerary, parse_itinerary, plan_itinerary};
