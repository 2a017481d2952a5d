//! TravelSmart Mapbox - routing and reverse-geocoding client
//!
//! Implements the core service contracts on top of the Mapbox
//! Directions and Geocoding HTTP APIs.

pub mod client;
pub mod token;

pub use client::{parse_country_code, parse_directions, MapboxClient, MapboxError, DEFAULT_BASE_URL};
pub use token::AccessToken;
