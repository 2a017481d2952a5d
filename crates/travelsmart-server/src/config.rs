//! Server configuration from environment.

use std::env;
use std::time::Duration;

use travelsmart_mapbox::{AccessToken, DEFAULT_BASE_URL};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
const MIN_REQUEST_TIMEOUT_MS: u64 = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// `None` when the token is missing or malformed; the pipeline then
    /// draws great circles only and skips country resolution.
    pub mapbox_token: Option<AccessToken>,
    pub mapbox_api_url: String,
    /// Upper bound for each routing or geocoding call.
    pub request_timeout: Duration,
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mapbox_token = lookup("MAPBOX_ACCESS_TOKEN")
            .or_else(|| lookup("NEXT_PUBLIC_MAPBOX_ACCESS_TOKEN"))
            .and_then(|raw| AccessToken::parse(&raw));

        Self {
            server_port: lookup("TRAVELSMART_PORT")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            mapbox_token,
            mapbox_api_url: lookup("MAPBOX_API_URL")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout: request_timeout_from_ms(
                lookup("TRAVELSMART_REQUEST_TIMEOUT_MS").and_then(|s| s.trim().parse().ok()),
            ),
            seed_demo: lookup("TRAVELSMART_SEED_DEMO")
                .map(|s| parse_flag(&s))
                .unwrap_or(true),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            mapbox_token: None,
            mapbox_api_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: request_timeout_from_ms(None),
            seed_demo: false,
        }
    }
}

/// Clamp a configured timeout, falling back to the default when unset.
pub fn request_timeout_from_ms(ms: Option<u64>) -> Duration {
    let ms = ms
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS)
        .max(MIN_REQUEST_TIMEOUT_MS);
    Duration::from_millis(ms)
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
