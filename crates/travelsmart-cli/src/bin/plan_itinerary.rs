//! CLI tool to resolve an itinerary file into map-ready GeoJSON.
//!
//! Legs travelled by car, bike or on foot are routed through Mapbox when a
//! token is available; everything else is drawn as a great circle.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use travelsmart_cli::{load_itinerary, plan_itinerary};
use travelsmart_mapbox::{AccessToken, MapboxClient, DEFAULT_BASE_URL};

/// Resolve routes and visited countries for an itinerary
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON file with an array of destinations
    #[arg(long)]
    input: PathBuf,

    /// Mapbox access token
    #[arg(long, env = "MAPBOX_ACCESS_TOKEN")]
    token: Option<String>,

    /// Mapbox API base URL
    #[arg(long, env = "MAPBOX_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Per-request timeout in milliseconds
    #[arg(
        long,
        env = "TRAVELSMART_REQUEST_TIMEOUT_MS",
        default_value_t = 5000,
        value_parser = clap::value_parser!(u64).range(100..)
    )]
    timeout_ms: u64,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("travelsmart_cli=info".parse()?),
        )
        .init();

    let itinerary = load_itinerary(&args.input)?;
    let timeout = Duration::from_millis(args.timeout_ms);

    let client = match args.token.as_deref().and_then(AccessToken::parse) {
        Some(token) => Some(Arc::new(MapboxClient::new(&args.api_url, token, timeout)?)),
        None => {
            tracing::warn!("No usable Mapbox access token; drawing great circles only");
            None
        }
    };

    let collection = plan_itinerary(&itinerary, client.clone(), client.as_deref(), timeout).await;

    let output = if args.pretty {
        serde_json::to_string_pretty(&collection)?
    } else {
        serde_json::to_string(&collection)?
    };
    println!("{output}");
    Ok(())
}
