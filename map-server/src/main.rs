use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use map_server::analysis::BucketConfig;
use map_server::cache::{CacheConfig, CachedSparqlClient};
use map_server::sparql::{SparqlClient, SparqlConfig};
use map_server::stations::StationIndex;
use map_server::web::{AppState, create_router};

/// How often to refresh the station list (24 hours).
const STATION_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Endpoint and histogram settings come from the environment; every
    // variable has a sensible default.
    let sparql_config = match std::env::var("LINDAS_ENDPOINT") {
        Ok(endpoint) => SparqlConfig::new(endpoint),
        Err(_) => SparqlConfig::default(),
    };

    let buckets = BucketConfig {
        width_m: env_u32("BUCKET_WIDTH_M", BucketConfig::default().width_m),
        max_m: env_u32("BUCKET_MAX_M", BucketConfig::default().max_m),
        too_long_threshold_m: env_u32(
            "TOO_LONG_THRESHOLD_M",
            BucketConfig::default().too_long_threshold_m,
        ),
    }
    .sanitized();

    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()
        .expect("BIND_ADDR must be a socket address like 127.0.0.1:3000");

    // Create SPARQL client
    let client = SparqlClient::new(sparql_config).expect("Failed to create SPARQL client");
    let sparql = Arc::new(CachedSparqlClient::new(client, &CacheConfig::default()));

    // Fetch the station list (fail fast if the endpoint is unavailable)
    tracing::info!("Fetching stations...");
    let stations = StationIndex::fetch(sparql.clone())
        .await
        .expect("Failed to fetch stations");
    tracing::info!("Loaded {} stations", stations.len().await);

    // Spawn background task to refresh the station list daily
    let stations_refresh = stations.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STATION_REFRESH_INTERVAL);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match stations_refresh.refresh().await {
                Ok(count) => tracing::info!("Refreshed station list: {count} stations"),
                Err(e) => tracing::error!("Failed to refresh station list: {e}"),
            }
        }
    });

    // Build app state and router
    let state = AppState::new(sparql, stations, buckets);
    let app = create_router(state, &static_dir);

    tracing::info!("Short-distance map listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}

/// Read a u32 from the environment, falling back to `default` when the
/// variable is unset or unparsable.
fn env_u32(name: &str, default: u32) -> u32 {
    match std::env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!("ignoring {name}={raw}: not a number, using {default}");
                default
            }
        },
        Err(_) => default,
    }
}
