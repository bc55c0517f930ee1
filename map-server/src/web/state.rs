//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::analysis::BucketConfig;
use crate::cache::CachedSparqlClient;
use crate::stations::StationIndex;
use crate::view::MapViewState;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cached SPARQL client
    pub sparql: Arc<CachedSparqlClient>,

    /// Station index (startup snapshot, refreshed daily)
    pub stations: StationIndex,

    /// The single shared map view state
    pub view: Arc<RwLock<MapViewState>>,

    /// Histogram configuration
    pub buckets: Arc<BucketConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        sparql: Arc<CachedSparqlClient>,
        stations: StationIndex,
        buckets: BucketConfig,
    ) -> Self {
        Self {
            sparql,
            stations,
            view: Arc::new(RwLock::new(MapViewState::new())),
            buckets: Arc::new(buckets),
        }
    }
}
