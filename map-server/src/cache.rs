//! Caching layer for SPARQL responses.
//!
//! The underlying data (stations, fare relations, zoning plans) changes on
//! the order of days, while the UI re-requests it on every interaction.
//! Each query family gets its own moka cache with a TTL, and lookups go
//! through `try_get_with` so concurrent requests for the same key share a
//! single in-flight fetch: rapid repeated clicks on one station can no
//! longer race each other with overlapping drill-down fetches.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{PlanUri, ShortDistance, ShortDistancePair, Station, StationActivity, StationId, ZoningPlan};
use crate::sparql::{convert, query, Row, SparqlClient, SparqlError};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for the station list and active-ID set.
    pub station_ttl: Duration,

    /// TTL for relation data (drill-downs, analysis products).
    pub relation_ttl: Duration,

    /// Maximum number of entries per keyed cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            station_ttl: Duration::from_secs(60 * 60),
            relation_ttl: Duration::from_secs(10 * 60),
            max_capacity: 1000,
        }
    }
}

/// SPARQL client with per-query-family caching and request coalescing.
pub struct CachedSparqlClient {
    client: SparqlClient,
    stations: MokaCache<(), Arc<Vec<Station>>>,
    active_ids: MokaCache<(), Arc<HashSet<StationId>>>,
    short_distances: MokaCache<StationId, Arc<Vec<ShortDistance>>>,
    activity: MokaCache<(), Arc<Vec<StationActivity>>>,
    longest: MokaCache<usize, Arc<Vec<ShortDistancePair>>>,
    distances: MokaCache<Option<PlanUri>, Arc<Vec<u32>>>,
    plans: MokaCache<(), Arc<Vec<ZoningPlan>>>,
    plan_stations: MokaCache<PlanUri, Arc<Vec<Station>>>,
}

impl CachedSparqlClient {
    /// Create a new cached client.
    pub fn new(client: SparqlClient, config: &CacheConfig) -> Self {
        fn cache<K, V>(ttl: Duration, capacity: u64) -> MokaCache<K, V>
        where
            K: std::hash::Hash + Eq + Send + Sync + 'static,
            V: Clone + Send + Sync + 'static,
        {
            MokaCache::builder()
                .time_to_live(ttl)
                .max_capacity(capacity)
                .build()
        }

        Self {
            client,
            stations: cache(config.station_ttl, 1),
            active_ids: cache(config.station_ttl, 1),
            short_distances: cache(config.relation_ttl, config.max_capacity),
            activity: cache(config.relation_ttl, 1),
            longest: cache(config.relation_ttl, config.max_capacity),
            distances: cache(config.relation_ttl, config.max_capacity),
            plans: cache(config.relation_ttl, 1),
            plan_stations: cache(config.relation_ttl, config.max_capacity),
        }
    }

    /// All stations (cluster layer payload and index source).
    pub async fn stations(&self) -> Result<Arc<Vec<Station>>, SparqlError> {
        self.stations
            .try_get_with((), async {
                let rows = self.client.select(&query::all_stations()).await?;
                Ok(Arc::new(collect_rows(rows, "station", convert::station)))
            })
            .await
            .map_err(SparqlError::from)
    }

    /// IDs of stations that have at least one departing short distance.
    pub async fn active_station_ids(&self) -> Result<Arc<HashSet<StationId>>, SparqlError> {
        self.active_ids
            .try_get_with((), async {
                let rows = self
                    .client
                    .select(&query::station_ids_with_short_distances())
                    .await?;
                let ids = rows
                    .iter()
                    .filter_map(|row| {
                        let raw = row.str("id").ok()?;
                        StationId::parse(raw).ok()
                    })
                    .collect();
                Ok(Arc::new(ids))
            })
            .await
            .map_err(SparqlError::from)
    }

    /// Stations matching the given search terms.
    ///
    /// Not cached: terms are user input with effectively unbounded
    /// cardinality, and the endpoint answers these quickly.
    pub async fn search_stations(&self, terms: &str) -> Result<Vec<Station>, SparqlError> {
        let rows = self.client.select(&query::stations_matching(terms)).await?;
        Ok(collect_rows(rows, "station", convert::station))
    }

    /// All short distances departing the given station.
    pub async fn short_distances(
        &self,
        station: &StationId,
    ) -> Result<Arc<Vec<ShortDistance>>, SparqlError> {
        self.short_distances
            .try_get_with(station.clone(), async {
                let rows = self
                    .client
                    .select(&query::short_distances_for(station))
                    .await?;
                Ok(Arc::new(collect_rows(
                    rows,
                    "short distance",
                    convert::short_distance,
                )))
            })
            .await
            .map_err(SparqlError::from)
    }

    /// Per-station short-distance counts (heatmap input).
    pub async fn station_activity(&self) -> Result<Arc<Vec<StationActivity>>, SparqlError> {
        self.activity
            .try_get_with((), async {
                let rows = self
                    .client
                    .select(&query::short_distance_count_by_station())
                    .await?;
                Ok(Arc::new(collect_rows(
                    rows,
                    "activity",
                    convert::station_activity,
                )))
            })
            .await
            .map_err(SparqlError::from)
    }

    /// The `limit` longest short distances.
    pub async fn longest_short_distances(
        &self,
        limit: usize,
    ) -> Result<Arc<Vec<ShortDistancePair>>, SparqlError> {
        self.longest
            .try_get_with(limit, async {
                let rows = self
                    .client
                    .select(&query::longest_short_distances(limit))
                    .await?;
                Ok(Arc::new(collect_rows(
                    rows,
                    "relation",
                    convert::short_distance_pair,
                )))
            })
            .await
            .map_err(SparqlError::from)
    }

    /// Distances of all relations, optionally restricted to one zoning plan.
    pub async fn distances(&self, plan: Option<&PlanUri>) -> Result<Arc<Vec<u32>>, SparqlError> {
        self.distances
            .try_get_with(plan.cloned(), async {
                let q = match plan {
                    Some(plan) => query::distances_for_zoning_plan(plan),
                    None => query::distances_of_all_short_distances(),
                };
                let rows = self.client.select(&q).await?;
                Ok(Arc::new(collect_rows(rows, "distance", convert::distance)))
            })
            .await
            .map_err(SparqlError::from)
    }

    /// All zoning plans.
    pub async fn zoning_plans(&self) -> Result<Arc<Vec<ZoningPlan>>, SparqlError> {
        self.plans
            .try_get_with((), async {
                let rows = self.client.select(&query::zoning_plans()).await?;
                Ok(Arc::new(collect_rows(
                    rows,
                    "zoning plan",
                    convert::zoning_plan,
                )))
            })
            .await
            .map_err(SparqlError::from)
    }

    /// Departure stations of relations within the given zoning plan.
    pub async fn zoning_plan_stations(
        &self,
        plan: &PlanUri,
    ) -> Result<Arc<Vec<Station>>, SparqlError> {
        self.plan_stations
            .try_get_with(plan.clone(), async {
                let rows = self
                    .client
                    .select(&query::zoning_plan_stations(plan))
                    .await?;
                Ok(Arc::new(collect_rows(
                    rows,
                    "station",
                    convert::station_with_wkt,
                )))
            })
            .await
            .map_err(SparqlError::from)
    }

    /// Drop the cached station list so the next fetch hits the endpoint.
    pub fn invalidate_stations(&self) {
        self.stations.invalidate_all();
        self.active_ids.invalidate_all();
    }
}

/// Convert rows, skipping (and logging) any that fail.
///
/// One malformed binding must not take down a whole result set; the
/// endpoint occasionally serves stops without coordinates.
fn collect_rows<T>(
    rows: Vec<Row>,
    what: &str,
    f: impl Fn(&Row) -> Result<T, SparqlError>,
) -> Vec<T> {
    rows.iter()
        .filter_map(|row| match f(row) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("skipping malformed {what} row: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparql::{SparqlConfig, Term};

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.station_ttl, Duration::from_secs(3600));
        assert_eq!(config.relation_ttl, Duration::from_secs(600));
        assert_eq!(config.max_capacity, 1000);
    }

    #[test]
    fn cached_client_creation() {
        let client = SparqlClient::new(SparqlConfig::default()).unwrap();
        let _cached = CachedSparqlClient::new(client, &CacheConfig::default());
    }

    #[test]
    fn collect_rows_skips_malformed() {
        let good = Row::new([
            ("id".to_string(), Term::literal("8503000")),
            ("name".to_string(), Term::literal("Zürich HB")),
            ("lat".to_string(), Term::literal("47.378177")),
            ("lng".to_string(), Term::literal("8.540212")),
        ]);
        let bad = Row::new([
            ("id".to_string(), Term::literal("8507000")),
            ("name".to_string(), Term::literal("Bern")),
            // no coordinates
        ]);

        let stations = collect_rows(vec![good, bad], "station", convert::station);
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "Zürich HB");
    }
}
