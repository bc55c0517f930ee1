//! Station index.
//!
//! All stations are fetched once at startup and kept in memory with a
//! daily background refresh, so the cluster layer and drill-down origin
//! lookups never wait on the endpoint.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::CachedSparqlClient;
use crate::domain::{Station, StationId};
use crate::sparql::SparqlError;

/// Thread-safe station lookup with support for background refresh.
#[derive(Clone)]
pub struct StationIndex {
    inner: Arc<RwLock<Inner>>,
    sparql: Arc<CachedSparqlClient>,
}

struct Inner {
    list: Arc<Vec<Station>>,
    by_id: HashMap<StationId, usize>,
}

impl StationIndex {
    /// Create a new index by fetching all stations.
    ///
    /// Fails if the endpoint is unreachable; the server refuses to start
    /// without station data.
    pub async fn fetch(sparql: Arc<CachedSparqlClient>) -> Result<Self, SparqlError> {
        let list = sparql.stations().await?;
        Ok(Self {
            inner: Arc::new(RwLock::new(build(list))),
            sparql,
        })
    }

    /// The full station list.
    pub async fn all(&self) -> Arc<Vec<Station>> {
        let guard = self.inner.read().await;
        guard.list.clone()
    }

    /// Look up a station by ID.
    pub async fn get(&self, id: &StationId) -> Option<Station> {
        let guard = self.inner.read().await;
        let idx = *guard.by_id.get(id)?;
        guard.list.get(idx).cloned()
    }

    /// Number of indexed stations.
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.list.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Refetch the station list and replace the index.
    ///
    /// On failure the existing index is preserved and the error returned.
    pub async fn refresh(&self) -> Result<usize, SparqlError> {
        self.sparql.invalidate_stations();
        let list = self.sparql.stations().await?;
        let count = list.len();

        let mut guard = self.inner.write().await;
        *guard = build(list);

        Ok(count)
    }
}

/// Build the ID → position lookup over the station list.
fn build(list: Arc<Vec<Station>>) -> Inner {
    let by_id = list
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.clone(), i))
        .collect();
    Inner { list, by_id }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LatLng;

    fn station(id: &str, name: &str) -> Station {
        Station {
            id: StationId::parse(id).unwrap(),
            name: name.to_string(),
            pos: LatLng::new(47.0, 8.0),
        }
    }

    #[test]
    fn build_indexes_by_id() {
        let list = Arc::new(vec![
            station("8503000", "Zürich HB"),
            station("8507000", "Bern"),
        ]);
        let inner = build(list);
        assert_eq!(
            inner.by_id[&StationId::parse("8507000").unwrap()],
            1
        );
        assert_eq!(inner.list.len(), 2);
    }

    #[test]
    fn build_last_entry_wins_on_duplicate_id() {
        let list = Arc::new(vec![
            station("8503000", "Zürich HB"),
            station("8503000", "Zürich HB (duplicate)"),
        ]);
        let inner = build(list);
        assert_eq!(inner.by_id[&StationId::parse("8503000").unwrap()], 1);
    }
}
