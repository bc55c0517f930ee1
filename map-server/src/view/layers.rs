//! Overlay layers and marker ownership.

use std::collections::HashMap;

use crate::domain::StationId;

/// The named overlay layers of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerId {
    /// Default layer clustering all stations.
    Cluster,
    /// Markers matching the current search.
    SearchResults,
    /// Short-distance count heatmap.
    Heatmap,
    /// The N longest short distances.
    LongestDistances,
    /// Zoning-plan chart overlay.
    ZoningPlanChart,
    /// Destinations of the currently drilled-down station.
    Drilldown,
}

impl LayerId {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerId::Cluster => "cluster",
            LayerId::SearchResults => "search-results",
            LayerId::Heatmap => "heatmap",
            LayerId::LongestDistances => "longest-distances",
            LayerId::ZoningPlanChart => "zoning-plan-chart",
            LayerId::Drilldown => "drilldown",
        }
    }
}

/// Tracks which layer owns each station's marker.
///
/// A marker belongs to exactly one layer at any instant. Detaching a
/// marker that is not present is a no-op rather than an error, so callers
/// never need to guard removal.
#[derive(Debug, Clone, Default)]
pub struct LayerSet {
    owner: HashMap<StationId, LayerId>,
}

impl LayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a station's marker to a layer, returning the previous owner.
    pub fn attach(&mut self, station: StationId, layer: LayerId) -> Option<LayerId> {
        self.owner.insert(station, layer)
    }

    /// Remove a station's marker from whichever layer holds it.
    ///
    /// Idempotent: absent markers return `None`.
    pub fn detach(&mut self, station: &StationId) -> Option<LayerId> {
        self.owner.remove(station)
    }

    /// The layer currently holding the station's marker.
    pub fn owner(&self, station: &StationId) -> Option<LayerId> {
        self.owner.get(station).copied()
    }

    /// All stations whose marker sits on the given layer, sorted by ID for
    /// deterministic output.
    pub fn stations_in(&self, layer: LayerId) -> Vec<StationId> {
        let mut ids: Vec<StationId> = self
            .owner
            .iter()
            .filter(|(_, l)| **l == layer)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids
    }

    pub fn len(&self) -> usize {
        self.owner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_empty()
    }
}
