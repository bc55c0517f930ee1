//! Data transfer objects for web requests and responses.
//!
//! These are the visual primitives the frontend draws verbatim: markers,
//! lines, heatmap points, fly-to bounds and inline messages.

use serde::{Deserialize, Serialize};

use crate::analysis::{HeatmapData, Histogram};
use crate::domain::{BoundingBox, ShortDistancePair, Station, StationActivity, ZoningPlan};
use crate::view::MapViewState;

/// Search request.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Free-text search terms
    pub q: String,
}

/// Longest-distances request.
#[derive(Debug, Deserialize)]
pub struct LongestRequest {
    /// Number of relations to return (default 50)
    pub limit: Option<usize>,
}

/// Histogram request; without a plan the histogram covers all relations.
#[derive(Debug, Deserialize)]
pub struct HistogramRequest {
    /// Zoning plan URI
    pub plan: Option<String>,
}

/// Zoning-plan stats request.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    /// Zoning plan URI
    pub plan: String,
}

/// A station marker.
#[derive(Debug, Clone, Serialize)]
pub struct MarkerDto {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl MarkerDto {
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.to_string(),
            name: station.name.clone(),
            lat: station.pos.lat,
            lng: station.pos.lng,
        }
    }
}

/// A cluster-layer marker, flagged when the station has short distances
/// to drill into.
#[derive(Debug, Clone, Serialize)]
pub struct StationMarkerDto {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub has_short_distances: bool,
}

/// Fly-to bounds.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BoundsDto {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl From<BoundingBox> for BoundsDto {
    fn from(b: BoundingBox) -> Self {
        Self {
            lat_min: b.lat_min,
            lat_max: b.lat_max,
            lng_min: b.lng_min,
            lng_max: b.lng_max,
        }
    }
}

/// A line between two stations.
#[derive(Debug, Clone, Serialize)]
pub struct LineDto {
    /// [lat, lng] of the departure end
    pub from: [f64; 2],
    /// [lat, lng] of the arrival end
    pub to: [f64; 2],
    pub distance_m: u32,
}

/// Response for the cluster layer.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub count: usize,
    pub markers: Vec<StationMarkerDto>,
}

/// Response for a station search.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub count: usize,
    /// Inline message (minimum-length hint or empty-result notice)
    pub message: Option<String>,
    pub markers: Vec<MarkerDto>,
    /// Absent when there is nothing to fly to
    pub fly_to: Option<BoundsDto>,
}

/// One drill-down destination: a marker plus its relation distance.
#[derive(Debug, Clone, Serialize)]
pub struct DrilldownEntryDto {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub distance_m: u32,
}

/// Response for a short-distance drill-down.
#[derive(Debug, Serialize)]
pub struct DrilldownResponse {
    pub origin: MarkerDto,
    pub count: usize,
    /// "No short distances" notice when the result set is empty
    pub message: Option<String>,
    pub destinations: Vec<DrilldownEntryDto>,
    pub lines: Vec<LineDto>,
    /// Markers restored by implicitly clearing a previous drill-down
    pub restored: Vec<String>,
    /// Markers to hide from their origin layer while the drill-down is open
    pub displaced: Vec<String>,
    pub fly_to: Option<BoundsDto>,
}

/// A heatmap point.
#[derive(Debug, Clone, Serialize)]
pub struct HeatPointDto {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub count: u64,
}

/// Response for the short-distance-count heatmap.
#[derive(Debug, Serialize)]
pub struct HeatmapResponse {
    /// Maximum count, needed by the renderer for scaling
    pub max: u64,
    pub points: Vec<HeatPointDto>,
}

impl HeatmapResponse {
    pub fn from_data(data: &HeatmapData) -> Self {
        Self {
            max: data.max,
            points: data.points.iter().map(heat_point).collect(),
        }
    }
}

fn heat_point(activity: &StationActivity) -> HeatPointDto {
    HeatPointDto {
        name: activity.name.clone(),
        lat: activity.pos.lat,
        lng: activity.pos.lng,
        count: activity.count,
    }
}

/// One of the longest short distances.
#[derive(Debug, Clone, Serialize)]
pub struct PairDto {
    pub departure: MarkerDto,
    pub arrival: MarkerDto,
    pub distance_m: u32,
}

impl PairDto {
    pub fn from_pair(pair: &ShortDistancePair) -> Self {
        Self {
            departure: MarkerDto::from_station(&pair.departure),
            arrival: MarkerDto::from_station(&pair.arrival),
            distance_m: pair.distance_m,
        }
    }
}

/// Response for the longest-distances listing.
#[derive(Debug, Serialize)]
pub struct LongestResponse {
    pub count: usize,
    pub pairs: Vec<PairDto>,
    pub fly_to: Option<BoundsDto>,
}

/// One histogram bucket.
#[derive(Debug, Clone, Serialize)]
pub struct BucketDto {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

/// Response for a distance histogram.
#[derive(Debug, Serialize)]
pub struct HistogramResponse {
    pub total: usize,
    pub buckets: Vec<BucketDto>,
    pub too_long_percent: f64,
}

impl HistogramResponse {
    pub fn from_histogram(h: &Histogram) -> Self {
        Self {
            total: h.total,
            buckets: h
                .buckets
                .iter()
                .map(|b| BucketDto {
                    label: b.label.clone(),
                    count: b.count,
                    percent: b.percent,
                })
                .collect(),
            too_long_percent: h.too_long_percent,
        }
    }
}

/// A zoning plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlanDto {
    pub uri: String,
    pub name: String,
}

impl PlanDto {
    pub fn from_plan(plan: &ZoningPlan) -> Self {
        Self {
            uri: plan.uri.to_string(),
            name: plan.name.clone(),
        }
    }
}

/// Response listing all zoning plans.
#[derive(Debug, Serialize)]
pub struct ZoningPlansResponse {
    pub plans: Vec<PlanDto>,
}

/// Response for the stats of one zoning plan.
#[derive(Debug, Serialize)]
pub struct PlanStatsResponse {
    pub plan: String,
    pub station_count: usize,
    pub markers: Vec<MarkerDto>,
    pub histogram: HistogramResponse,
    pub fly_to: Option<BoundsDto>,
}

/// Snapshot of the map view state.
#[derive(Debug, Clone, Serialize)]
pub struct ViewDto {
    pub section: &'static str,
    pub zoom: u8,
    pub at_min_zoom: bool,
    pub at_max_zoom: bool,
    pub analysis: &'static str,
    pub active_layer: Option<&'static str>,
    pub drilldown_origin: Option<String>,
}

impl ViewDto {
    pub fn from_state(state: &MapViewState) -> Self {
        Self {
            section: state.section().as_str(),
            zoom: state.zoom(),
            at_min_zoom: state.at_min_zoom(),
            at_max_zoom: state.at_max_zoom(),
            analysis: state.analysis().as_str(),
            active_layer: state.active_layer().map(|l| l.as_str()),
            drilldown_origin: state.drilldown_origin().map(|id| id.to_string()),
        }
    }
}

/// Response for a view-state transition.
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub view: ViewDto,
    /// Markers restored to their origin layers by this transition
    pub restored: Vec<String>,
    pub fly_to: Option<BoundsDto>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LatLng, StationId};
    use crate::view::{LayerId, SidebarSection};

    fn station(id: &str, name: &str, lat: f64, lng: f64) -> Station {
        Station {
            id: StationId::parse(id).unwrap(),
            name: name.to_string(),
            pos: LatLng::new(lat, lng),
        }
    }

    #[test]
    fn marker_from_station() {
        let m = MarkerDto::from_station(&station("8503000", "Zürich HB", 47.378177, 8.540212));
        assert_eq!(m.id, "8503000");
        assert_eq!(m.name, "Zürich HB");
        assert_eq!(m.lat, 47.378177);
        assert_eq!(m.lng, 8.540212);
    }

    #[test]
    fn bounds_from_bounding_box() {
        let b = BoundingBox::from_points([LatLng::new(46.0, 7.0), LatLng::new(47.0, 8.0)]).unwrap();
        let dto = BoundsDto::from(b);
        assert_eq!(dto.lat_min, 46.0);
        assert_eq!(dto.lat_max, 47.0);
        assert_eq!(dto.lng_min, 7.0);
        assert_eq!(dto.lng_max, 8.0);
    }

    #[test]
    fn view_dto_from_state() {
        let mut state = MapViewState::new();
        state.enter_section(SidebarSection::Search);
        let dto = ViewDto::from_state(&state);
        assert_eq!(dto.section, "search");
        assert_eq!(dto.active_layer, Some(LayerId::SearchResults.as_str()));
        assert!(!dto.at_max_zoom);
        assert_eq!(dto.drilldown_origin, None);
    }

    #[test]
    fn heatmap_response_from_data() {
        let data = crate::analysis::heatmap(vec![StationActivity {
            name: "Bern".into(),
            pos: LatLng::new(46.9, 7.4),
            count: 12,
        }]);
        let resp = HeatmapResponse::from_data(&data);
        assert_eq!(resp.max, 12);
        assert_eq!(resp.points[0].name, "Bern");
    }
}
