//! The sidebar/zoom/drill-down state machine.

use crate::domain::{BoundingBox, StationId, SWITZERLAND};

use super::layers::{LayerId, LayerSet};

/// Zoom range of the tile layers.
pub const MIN_ZOOM: u8 = 7;
pub const MAX_ZOOM: u8 = 17;

/// Zoom level of the initial Switzerland-wide view.
const DEFAULT_ZOOM: u8 = 8;

/// The sidebar sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarSection {
    Welcome,
    Search,
    Distance,
    Options,
    Help,
    About,
}

impl SidebarSection {
    /// Parse a section from its route name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "welcome" => Some(Self::Welcome),
            "search" => Some(Self::Search),
            "distance" => Some(Self::Distance),
            "options" => Some(Self::Options),
            "help" => Some(Self::Help),
            "about" => Some(Self::About),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Search => "search",
            Self::Distance => "distance",
            Self::Options => "options",
            Self::Help => "help",
            Self::About => "about",
        }
    }
}

/// The analysis display selected in the Distance section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    Heatmap,
    LongestDistances,
    ZoningPlanChart,
}

impl AnalysisMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "heatmap" => Some(Self::Heatmap),
            "longest" => Some(Self::LongestDistances),
            "zoning" => Some(Self::ZoningPlanChart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Heatmap => "heatmap",
            Self::LongestDistances => "longest",
            Self::ZoningPlanChart => "zoning",
        }
    }

    /// The overlay layer this mode displays.
    pub fn layer(&self) -> LayerId {
        match self {
            Self::Heatmap => LayerId::Heatmap,
            Self::LongestDistances => LayerId::LongestDistances,
            Self::ZoningPlanChart => LayerId::ZoningPlanChart,
        }
    }
}

/// An active drill-down: the selected station and the bookkeeping needed
/// to undo it.
#[derive(Debug, Clone)]
pub struct Drilldown {
    pub origin: StationId,
    /// Markers moved out of their layer, with the layer to restore to.
    displaced: Vec<(StationId, LayerId)>,
    /// All markers currently on the drill-down layer.
    shown: Vec<StationId>,
}

/// Result of a sidebar section switch.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionTransition {
    /// Markers restored to their origin layers by clearing the drill-down.
    pub restored: Vec<StationId>,
    /// The single content layer now attached, if any.
    pub active_layer: Option<LayerId>,
}

/// Result of starting a drill-down.
#[derive(Debug, Clone, PartialEq)]
pub struct DrilldownTransition {
    /// Markers restored by implicitly clearing a previous drill-down.
    pub restored: Vec<StationId>,
    /// Markers moved from the cluster/search layers onto the drill-down
    /// layer (to be hidden from their origin layer client-side).
    pub displaced: Vec<StationId>,
}

/// The complete map view state: sidebar section, zoom, selected analysis,
/// marker ownership and any active drill-down.
#[derive(Debug, Clone)]
pub struct MapViewState {
    section: SidebarSection,
    zoom: u8,
    analysis: AnalysisMode,
    layers: LayerSet,
    drilldown: Option<Drilldown>,
}

impl Default for MapViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl MapViewState {
    pub fn new() -> Self {
        Self {
            section: SidebarSection::Welcome,
            zoom: DEFAULT_ZOOM,
            analysis: AnalysisMode::Heatmap,
            layers: LayerSet::new(),
            drilldown: None,
        }
    }

    pub fn section(&self) -> SidebarSection {
        self.section
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn analysis(&self) -> AnalysisMode {
        self.analysis
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    pub fn drilldown_origin(&self) -> Option<&StationId> {
        self.drilldown.as_ref().map(|d| &d.origin)
    }

    /// The single content layer attached for the current section.
    pub fn active_layer(&self) -> Option<LayerId> {
        match self.section {
            SidebarSection::Welcome => Some(LayerId::Cluster),
            SidebarSection::Search => Some(LayerId::SearchResults),
            SidebarSection::Distance => Some(self.analysis.layer()),
            SidebarSection::Options | SidebarSection::Help | SidebarSection::About => None,
        }
    }

    /// Enter a sidebar section: detach all layers, clear any drill-down,
    /// then attach exactly the section's default layer.
    pub fn enter_section(&mut self, section: SidebarSection) -> SectionTransition {
        let restored = self.reset_drilldown();
        self.section = section;
        SectionTransition {
            restored,
            active_layer: self.active_layer(),
        }
    }

    /// Select the analysis display; returns the now-active layer (only a
    /// visible change while the Distance section is open).
    pub fn set_analysis(&mut self, mode: AnalysisMode) -> Option<LayerId> {
        self.analysis = mode;
        self.active_layer()
    }

    /// Increase zoom by one, saturating at the maximum.
    pub fn zoom_in(&mut self) -> u8 {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
        self.zoom
    }

    /// Decrease zoom by one, saturating at the minimum.
    pub fn zoom_out(&mut self) -> u8 {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
        self.zoom
    }

    /// Set the zoom level, clamped to the valid range.
    pub fn set_zoom(&mut self, level: u8) -> u8 {
        self.zoom = level.clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom
    }

    pub fn at_max_zoom(&self) -> bool {
        self.zoom == MAX_ZOOM
    }

    pub fn at_min_zoom(&self) -> bool {
        self.zoom == MIN_ZOOM
    }

    /// Bounds for the "center map" action.
    pub fn center(&self) -> BoundingBox {
        SWITZERLAND
    }

    /// Record that a station's marker sits on the given layer.
    ///
    /// Markers currently borrowed by a drill-down keep their place; the
    /// drill-down's restore bookkeeping would otherwise be invalidated.
    pub fn register_marker(&mut self, station: StationId, layer: LayerId) {
        if self.layers.owner(&station) == Some(LayerId::Drilldown) {
            return;
        }
        self.layers.attach(station, layer);
    }

    /// Start a drill-down on `origin`, moving each arrival's marker out of
    /// the cluster/search layers onto the drill-down layer.
    ///
    /// Any previous drill-down (same station or not) is cleared first, so
    /// a newer click can never be corrupted by leftover state.
    pub fn begin_drilldown(
        &mut self,
        origin: StationId,
        arrivals: &[StationId],
    ) -> DrilldownTransition {
        let restored = self.reset_drilldown();

        let mut displaced = Vec::new();
        let mut shown = Vec::new();
        for id in arrivals {
            match self.layers.owner(id) {
                Some(prev @ (LayerId::Cluster | LayerId::SearchResults)) => {
                    displaced.push((id.clone(), prev));
                }
                _ => {}
            }
            self.layers.attach(id.clone(), LayerId::Drilldown);
            shown.push(id.clone());
        }

        let displaced_ids = displaced.iter().map(|(id, _)| id.clone()).collect();
        self.drilldown = Some(Drilldown {
            origin,
            displaced,
            shown,
        });

        DrilldownTransition {
            restored,
            displaced: displaced_ids,
        }
    }

    /// Clear the drill-down layer and re-insert every displaced marker
    /// into the layer it came from. Idempotent.
    pub fn reset_drilldown(&mut self) -> Vec<StationId> {
        let Some(drilldown) = self.drilldown.take() else {
            return Vec::new();
        };

        for id in &drilldown.shown {
            self.layers.detach(id);
        }

        let mut restored = Vec::new();
        for (id, layer) in drilldown.displaced {
            self.layers.attach(id.clone(), layer);
            restored.push(id);
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> StationId {
        StationId::parse(s).unwrap()
    }

    fn state_with_cluster(ids: &[&str]) -> MapViewState {
        let mut state = MapViewState::new();
        for s in ids {
            state.register_marker(id(s), LayerId::Cluster);
        }
        state
    }

    #[test]
    fn initial_state() {
        let state = MapViewState::new();
        assert_eq!(state.section(), SidebarSection::Welcome);
        assert_eq!(state.active_layer(), Some(LayerId::Cluster));
        assert_eq!(state.drilldown_origin(), None);
    }

    #[test]
    fn section_layer_mapping() {
        let mut state = MapViewState::new();

        let t = state.enter_section(SidebarSection::Search);
        assert_eq!(t.active_layer, Some(LayerId::SearchResults));

        let t = state.enter_section(SidebarSection::Distance);
        assert_eq!(t.active_layer, Some(LayerId::Heatmap));

        for section in [
            SidebarSection::Options,
            SidebarSection::Help,
            SidebarSection::About,
        ] {
            let t = state.enter_section(section);
            assert_eq!(t.active_layer, None);
        }
    }

    #[test]
    fn distance_section_uses_last_selected_analysis() {
        let mut state = MapViewState::new();
        state.set_analysis(AnalysisMode::ZoningPlanChart);
        state.enter_section(SidebarSection::Welcome);

        let t = state.enter_section(SidebarSection::Distance);
        assert_eq!(t.active_layer, Some(LayerId::ZoningPlanChart));
    }

    #[test]
    fn zoom_clamps_at_bounds() {
        let mut state = MapViewState::new();
        assert_eq!(state.set_zoom(30), MAX_ZOOM);
        assert!(state.at_max_zoom());
        assert_eq!(state.zoom_in(), MAX_ZOOM);

        assert_eq!(state.set_zoom(1), MIN_ZOOM);
        assert!(state.at_min_zoom());
        assert_eq!(state.zoom_out(), MIN_ZOOM);

        assert_eq!(state.set_zoom(12), 12);
        assert_eq!(state.zoom_in(), 13);
        assert_eq!(state.zoom_out(), 12);
    }

    #[test]
    fn drilldown_displaces_and_restores() {
        let mut state = state_with_cluster(&["1", "2", "3"]);

        let t = state.begin_drilldown(id("1"), &[id("2"), id("3")]);
        assert!(t.restored.is_empty());
        assert_eq!(t.displaced.len(), 2);
        assert_eq!(state.layers().owner(&id("2")), Some(LayerId::Drilldown));
        assert_eq!(state.drilldown_origin(), Some(&id("1")));

        let restored = state.reset_drilldown();
        assert_eq!(restored.len(), 2);
        assert_eq!(state.layers().owner(&id("2")), Some(LayerId::Cluster));
        assert_eq!(state.layers().owner(&id("3")), Some(LayerId::Cluster));
        assert_eq!(state.drilldown_origin(), None);
    }

    #[test]
    fn reset_drilldown_is_idempotent() {
        let mut state = state_with_cluster(&["1", "2"]);
        state.begin_drilldown(id("1"), &[id("2")]);

        assert_eq!(state.reset_drilldown().len(), 1);
        assert!(state.reset_drilldown().is_empty());
        assert_eq!(state.layers().owner(&id("2")), Some(LayerId::Cluster));
    }

    #[test]
    fn entering_welcome_after_drilldown_restores_cluster_markers() {
        let mut state = state_with_cluster(&["1", "2", "3"]);
        state.begin_drilldown(id("1"), &[id("2"), id("3")]);

        let t = state.enter_section(SidebarSection::Welcome);
        assert_eq!(t.active_layer, Some(LayerId::Cluster));
        let mut restored: Vec<String> = t.restored.iter().map(|i| i.to_string()).collect();
        restored.sort();
        assert_eq!(restored, ["2", "3"]);
        assert_eq!(state.layers().stations_in(LayerId::Drilldown).len(), 0);
        assert_eq!(state.layers().stations_in(LayerId::Cluster).len(), 3);
    }

    #[test]
    fn new_drilldown_implicitly_resets_previous() {
        let mut state = state_with_cluster(&["1", "2", "3", "4"]);
        state.begin_drilldown(id("1"), &[id("2")]);

        let t = state.begin_drilldown(id("3"), &[id("4")]);
        let restored: Vec<String> = t.restored.iter().map(|i| i.to_string()).collect();
        assert_eq!(restored, ["2"]);
        assert_eq!(state.layers().owner(&id("2")), Some(LayerId::Cluster));
        assert_eq!(state.layers().owner(&id("4")), Some(LayerId::Drilldown));
        assert_eq!(state.drilldown_origin(), Some(&id("3")));
    }

    #[test]
    fn drilldown_arrival_unknown_to_any_layer() {
        // Arrivals that were never registered (not in the cluster) are shown
        // on the drill-down layer and simply removed again on reset.
        let mut state = state_with_cluster(&["1"]);
        let t = state.begin_drilldown(id("1"), &[id("99")]);
        assert!(t.displaced.is_empty());
        assert_eq!(state.layers().owner(&id("99")), Some(LayerId::Drilldown));

        let restored = state.reset_drilldown();
        assert!(restored.is_empty());
        assert_eq!(state.layers().owner(&id("99")), None);
    }

    #[test]
    fn search_markers_restore_to_search_layer() {
        let mut state = MapViewState::new();
        state.register_marker(id("5"), LayerId::SearchResults);
        state.begin_drilldown(id("1"), &[id("5")]);
        state.reset_drilldown();
        assert_eq!(
            state.layers().owner(&id("5")),
            Some(LayerId::SearchResults)
        );
    }

    #[test]
    fn register_marker_does_not_steal_from_drilldown() {
        let mut state = state_with_cluster(&["1", "2"]);
        state.begin_drilldown(id("1"), &[id("2")]);
        state.register_marker(id("2"), LayerId::Cluster);
        assert_eq!(state.layers().owner(&id("2")), Some(LayerId::Drilldown));

        state.reset_drilldown();
        assert_eq!(state.layers().owner(&id("2")), Some(LayerId::Cluster));
    }

    #[test]
    fn parse_section_names() {
        assert_eq!(
            SidebarSection::parse("welcome"),
            Some(SidebarSection::Welcome)
        );
        assert_eq!(SidebarSection::parse("about"), Some(SidebarSection::About));
        assert_eq!(SidebarSection::parse("bogus"), None);
        assert_eq!(SidebarSection::Distance.as_str(), "distance");
    }

    #[test]
    fn parse_analysis_modes() {
        assert_eq!(AnalysisMode::parse("heatmap"), Some(AnalysisMode::Heatmap));
        assert_eq!(
            AnalysisMode::parse("longest"),
            Some(AnalysisMode::LongestDistances)
        );
        assert_eq!(
            AnalysisMode::parse("zoning"),
            Some(AnalysisMode::ZoningPlanChart)
        );
        assert_eq!(AnalysisMode::parse(""), None);
    }
}
