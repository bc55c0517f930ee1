//! Map view state.
//!
//! The map, its overlay layers and the current analysis selection live in
//! one explicit [`MapViewState`] owned by the web layer; every transition
//! (sidebar navigation, zoom, drill-down) goes through a method that keeps
//! the layer invariants intact.

mod layers;
mod state;

pub use layers::{LayerId, LayerSet};
pub use state::{
    AnalysisMode, Drilldown, DrilldownTransition, MapViewState, SectionTransition, SidebarSection,
    MAX_ZOOM, MIN_ZOOM,
};
