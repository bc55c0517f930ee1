//! Core domain types for the short-distance map.

mod geo;
mod relation;
mod station;
mod zoning;

pub use geo::{BoundingBox, LatLng, SWITZERLAND};
pub use relation::{ShortDistance, ShortDistancePair, StationActivity};
pub use station::{InvalidStationId, Station, StationId};
pub use zoning::{InvalidPlanUri, PlanUri, ZoningPlan};
