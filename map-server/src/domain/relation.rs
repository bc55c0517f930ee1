//! Short-distance fare relations.

use super::{LatLng, Station};

/// A short-distance relation from a known departure station to one
/// arrival station.
///
/// The departure station is the query parameter and is not repeated here;
/// the UI draws the relation as a single line regardless of direction.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortDistance {
    pub arrival: Station,
    pub distance_m: u32,
}

/// A short-distance relation with both endpoints resolved, as returned by
/// the longest-distances listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortDistancePair {
    pub departure: Station,
    pub arrival: Station,
    pub distance_m: u32,
}

/// A departure station together with the number of short-distance
/// relations leaving it. Input for the heatmap.
#[derive(Debug, Clone, PartialEq)]
pub struct StationActivity {
    pub name: String,
    pub pos: LatLng,
    pub count: u64,
}
