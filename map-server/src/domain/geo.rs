//! Coordinates and bounding boxes.

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Fixed bounds of the Switzerland-wide view, used by the centre action.
pub const SWITZERLAND: BoundingBox = BoundingBox {
    lat_min: 45.7769477403,
    lat_max: 47.8308275417,
    lng_min: 6.02260949059,
    lng_max: 10.4427014502,
};

/// An axis-aligned bounding box over coordinates.
///
/// Invariant: `lat_min <= lat_max` and `lng_min <= lng_max`. Construction
/// via [`BoundingBox::from_points`] upholds this; an empty point set yields
/// `None` so callers skip the fly-to instead of panicking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl BoundingBox {
    /// The smallest box containing every point, or `None` for no points.
    pub fn from_points(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self {
            lat_min: first.lat,
            lat_max: first.lat,
            lng_min: first.lng,
            lng_max: first.lng,
        };
        for p in points {
            bounds.extend(p);
        }
        Some(bounds)
    }

    /// Grow the box to include `point`.
    pub fn extend(&mut self, point: LatLng) {
        self.lat_min = self.lat_min.min(point.lat);
        self.lat_max = self.lat_max.max(point.lat);
        self.lng_min = self.lng_min.min(point.lng);
        self.lng_max = self.lng_max.max(point.lng);
    }

    /// Whether the point lies within the box (boundary inclusive).
    pub fn contains(&self, point: LatLng) -> bool {
        self.lat_min <= point.lat
            && point.lat <= self.lat_max
            && self.lng_min <= point.lng
            && point.lng <= self.lng_max
    }
}
