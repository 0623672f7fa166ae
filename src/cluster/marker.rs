//! Markers, geographic points and screen-proximity clusters

use super::viewport::ScreenPoint;

/// Geographic coordinate in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A point of interest shown on the chart
///
/// Markers are owned by the data layer; the clustering core only reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Stable, unique identifier
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

impl Marker {
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Group of markers drawn as one badge because they are close on screen
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Member markers, anchor first, then in input order
    pub members: Vec<Marker>,
    /// Unweighted mean of the member coordinates
    pub centroid: GeoPoint,
    /// Forward projection of the centroid
    pub anchor: ScreenPoint,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for clusters produced by the builder
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    /// Member ids in member order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.id.as_str())
    }
}

/// Calculates the arithmetic mean of the given marker coordinates
///
/// This is a plain average in degrees, not a geodesic centroid. A single
/// marker yields its own coordinates exactly.
///
/// # Panics
///
/// Panics if `members` is empty
pub fn centroid(members: &[Marker]) -> GeoPoint {
    if members.is_empty() {
        panic!("empty cluster");
    }

    let mut center = GeoPoint::new(0.0, 0.0);
    for m in members {
        center.lat += m.lat;
        center.lon += m.lon;
    }

    let n = members.len() as f64;
    center.lat /= n;
    center.lon /= n;
    center
}
