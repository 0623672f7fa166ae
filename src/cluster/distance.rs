use std::f64::consts::PI;

use super::viewport::ScreenPoint;

/// Coefficient to translate from degrees to radians
pub const DEGREE_RAD: f64 = PI / 180.0;

/// Length of one degree of latitude in meters
pub const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Length of one degree of longitude at the given latitude, in meters
pub fn meters_per_deg_lon(lat: f64) -> f64 {
    METERS_PER_DEG_LAT * (lat * DEGREE_RAD).cos()
}

/// Euclidean distance between two screen points, in pixels
pub fn pixel_distance(a: ScreenPoint, b: ScreenPoint) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}
