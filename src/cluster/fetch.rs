//! Throttling of marker downloads and on-screen counting
//!
//! Marker data is fetched by an external layer for a circle around the view
//! center. The gate here decides when the view moved or zoomed enough, or the
//! data got old enough, to justify another request.

use std::time::{Duration, Instant};

use super::distance::METERS_PER_DEG_LAT;
use super::marker::{GeoPoint, Marker};
use super::viewport::{Projection, Viewport};

/// When a new marker fetch is due
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchPolicy {
    /// Refetch once the last result is older than this
    pub max_age: Duration,
    /// Refetch when either center coordinate moved more than this, in degrees
    pub center_delta_deg: f64,
    /// Refetch when the fetch distance changed by more than this fraction
    pub distance_ratio: f64,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(30),
            center_delta_deg: 0.01,
            distance_ratio: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct LastFetch {
    at: Instant,
    center: GeoPoint,
    distance: f64,
}

/// Debounces marker fetches by time, center movement and zoom change
#[derive(Debug, Clone, Default)]
pub struct FetchGate {
    policy: FetchPolicy,
    last: Option<LastFetch>,
}

impl FetchGate {
    pub fn new(policy: FetchPolicy) -> Self {
        Self { policy, last: None }
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Checks whether a fetch for `center` and `distance` (meters) is due at `now`
    pub fn should_fetch(&self, center: GeoPoint, distance: f64, now: Instant) -> bool {
        let Some(last) = self.last else {
            return true;
        };

        now.saturating_duration_since(last.at) > self.policy.max_age
            || (center.lat - last.center.lat).abs() > self.policy.center_delta_deg
            || (center.lon - last.center.lon).abs() > self.policy.center_delta_deg
            || (distance - last.distance).abs() > distance * self.policy.distance_ratio
    }

    /// Remembers a fetch that was just issued
    pub fn record(&mut self, center: GeoPoint, distance: f64, now: Instant) {
        self.last = Some(LastFetch {
            at: now,
            center,
            distance,
        });
    }

    /// Records and returns `true` if a fetch is due, otherwise returns `false`
    pub fn try_fetch(&mut self, center: GeoPoint, distance: f64, now: Instant) -> bool {
        if !self.should_fetch(center, distance, now) {
            return false;
        }
        self.record(center, distance, now);
        true
    }
}

/// Radius in meters, rounded up, that covers the viewport from its center
///
/// Uses half the pixel diagonal at the view scale. Without a usable scale it
/// falls back to half the latitude span.
pub fn max_fetch_distance(viewport: &Viewport) -> f64 {
    let w = f64::from(viewport.pix_width);
    let h = f64::from(viewport.pix_height);

    if viewport.scale > 0.0 {
        let half_diagonal = (w * w + h * h).sqrt() / 2.0;
        return (half_diagonal / viewport.scale).ceil();
    }

    (viewport.lat_span() * METERS_PER_DEG_LAT / 2.0).ceil()
}

/// Counts markers whose projected pixel lies on the canvas
pub fn visible_count<P: Projection + ?Sized>(
    projection: &P,
    viewport: &Viewport,
    markers: &[Marker],
) -> usize {
    markers
        .iter()
        .filter(|m| viewport.contains_pixel(projection.forward(viewport, m.position())))
        .count()
}
