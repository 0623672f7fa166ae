//! Resolves pointer clicks to clusters or single markers
//!
//! Clicks are matched in geographic space: the click pixel is projected back to
//! a coordinate and an axis-aligned lat/lon box sized after the icon is placed
//! around it. Multi-member clusters are tested first, by centroid, then every
//! visible marker by its own position. The first match in list order wins.

use super::distance::{METERS_PER_DEG_LAT, meters_per_deg_lon};
use super::marker::{Cluster, GeoPoint, Marker};
use super::viewport::{Projection, ScreenPoint, Viewport};
use tracing::{debug, warn};

/// Chart scale at which the base click tolerance applies
pub const BASE_CHART_SCALE: f64 = 800.0;

/// Click tolerance in meters at [`BASE_CHART_SCALE`]
pub const BASE_TOLERANCE_METERS: f64 = 10.0;

/// Result of a hit test
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit<'a> {
    /// Nothing under the pointer
    Miss,
    /// A cluster with more than one member
    Cluster(&'a Cluster),
    /// A single visible marker
    Marker(&'a Marker),
}

/// Geographic box around a click point, bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl HitBox {
    /// Builds the box for an icon of `icon_px` pixels centered on `click`
    pub fn around(click: GeoPoint, icon_px: i32, viewport: &Viewport) -> Self {
        let half_size_meters =
            f64::from(icon_px) * viewport.scale / 2.0 + tolerance_meters(viewport);

        let d_lat = half_size_meters / METERS_PER_DEG_LAT;
        let d_lon = half_size_meters / meters_per_deg_lon(click.lat);

        Self {
            min_lat: click.lat - d_lat,
            max_lat: click.lat + d_lat,
            min_lon: click.lon - d_lon,
            max_lon: click.lon + d_lon,
        }
    }

    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat >= self.min_lat
            && p.lat <= self.max_lat
            && p.lon >= self.min_lon
            && p.lon <= self.max_lon
    }
}

/// Extra click slack in meters, growing with the chart scale
pub fn tolerance_meters(viewport: &Viewport) -> f64 {
    BASE_TOLERANCE_METERS * (viewport.chart_scale / BASE_CHART_SCALE)
}

/// Finds what lies under a click
///
/// # Arguments
///
/// * `click` - Pointer position on the canvas
/// * `clusters` - Clusters built for the last rendered frame
/// * `markers` - Markers of the last rendered frame
/// * `cluster_icon_px` - Size of a cluster badge
/// * `marker_icon_px` - Size of a single marker icon
///
/// A viewport with a non-positive `scale` or `chart_scale` never hits.
pub fn hit_test<'a, P: Projection + ?Sized>(
    projection: &P,
    click: ScreenPoint,
    viewport: &Viewport,
    clusters: &'a [Cluster],
    markers: &'a [Marker],
    cluster_icon_px: i32,
    marker_icon_px: i32,
) -> Hit<'a> {
    if viewport.scale <= 0.0 || viewport.chart_scale <= 0.0 {
        warn!(
            scale = viewport.scale,
            chart_scale = viewport.chart_scale,
            "degenerate viewport, ignoring click"
        );
        return Hit::Miss;
    }

    let at = projection.inverse(viewport, click);
    debug!(lat = at.lat, lon = at.lon, x = click.x, y = click.y, "pointer down");

    let cluster_box = HitBox::around(at, cluster_icon_px, viewport);
    if let Some(cluster) = clusters
        .iter()
        .filter(|c| c.len() > 1)
        .find(|c| cluster_box.contains(c.centroid))
    {
        return Hit::Cluster(cluster);
    }

    let marker_box = HitBox::around(at, marker_icon_px, viewport);
    if let Some(marker) = markers.iter().find(|m| marker_box.contains(m.position())) {
        return Hit::Marker(marker);
    }

    debug!("no icon or cluster hit");
    Hit::Miss
}
