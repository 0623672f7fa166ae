//! Package cluster implements screen-proximity marker clustering, click picking
//! and the animated cluster zoom
pub mod builder;
pub mod distance;
pub mod engine;
pub mod fetch;
pub mod marker;
pub mod picking;
pub mod viewport;
pub mod zoom;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod zoom_test;

pub use builder::{DEFAULT_RADIUS_PX, build_clusters};
pub use distance::{DEGREE_RAD, METERS_PER_DEG_LAT, meters_per_deg_lon, pixel_distance};
pub use engine::{
    ChartHost, ClusterEngine, ClusterSettings, DEFAULT_CLUSTER_ICON_PX, DEFAULT_MARKER_ICON_PX,
    Glyph, MarkerOverlay, Picked, glyphs,
};
pub use fetch::{FetchGate, FetchPolicy, max_fetch_distance, visible_count};
pub use marker::{Cluster, GeoPoint, Marker, centroid};
pub use picking::{Hit, HitBox, hit_test, tolerance_meters};
pub use viewport::{LinearProjection, Projection, ScreenPoint, Viewport};
pub use zoom::{
    Animation, ClusterZoomController, DEFAULT_PAN_STEP, DEFAULT_ZOOM_FACTOR, Jump, Step, ZoomConfig,
    ZoomState, all_visible_after_zoom, pan_towards,
};
