//! Marker overlay engine tying clustering, hit testing and cluster zoom together
//!
//! The host chart calls [`MarkerOverlay::render_frame`] once per rendered frame
//! and [`MarkerOverlay::on_pointer_down`] for left clicks between frames. All
//! state lives in the overlay and is touched from the render thread only.

use super::builder::{DEFAULT_RADIUS_PX, build_clusters};
use super::marker::{Cluster, GeoPoint, Marker};
use super::picking::{Hit, hit_test};
use super::viewport::{LinearProjection, Projection, ScreenPoint, Viewport};
use super::zoom::{ClusterZoomController, Jump, Step, ZoomConfig};
use tracing::trace;

/// Default cluster badge size in pixels
pub const DEFAULT_CLUSTER_ICON_PX: i32 = 40;

/// Default marker icon size in pixels
pub const DEFAULT_MARKER_ICON_PX: i32 = 24;

/// Side effects the overlay needs from the chart engine
pub trait ChartHost {
    /// Recenters the live viewport and sets its view scale
    fn jump_to_position(&mut self, jump: Jump);

    /// Schedules another frame
    fn request_redraw(&mut self);
}

/// Clustering capability exposed to the rendering and event layer
pub trait ClusterEngine {
    /// Partitions `markers` into screen-proximity clusters for `viewport`
    fn build_clusters(&self, markers: &[Marker], viewport: &Viewport) -> Vec<Cluster>;

    /// Runs one cluster zoom animation step
    fn advance(&mut self, viewport: &Viewport, host: &mut dyn ChartHost) -> Step;

    /// Starts the zoom animation for a clicked cluster
    fn on_cluster_click(&mut self, cluster: &Cluster, host: &mut dyn ChartHost);

    /// Resolves a click against a built cluster list
    fn hit_test<'a>(
        &self,
        click: ScreenPoint,
        viewport: &Viewport,
        clusters: &'a [Cluster],
        markers: &'a [Marker],
    ) -> Hit<'a>;
}

/// Display settings relevant to clustering and picking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterSettings {
    /// Markers closer than this to a cluster anchor join the cluster
    pub radius_px: i32,
    pub cluster_icon_px: i32,
    pub marker_icon_px: i32,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            radius_px: DEFAULT_RADIUS_PX,
            cluster_icon_px: DEFAULT_CLUSTER_ICON_PX,
            marker_icon_px: DEFAULT_MARKER_ICON_PX,
        }
    }
}

/// One drawing instruction for the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Glyph<'a> {
    /// Icon of a lone marker
    Icon { marker: &'a Marker, at: ScreenPoint },
    /// Badge showing the member count of a cluster
    Badge { count: usize, at: ScreenPoint },
}

/// Turns clusters into drawing instructions, one per cluster, at its anchor
pub fn glyphs(clusters: &[Cluster]) -> Vec<Glyph<'_>> {
    clusters
        .iter()
        .map(|c| match c.members.as_slice() {
            [only] => Glyph::Icon {
                marker: only,
                at: c.anchor,
            },
            members => Glyph::Badge {
                count: members.len(),
                at: c.anchor,
            },
        })
        .collect()
}

/// Outcome of a pointer-down event
#[derive(Debug, Clone, PartialEq)]
pub enum Picked {
    Nothing,
    /// A multi-member cluster was hit and its zoom animation started
    Cluster { size: usize, centroid: GeoPoint },
    /// A single marker was hit
    Marker { id: String },
}

#[derive(Debug, Clone)]
struct Frame {
    viewport: Viewport,
    markers: Vec<Marker>,
    clusters: Vec<Cluster>,
}

/// Clustering overlay for one chart canvas
#[derive(Debug, Clone)]
pub struct MarkerOverlay<P = LinearProjection> {
    projection: P,
    settings: ClusterSettings,
    zoom: ClusterZoomController,
    frame: Option<Frame>,
}

impl<P: Projection> MarkerOverlay<P> {
    pub fn new(projection: P, settings: ClusterSettings, zoom: ZoomConfig) -> Self {
        Self {
            projection,
            settings,
            zoom: ClusterZoomController::new(zoom),
            frame: None,
        }
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    pub fn settings(&self) -> &ClusterSettings {
        &self.settings
    }

    /// Replaces the display settings; takes effect on the next frame
    pub fn set_settings(&mut self, settings: ClusterSettings) {
        self.settings = settings;
    }

    pub fn controller(&self) -> &ClusterZoomController {
        &self.zoom
    }

    pub fn controller_mut(&mut self) -> &mut ClusterZoomController {
        &mut self.zoom
    }

    /// Clusters built by the last frame
    pub fn clusters(&self) -> &[Cluster] {
        self.frame.as_ref().map(|f| f.clusters.as_slice()).unwrap_or_default()
    }

    /// Markers the last frame was clustered from
    pub fn markers(&self) -> &[Marker] {
        self.frame.as_ref().map(|f| f.markers.as_slice()).unwrap_or_default()
    }

    /// Viewport the last frame was clustered on
    pub fn last_viewport(&self) -> Option<&Viewport> {
        self.frame.as_ref().map(|f| &f.viewport)
    }

    /// Runs the per-frame pipeline and returns the clusters to draw
    ///
    /// The animation step runs first; a jump it issues is applied to a copy of
    /// `viewport` before clustering so this frame already reflects it.
    pub fn render_frame(
        &mut self,
        viewport: &Viewport,
        markers: &[Marker],
        host: &mut dyn ChartHost,
    ) -> &[Cluster] {
        let viewport = match self.advance(viewport, host) {
            Step::Pan(jump) | Step::Zoom(jump) => viewport.jumped(jump.lat, jump.lon, jump.scale),
            Step::Idle | Step::Settling => *viewport,
        };

        let clusters = self.build_clusters(markers, &viewport);
        trace!(clusters = clusters.len(), "frame rendered");

        let frame = self.frame.insert(Frame {
            viewport,
            markers: markers.to_vec(),
            clusters,
        });
        &frame.clusters
    }

    /// Handles a left click against the last rendered frame
    ///
    /// A hit on a multi-member cluster arms the zoom animation. Clicks before
    /// the first frame hit nothing.
    pub fn on_pointer_down(&mut self, click: ScreenPoint, host: &mut dyn ChartHost) -> Picked {
        let Some(frame) = &self.frame else {
            return Picked::Nothing;
        };

        let hit = hit_test(
            &self.projection,
            click,
            &frame.viewport,
            &frame.clusters,
            &frame.markers,
            self.settings.cluster_icon_px,
            self.settings.marker_icon_px,
        );

        match hit {
            Hit::Miss => Picked::Nothing,
            Hit::Cluster(cluster) => {
                self.zoom.on_cluster_click(cluster, host);
                Picked::Cluster {
                    size: cluster.len(),
                    centroid: cluster.centroid,
                }
            }
            Hit::Marker(marker) => Picked::Marker {
                id: marker.id.clone(),
            },
        }
    }
}

impl<P: Projection> ClusterEngine for MarkerOverlay<P> {
    fn build_clusters(&self, markers: &[Marker], viewport: &Viewport) -> Vec<Cluster> {
        build_clusters(&self.projection, markers, viewport, self.settings.radius_px)
    }

    fn advance(&mut self, viewport: &Viewport, host: &mut dyn ChartHost) -> Step {
        self.zoom.advance(viewport, host)
    }

    fn on_cluster_click(&mut self, cluster: &Cluster, host: &mut dyn ChartHost) {
        self.zoom.on_cluster_click(cluster, host);
    }

    fn hit_test<'a>(
        &self,
        click: ScreenPoint,
        viewport: &Viewport,
        clusters: &'a [Cluster],
        markers: &'a [Marker],
    ) -> Hit<'a> {
        hit_test(
            &self.projection,
            click,
            viewport,
            clusters,
            markers,
            self.settings.cluster_icon_px,
            self.settings.marker_icon_px,
        )
    }
}
