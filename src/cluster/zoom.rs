//! Animated zoom into a clicked cluster
//!
//! Once a cluster is clicked the controller runs one step per rendered frame.
//! The first frame after the click is skipped so the next step sees a viewport
//! that reflects the triggering frame. Every later step checks whether all
//! members would still be on screen after one more zoom step centered on the
//! cluster. If not, the view pans a fraction of the way toward the cluster; if
//! so, it jumps onto the cluster with the zoom applied and the animation ends.

use super::engine::ChartHost;
use super::marker::{Cluster, GeoPoint, Marker};
use super::viewport::Viewport;
use tracing::{debug, warn};

/// Scale multiplier of the final zoom jump
pub const DEFAULT_ZOOM_FACTOR: f64 = 2.0;

/// Fraction of the remaining distance covered by one pan step
pub const DEFAULT_PAN_STEP: f64 = 0.3;

/// Tuning of the cluster zoom animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomConfig {
    pub zoom_factor: f64,
    pub pan_step: f64,
    /// Ends the animation without zooming after this many pan steps.
    /// `None` pans for as long as it takes.
    pub max_pan_steps: Option<u32>,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            pan_step: DEFAULT_PAN_STEP,
            max_pan_steps: None,
        }
    }
}

/// A "jump to position" request for the chart engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jump {
    pub lat: f64,
    pub lon: f64,
    pub scale: f64,
}

/// What one call to [`ClusterZoomController::advance`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// No animation running
    Idle,
    /// First frame after a click, viewport untouched
    Settling,
    /// Moved toward the cluster at unchanged scale
    Pan(Jump),
    /// Final jump onto the cluster with the zoom applied
    Zoom(Jump),
}

/// Payload of a running animation
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    just_started: bool,
    target: GeoPoint,
    members: Vec<Marker>,
    pan_steps: u32,
}

impl Animation {
    /// Cluster centroid at click time
    pub fn target(&self) -> GeoPoint {
        self.target
    }

    /// Cluster members as they were at click time
    pub fn members(&self) -> &[Marker] {
        &self.members
    }

    pub fn pan_steps(&self) -> u32 {
        self.pan_steps
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ZoomState {
    #[default]
    Idle,
    Animating(Animation),
}

/// Per-frame state machine driving the viewport onto a clicked cluster
#[derive(Debug, Clone, Default)]
pub struct ClusterZoomController {
    config: ZoomConfig,
    state: ZoomState,
}

impl ClusterZoomController {
    pub fn new(config: ZoomConfig) -> Self {
        Self {
            config,
            state: ZoomState::Idle,
        }
    }

    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    pub fn state(&self) -> &ZoomState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ZoomState::Animating(_))
    }

    /// Starts (or restarts) the animation for `cluster`
    ///
    /// The members are copied out of `cluster`, so later changes to the
    /// visible marker list do not affect the running animation.
    pub fn on_cluster_click(&mut self, cluster: &Cluster, host: &mut dyn ChartHost) {
        if cluster.is_empty() {
            warn!("ignoring click on empty cluster");
            return;
        }

        debug!(
            members = cluster.len(),
            target_lat = cluster.centroid.lat,
            target_lon = cluster.centroid.lon,
            "cluster click"
        );

        self.state = ZoomState::Animating(Animation {
            just_started: true,
            target: cluster.centroid,
            members: cluster.members.clone(),
            pan_steps: 0,
        });
        host.request_redraw();
    }

    /// Stops a running animation, leaving the viewport where it is
    ///
    /// Returns `true` if an animation was running.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = ZoomState::Idle;
        was_active
    }

    /// Runs one animation step against the current viewport
    ///
    /// Issues at most one jump through `host`.
    pub fn advance(&mut self, viewport: &Viewport, host: &mut dyn ChartHost) -> Step {
        let config = self.config;
        let ZoomState::Animating(anim) = &mut self.state else {
            return Step::Idle;
        };

        if anim.just_started {
            anim.just_started = false;
            host.request_redraw();
            return Step::Settling;
        }

        let mut finished;
        let fits = all_visible_after_zoom(viewport, anim.target, &anim.members, config.zoom_factor);
        let step = if fits {
            let jump = Jump {
                lat: anim.target.lat,
                lon: anim.target.lon,
                scale: viewport.scale * config.zoom_factor,
            };
            debug!(lat = jump.lat, lon = jump.lon, scale = jump.scale, "cluster zoom");
            host.jump_to_position(jump);
            finished = true;
            Step::Zoom(jump)
        } else {
            let jump = pan_towards(viewport, anim.target, config.pan_step);
            debug!(lat = jump.lat, lon = jump.lon, scale = jump.scale, "cluster pan");
            host.jump_to_position(jump);
            anim.pan_steps += 1;
            finished = config.max_pan_steps.is_some_and(|max| anim.pan_steps >= max);
            if finished {
                debug!(pan_steps = anim.pan_steps, "pan limit reached");
            }
            Step::Pan(jump)
        };

        // Members are frozen at click time, so this only catches singleton clicks.
        if anim.members.len() <= 1 {
            debug!("cluster resolved to a single marker");
            finished = true;
        }

        if finished {
            self.state = ZoomState::Idle;
        }
        step
    }
}

/// Checks whether every member lies inside the box one zoom step would show
/// when centered on `target`
///
/// The current lat/lon spans are divided by `zoom_factor`. Bounds are
/// inclusive. An empty member list is never considered visible.
pub fn all_visible_after_zoom(
    viewport: &Viewport,
    target: GeoPoint,
    members: &[Marker],
    zoom_factor: f64,
) -> bool {
    if members.is_empty() {
        return false;
    }

    let half_lat = viewport.lat_span() / zoom_factor / 2.0;
    let half_lon = viewport.lon_span() / zoom_factor / 2.0;
    let (lat_min, lat_max) = (target.lat - half_lat, target.lat + half_lat);
    let (lon_min, lon_max) = (target.lon - half_lon, target.lon + half_lon);

    members
        .iter()
        .all(|m| !(m.lat < lat_min || m.lat > lat_max || m.lon < lon_min || m.lon > lon_max))
}

/// Moves the bounding-box center `pan_step` of the way to `target`, keeping the scale
pub fn pan_towards(viewport: &Viewport, target: GeoPoint, pan_step: f64) -> Jump {
    let center = viewport.bounds_center();
    Jump {
        lat: center.lat + (target.lat - center.lat) * pan_step,
        lon: center.lon + (target.lon - center.lon) * pan_step,
        scale: viewport.scale,
    }
}
