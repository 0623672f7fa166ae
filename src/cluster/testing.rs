//! Helpers shared by the unit tests

use super::engine::ChartHost;
use super::marker::GeoPoint;
use super::viewport::{Projection, ScreenPoint, Viewport};
use super::zoom::Jump;

/// Chart scale at which the click tolerance is 10 meters
pub const TEST_CHART_SCALE: f64 = 800.0;

/// Uses longitude as x and latitude as y, ignoring the viewport, so marker
/// coordinates can be written directly in pixels
#[derive(Debug, Clone, Copy)]
pub struct PixelProjection;

impl Projection for PixelProjection {
    fn forward(&self, _viewport: &Viewport, point: GeoPoint) -> ScreenPoint {
        ScreenPoint::new(point.lon, point.lat)
    }

    fn inverse(&self, _viewport: &Viewport, pixel: ScreenPoint) -> GeoPoint {
        GeoPoint::new(pixel.y, pixel.x)
    }
}

/// Chart host that applies jumps to its own viewport and records them
#[derive(Debug)]
pub struct RecordingHost {
    pub viewport: Viewport,
    pub jumps: Vec<Jump>,
    pub redraws: usize,
}

impl RecordingHost {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            jumps: Vec::new(),
            redraws: 0,
        }
    }
}

impl ChartHost for RecordingHost {
    fn jump_to_position(&mut self, jump: Jump) {
        self.viewport = self.viewport.jumped(jump.lat, jump.lon, jump.scale);
        self.jumps.push(jump);
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }
}

/// 800x600 viewport around (`lat`, `lon`) at `scale` pixels per meter
pub fn viewport_around(lat: f64, lon: f64, scale: f64) -> Viewport {
    Viewport::centered(GeoPoint::new(lat, lon), scale, TEST_CHART_SCALE, 800, 600)
}
