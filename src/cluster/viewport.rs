//! Chart viewport description and the projection seam
//!
//! The chart engine owns the live viewport and the real projection. This module
//! carries the viewport by value and abstracts the projection behind
//! [`Projection`] so the clustering core never touches a rendering type.

use super::distance::{METERS_PER_DEG_LAT, meters_per_deg_lon};
use super::marker::GeoPoint;

/// Position on the chart canvas, in pixels from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visible chart window
///
/// Expected to satisfy `lat_min < lat_max`, `lon_min < lon_max` and
/// `scale > 0`; the core does not validate this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center_lat: f64,
    pub center_lon: f64,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    /// View scale in pixels per meter
    pub scale: f64,
    /// Denominator-style chart scale, shrinks as the view zooms in
    pub chart_scale: f64,
    pub pix_width: u32,
    pub pix_height: u32,
}

impl Viewport {
    /// Builds a viewport around `center` whose bounding box covers the pixel
    /// extent at the given view scale
    pub fn centered(
        center: GeoPoint,
        scale: f64,
        chart_scale: f64,
        pix_width: u32,
        pix_height: u32,
    ) -> Self {
        let lat_span = f64::from(pix_height) / scale / METERS_PER_DEG_LAT;
        let lon_span = f64::from(pix_width) / scale / meters_per_deg_lon(center.lat);

        Self {
            center_lat: center.lat,
            center_lon: center.lon,
            lat_min: center.lat - lat_span / 2.0,
            lat_max: center.lat + lat_span / 2.0,
            lon_min: center.lon - lon_span / 2.0,
            lon_max: center.lon + lon_span / 2.0,
            scale,
            chart_scale,
            pix_width,
            pix_height,
        }
    }

    /// Returns the viewport a "jump to position" to (`lat`, `lon`, `scale`)
    /// produces
    ///
    /// The bounding box keeps its shape and is rescaled by `self.scale / scale`;
    /// the chart scale follows the same ratio.
    pub fn jumped(&self, lat: f64, lon: f64, scale: f64) -> Self {
        let ratio = self.scale / scale;
        let lat_span = self.lat_span() * ratio;
        let lon_span = self.lon_span() * ratio;

        Self {
            center_lat: lat,
            center_lon: lon,
            lat_min: lat - lat_span / 2.0,
            lat_max: lat + lat_span / 2.0,
            lon_min: lon - lon_span / 2.0,
            lon_max: lon + lon_span / 2.0,
            scale,
            chart_scale: self.chart_scale * ratio,
            ..*self
        }
    }

    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    pub fn lon_span(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    /// Center of the bounding box, which may differ slightly from
    /// `center_lat`/`center_lon` reported by the chart engine
    pub fn bounds_center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }

    /// Checks whether a pixel lies on the canvas
    pub fn contains_pixel(&self, p: ScreenPoint) -> bool {
        p.x >= 0.0
            && p.x < f64::from(self.pix_width)
            && p.y >= 0.0
            && p.y < f64::from(self.pix_height)
    }
}

/// Forward and inverse mapping between geographic and screen coordinates
pub trait Projection {
    /// Maps a coordinate to its pixel on the canvas of `viewport`
    fn forward(&self, viewport: &Viewport, point: GeoPoint) -> ScreenPoint;

    /// Maps a canvas pixel back to a coordinate
    fn inverse(&self, viewport: &Viewport, pixel: ScreenPoint) -> GeoPoint;
}

/// Equirectangular projection stretching the viewport bounding box over the canvas
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearProjection;

impl Projection for LinearProjection {
    fn forward(&self, viewport: &Viewport, point: GeoPoint) -> ScreenPoint {
        let x =
            (point.lon - viewport.lon_min) / viewport.lon_span() * f64::from(viewport.pix_width);
        let y =
            (viewport.lat_max - point.lat) / viewport.lat_span() * f64::from(viewport.pix_height);
        ScreenPoint::new(x, y)
    }

    fn inverse(&self, viewport: &Viewport, pixel: ScreenPoint) -> GeoPoint {
        let lon = viewport.lon_min + pixel.x / f64::from(viewport.pix_width) * viewport.lon_span();
        let lat = viewport.lat_max - pixel.y / f64::from(viewport.pix_height) * viewport.lat_span();
        GeoPoint::new(lat, lon)
    }
}
