//! Marker clustering for chart overlays
//!
//! Groups nearby points of interest by their on-screen distance, maps clicks to
//! clusters or single markers, and animates the chart onto a clicked cluster
//! until its members spread apart.

pub mod cluster;
pub mod input;
