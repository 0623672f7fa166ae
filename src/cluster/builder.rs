use super::distance::pixel_distance;
use super::marker::{Cluster, Marker, centroid};
use super::viewport::{Projection, Viewport};
use bitvec::prelude::*;
use tracing::debug;

/// Default clustering radius in pixels
pub const DEFAULT_RADIUS_PX: i32 = 60;

// Greedy anchor clustering:
//
// buildClusters(M, vp, R)
//    for each unconsumed marker A in M, in input order
//       mark A as consumed
//       C = {A}
//       for each unconsumed marker B after A
//          if dist(px(A), px(B)) < R
//             mark B as consumed
//             add B to C
//       centroid(C) = mean of member coordinates
//       anchor(C) = px(centroid(C))
//
// Membership is tested against the anchor marker only, so the grouping is
// not transitive and depends on input order.

/// Partitions markers into screen-proximity clusters
///
/// # Arguments
///
/// * `projection` - Maps marker coordinates to canvas pixels
/// * `markers` - Visible markers, in the order the data layer returned them
/// * `viewport` - Viewport the markers are drawn on
/// * `radius_px` - Clustering radius in pixels; `<= 0` yields one cluster per marker
///
/// # Returns
///
/// Clusters in anchor order. Every marker belongs to exactly one cluster.
pub fn build_clusters<P: Projection + ?Sized>(
    projection: &P,
    markers: &[Marker],
    viewport: &Viewport,
    radius_px: i32,
) -> Vec<Cluster> {
    let mut clusters = Vec::new();
    let mut consumed = bitvec![0; markers.len()];
    let radius = f64::from(radius_px);

    for i in 0..markers.len() {
        if consumed[i] {
            continue;
        }
        consumed.set(i, true);

        let p1 = projection.forward(viewport, markers[i].position());
        let mut members = vec![markers[i].clone()];

        for j in (i + 1)..markers.len() {
            if consumed[j] {
                continue;
            }

            let p2 = projection.forward(viewport, markers[j].position());
            if pixel_distance(p1, p2) < radius {
                members.push(markers[j].clone());
                consumed.set(j, true);
            }
        }

        let center = centroid(&members);
        let anchor = projection.forward(viewport, center);
        clusters.push(Cluster {
            members,
            centroid: center,
            anchor,
        });
    }

    debug!(
        markers = markers.len(),
        clusters = clusters.len(),
        radius_px,
        "built clusters"
    );

    clusters
}
