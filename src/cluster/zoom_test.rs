#[cfg(test)]
mod tests {
    use crate::cluster::testing::{RecordingHost, viewport_around};
    use crate::cluster::{
        Cluster, ClusterZoomController, GeoPoint, Jump, Marker, ScreenPoint, Step, Viewport,
        ZoomConfig, ZoomState, all_visible_after_zoom, centroid, pan_towards,
    };
    use quickcheck::QuickCheck;

    fn cluster_of(markers: &[Marker]) -> Cluster {
        Cluster {
            centroid: centroid(markers),
            members: markers.to_vec(),
            anchor: ScreenPoint::default(),
        }
    }

    /// Viewport with its box centered on (10, 10), spanning 0.02 degrees
    fn small_viewport() -> Viewport {
        Viewport {
            center_lat: 10.0,
            center_lon: 10.0,
            lat_min: 9.99,
            lat_max: 10.01,
            lon_min: 9.99,
            lon_max: 10.01,
            scale: 1.0,
            chart_scale: 800.0,
            pix_width: 800,
            pix_height: 600,
        }
    }

    /// Two markers too far apart to fit the zoomed box of [`small_viewport`],
    /// centered on (10.01, 10.02)
    fn wide_pair() -> Vec<Marker> {
        vec![Marker::new("a", 10.0, 10.0), Marker::new("b", 10.02, 10.04)]
    }

    #[test]
    fn test_idle_advance_does_nothing() {
        let mut zoom = ClusterZoomController::default();
        let mut host = RecordingHost::new(small_viewport());

        assert_eq!(zoom.advance(&small_viewport(), &mut host), Step::Idle);
        assert!(host.jumps.is_empty());
        assert_eq!(host.redraws, 0);
    }

    #[test]
    fn test_click_arms_and_first_frame_settles() {
        let markers = wide_pair();
        let mut zoom = ClusterZoomController::default();
        let mut host = RecordingHost::new(small_viewport());

        zoom.on_cluster_click(&cluster_of(&markers), &mut host);
        assert!(zoom.is_active());
        assert_eq!(host.redraws, 1);

        assert_eq!(zoom.advance(&small_viewport(), &mut host), Step::Settling);
        assert!(host.jumps.is_empty());
        assert!(zoom.is_active());
    }

    #[test]
    fn test_pan_step_moves_thirty_percent() {
        let markers = wide_pair();
        let mut zoom = ClusterZoomController::default();
        let mut host = RecordingHost::new(small_viewport());
        let vp = small_viewport();

        zoom.on_cluster_click(&cluster_of(&markers), &mut host);
        zoom.advance(&vp, &mut host);
        let step = zoom.advance(&vp, &mut host);

        let Step::Pan(jump) = step else {
            panic!("expected a pan, got {:?}", step);
        };
        assert!((jump.lat - 10.003).abs() < 1e-12);
        assert!((jump.lon - 10.006).abs() < 1e-12);
        assert_eq!(jump.scale, vp.scale);
        assert_eq!(host.jumps, vec![jump]);
        assert!((host.viewport.lat_span() - vp.lat_span()).abs() < 1e-12);
        assert!((host.viewport.lon_span() - vp.lon_span()).abs() < 1e-12);
        assert!(zoom.is_active());
    }

    #[test]
    fn test_pan_towards() {
        let jump = pan_towards(&small_viewport(), GeoPoint::new(10.01, 10.02), 0.3);
        assert!((jump.lat - 10.003).abs() < 1e-12);
        assert!((jump.lon - 10.006).abs() < 1e-12);
        assert_eq!(jump.scale, 1.0);
    }

    #[test]
    fn test_zoom_when_members_fit() {
        let markers = vec![
            Marker::new("a", 10.001, 10.001),
            Marker::new("b", 10.002, 10.003),
        ];
        let cluster = cluster_of(&markers);
        let mut zoom = ClusterZoomController::default();
        let mut host = RecordingHost::new(small_viewport());

        zoom.on_cluster_click(&cluster, &mut host);
        zoom.advance(&small_viewport(), &mut host);
        let step = zoom.advance(&small_viewport(), &mut host);

        let expected = Jump {
            lat: cluster.centroid.lat,
            lon: cluster.centroid.lon,
            scale: 2.0,
        };
        assert_eq!(step, Step::Zoom(expected));
        assert_eq!(host.jumps, vec![expected]);
        assert_eq!(*zoom.state(), ZoomState::Idle);
    }

    #[test]
    fn test_zoom_factor_and_pan_step_are_configurable() {
        let config = ZoomConfig {
            zoom_factor: 4.0,
            pan_step: 0.5,
            max_pan_steps: None,
        };
        let markers = wide_pair();
        let mut zoom = ClusterZoomController::new(config);
        let mut host = RecordingHost::new(small_viewport());

        zoom.on_cluster_click(&cluster_of(&markers), &mut host);
        zoom.advance(&small_viewport(), &mut host);
        let Step::Pan(jump) = zoom.advance(&small_viewport(), &mut host) else {
            panic!("expected a pan");
        };
        assert!((jump.lat - 10.005).abs() < 1e-12);
        assert!((jump.lon - 10.01).abs() < 1e-12);

        let near = vec![Marker::new("a", 10.0, 10.0), Marker::new("b", 10.0001, 10.0001)];
        zoom.on_cluster_click(&cluster_of(&near), &mut host);
        zoom.advance(&small_viewport(), &mut host);
        let Step::Zoom(jump) = zoom.advance(&small_viewport(), &mut host) else {
            panic!("expected a zoom");
        };
        assert_eq!(jump.scale, 4.0);
    }

    #[test]
    fn test_single_member_animation_ends_after_one_step() {
        // A lone marker sits on its own centroid, so it always fits
        let markers = vec![Marker::new("far", 12.0, 12.0)];
        let mut zoom = ClusterZoomController::default();
        let mut host = RecordingHost::new(small_viewport());

        zoom.on_cluster_click(&cluster_of(&markers), &mut host);
        zoom.advance(&small_viewport(), &mut host);
        let step = zoom.advance(&small_viewport(), &mut host);

        assert_eq!(
            step,
            Step::Zoom(Jump {
                lat: 12.0,
                lon: 12.0,
                scale: 2.0
            })
        );
        assert!(!zoom.is_active());
    }

    #[test]
    fn test_snapshot_is_frozen_at_click() {
        let mut markers = wide_pair();
        let mut zoom = ClusterZoomController::default();
        let mut host = RecordingHost::new(small_viewport());

        zoom.on_cluster_click(&cluster_of(&markers), &mut host);
        markers.clear();

        let ZoomState::Animating(anim) = zoom.state() else {
            panic!("expected an animation");
        };
        let ids: Vec<&str> = anim.members().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!((anim.target().lat - 10.01).abs() < 1e-12);
        assert!((anim.target().lon - 10.02).abs() < 1e-12);
    }

    #[test]
    fn test_click_while_animating_rearms() {
        let first = wide_pair();
        let second = vec![
            Marker::new("x", 10.001, 10.001),
            Marker::new("y", 10.002, 10.002),
        ];
        let mut zoom = ClusterZoomController::default();
        let mut host = RecordingHost::new(small_viewport());

        zoom.on_cluster_click(&cluster_of(&first), &mut host);
        zoom.advance(&small_viewport(), &mut host);
        zoom.advance(&small_viewport(), &mut host);

        zoom.on_cluster_click(&cluster_of(&second), &mut host);
        assert_eq!(zoom.advance(&small_viewport(), &mut host), Step::Settling);
        let ZoomState::Animating(anim) = zoom.state() else {
            panic!("expected an animation");
        };
        assert_eq!(anim.members(), second.as_slice());
        assert_eq!(anim.pan_steps(), 0);
    }

    #[test]
    fn test_empty_cluster_click_is_ignored() {
        let mut zoom = ClusterZoomController::default();
        let mut host = RecordingHost::new(small_viewport());
        let empty = Cluster {
            members: Vec::new(),
            centroid: GeoPoint::new(10.0, 10.0),
            anchor: ScreenPoint::default(),
        };

        zoom.on_cluster_click(&empty, &mut host);
        assert!(!zoom.is_active());
        assert_eq!(host.redraws, 0);
    }

    #[test]
    fn test_cancel() {
        let markers = wide_pair();
        let mut zoom = ClusterZoomController::default();
        let mut host = RecordingHost::new(small_viewport());

        assert!(!zoom.cancel());
        zoom.on_cluster_click(&cluster_of(&markers), &mut host);
        assert!(zoom.cancel());
        assert_eq!(zoom.advance(&small_viewport(), &mut host), Step::Idle);
    }

    #[test]
    fn test_pan_limit_ends_animation() {
        let config = ZoomConfig {
            max_pan_steps: Some(3),
            ..ZoomConfig::default()
        };
        let markers = wide_pair();
        let mut zoom = ClusterZoomController::new(config);
        let mut host = RecordingHost::new(small_viewport());

        zoom.on_cluster_click(&cluster_of(&markers), &mut host);
        let mut steps = Vec::new();
        for _ in 0..10 {
            let vp = host.viewport;
            steps.push(zoom.advance(&vp, &mut host));
        }

        assert_eq!(steps[0], Step::Settling);
        assert!(steps[1..4].iter().all(|s| matches!(s, Step::Pan(_))));
        assert!(steps[4..].iter().all(|s| *s == Step::Idle));
        assert_eq!(host.jumps.len(), 3);
    }

    #[test]
    fn test_unbounded_pan_approaches_target() {
        let markers = wide_pair();
        let mut zoom = ClusterZoomController::default();
        let mut host = RecordingHost::new(small_viewport());

        zoom.on_cluster_click(&cluster_of(&markers), &mut host);
        for _ in 0..40 {
            let vp = host.viewport;
            zoom.advance(&vp, &mut host);
        }

        // The pair never fits the zoomed box, so the view keeps closing in
        assert!(zoom.is_active());
        let center = host.viewport.bounds_center();
        assert!((center.lat - 10.01).abs() < 1e-6);
        assert!((center.lon - 10.02).abs() < 1e-6);
    }

    #[test]
    fn test_visibility_bounds_are_inclusive() {
        let vp = Viewport {
            lat_min: 9.0,
            lat_max: 11.0,
            lon_min: 9.0,
            lon_max: 11.0,
            ..small_viewport()
        };
        let target = GeoPoint::new(10.0, 10.0);

        let on_edge = vec![Marker::new("edge", 10.5, 9.5)];
        assert!(all_visible_after_zoom(&vp, target, &on_edge, 2.0));

        let outside = vec![Marker::new("in", 10.0, 10.0), Marker::new("out", 10.6, 10.0)];
        assert!(!all_visible_after_zoom(&vp, target, &outside, 2.0));
    }

    #[test]
    fn test_no_members_never_visible() {
        fn prop(lat: i8, lon: i8, span: u8, zoom_factor: u8) -> bool {
            let span = f64::from(span) + 0.5;
            let vp = Viewport {
                lat_min: f64::from(lat) - span,
                lat_max: f64::from(lat) + span,
                lon_min: f64::from(lon) - span,
                lon_max: f64::from(lon) + span,
                ..small_viewport()
            };
            let target = GeoPoint::new(f64::from(lat), f64::from(lon));
            !all_visible_after_zoom(&vp, target, &[], f64::from(zoom_factor) + 1.0)
        }

        QuickCheck::new()
            .tests(100)
            .quickcheck(prop as fn(i8, i8, u8, u8) -> bool);
    }

    #[test]
    fn test_animation_converges() {
        // Members within about 14 m of each other, view up to a few hundred meters away
        fn prop(offsets: Vec<(i8, i8)>, view_lat: i8, view_lon: i8) -> bool {
            let mut markers: Vec<Marker> = offsets
                .iter()
                .enumerate()
                .map(|(i, &(dlat, dlon))| {
                    Marker::new(
                        format!("m{}", i),
                        47.0 + f64::from(dlat) * 1e-6,
                        8.0 + f64::from(dlon) * 1e-6,
                    )
                })
                .collect();
            if markers.is_empty() {
                markers.push(Marker::new("only", 47.0, 8.0));
            }

            let vp = viewport_around(
                47.0 + f64::from(view_lat) * 1e-5,
                8.0 + f64::from(view_lon) * 1e-5,
                1.0,
            );
            let mut host = RecordingHost::new(vp);
            let mut zoom = ClusterZoomController::default();
            zoom.on_cluster_click(&cluster_of(&markers), &mut host);

            for _ in 0..50 {
                if !zoom.is_active() {
                    return true;
                }
                let vp = host.viewport;
                zoom.advance(&vp, &mut host);
            }
            !zoom.is_active()
        }

        QuickCheck::new()
            .tests(100)
            .quickcheck(prop as fn(Vec<(i8, i8)>, i8, i8) -> bool);
    }
}
