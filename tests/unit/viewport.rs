use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn approx_pt(a: Point, b: Point) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y)
}

fn viewport() -> Viewport {
    Viewport::new(Size::new(1000.0, 800.0), ViewportConfig::default())
}

#[test]
fn initial_view_centers_the_world() {
    let v = viewport();
    assert!(approx(v.zoom(), 0.4));
    assert!(approx_pt(v.world_center(), Point::new(2000.0, 2000.0)));
}

#[test]
fn initial_zoom_respects_lower_clamp() {
    let v = Viewport::new(Size::new(10.0, 10.0), ViewportConfig::default());
    assert!(approx(v.zoom(), 0.05));
}

#[test]
fn screen_world_round_trip() {
    let mut v = viewport();
    v.pan_by(Vec2::new(13.0, -7.0));
    v.zoom_at(Point::new(100.0, 100.0), 1.7);
    let p = Point::new(321.5, 77.25);
    assert!(approx_pt(v.world_to_screen(v.screen_to_world(p)), p));
}

#[test]
fn zoom_keeps_anchor_fixed() {
    for factor in [0.01, 0.5, 0.9, 1.0, 1.1, 3.0, 100.0] {
        for anchor in [
            Point::new(0.0, 0.0),
            Point::new(500.0, 400.0),
            Point::new(-30.0, 999.0),
        ] {
            let mut v = viewport();
            let before = v.screen_to_world(anchor);
            assert!(v.zoom_at(anchor, factor));
            assert!(approx_pt(v.screen_to_world(anchor), before));
            assert!(v.zoom() >= 0.05 && v.zoom() <= 5.0);
        }
    }
}

#[test]
fn zoom_rejects_degenerate_factors() {
    let mut v = viewport();
    let before = v.clone();
    assert!(!v.zoom_at(Point::ORIGIN, 0.0));
    assert!(!v.zoom_at(Point::ORIGIN, -2.0));
    assert!(!v.zoom_at(Point::ORIGIN, f64::NAN));
    assert_eq!(v, before);
}

#[test]
fn pinch_moves_world_point_to_new_center() {
    let mut v = viewport();
    let from = Point::new(400.0, 300.0);
    let to = Point::new(450.0, 320.0);
    let world = v.screen_to_world(from);
    v.zoom_between(from, to, 1.25);
    assert!(approx_pt(v.world_to_screen(world), to));
    assert!(approx(v.zoom(), 0.5));
}

#[test]
fn wheel_up_zooms_in_and_dead_zone_is_ignored() {
    let mut v = viewport();
    let z = v.zoom();
    assert!(!v.wheel(Point::ORIGIN, 0.0005));
    assert!(v.wheel(Point::new(500.0, 400.0), -100.0));
    assert!(approx(v.zoom(), z * (0.1f64).exp()));
}

#[test]
fn fit_to_content_centers_bounds_with_cap() {
    let mut v = viewport();
    v.fit_to_content(Some(Region::new(0.0, 0.0, 100.0, 100.0)));
    // 1000 / 300 and 800 / 300 both exceed the 1.5 cap.
    assert!(approx(v.zoom(), 1.5));
    assert!(approx_pt(v.world_center(), Point::new(50.0, 50.0)));

    v.fit_to_content(Some(Region::new(0.0, 0.0, 1800.0, 600.0)));
    assert!(approx(v.zoom(), 0.5));
}

#[test]
fn fit_without_content_resets() {
    let mut v = viewport();
    v.pan_by(Vec2::new(200.0, 200.0));
    v.zoom_at(Point::ORIGIN, 3.0);
    v.fit_to_content(None);
    assert_eq!(v, viewport());
}

#[test]
fn visible_world_matches_screen_extent() {
    let v = viewport();
    let vis = v.visible_world();
    assert!(approx(vis.width, 2500.0));
    assert!(approx(vis.height, 2000.0));
}
