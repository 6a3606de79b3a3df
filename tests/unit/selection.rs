use super::*;

fn two_entry_table() -> ResolutionTable {
    ResolutionTable::new(vec![
        Resolution::new(1024, 1024, 1.0),
        Resolution::new(1820, 1024, 1.78),
    ])
}

fn engine() -> SelectionEngine {
    SelectionEngine::new(SelectionConfig::default())
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn wide_drag_snaps_to_sixteen_nine_with_height_controlling() {
    let r = snap_to_table(Point::new(0.0, 0.0), Point::new(200.0, 50.0), &two_entry_table());
    assert_eq!((r.x, r.y), (0.0, 0.0));
    assert!(approx(r.width, 89.0));
    assert!(approx(r.height, 50.0));
}

#[test]
fn drawn_ratio_always_matches_a_table_entry() {
    let table = crate::ModelKind::FlashImage.resolutions();
    let anchor = Point::new(100.0, 100.0);
    for (cx, cy) in [
        (400.0, 130.0),
        (-250.0, 900.0),
        (101.0, -400.0),
        (-30.0, -31.0),
        (700.0, 100.5),
    ] {
        let r = snap_to_table(anchor, Point::new(cx, cy), table);
        assert!(
            table
                .entries()
                .iter()
                .any(|e| (r.width / r.height - e.ratio).abs() < 1e-9),
            "ratio {} not in table",
            r.width / r.height
        );
    }
}

#[test]
fn anchor_corner_stays_fixed_in_every_direction() {
    let table = two_entry_table();
    let anchor = Point::new(50.0, 60.0);
    for (cx, cy) in [(150.0, 90.0), (-40.0, 90.0), (150.0, -10.0), (-40.0, -10.0)] {
        let r = snap_to_table(anchor, Point::new(cx, cy), &table);
        let corner_x = if cx < anchor.x { r.x + r.width } else { r.x };
        let corner_y = if cy < anchor.y { r.y + r.height } else { r.y };
        assert!(approx(corner_x, anchor.x));
        assert!(approx(corner_y, anchor.y));
    }
}

#[test]
fn narrow_drag_lets_width_control() {
    let r = snap_to_table(Point::ORIGIN, Point::new(100.0, 120.0), &two_entry_table());
    assert!(approx(r.width, 100.0));
    assert!(approx(r.height, 100.0));
}

#[test]
fn zero_height_drag_is_treated_as_square() {
    let r = snap_to_table(Point::ORIGIN, Point::new(40.0, 0.0), &two_entry_table());
    assert!(approx(r.width, 40.0));
    assert!(approx(r.height, 40.0));
}

#[test]
fn small_drawn_selection_is_discarded_on_release() {
    let table = two_entry_table();
    let mut sel = engine();
    sel.begin_draw(Point::ORIGIN);
    sel.update_draw(Point::new(8.0, 8.0), &table);
    assert!(sel.current().is_some());
    assert_eq!(sel.end_drag(), None);
    assert_eq!(sel.current(), None);

    sel.begin_draw(Point::ORIGIN);
    sel.update_draw(Point::new(40.0, 40.0), &table);
    assert!(sel.end_drag().is_some());
}

#[test]
fn begin_draw_clears_previous_selection() {
    let mut sel = engine();
    sel.set(Region::new(0.0, 0.0, 100.0, 100.0));
    sel.begin_draw(Point::new(500.0, 500.0));
    assert_eq!(sel.current(), None);
    assert_eq!(sel.end_drag(), None);
}

#[test]
fn move_locks_to_first_dominant_axis() {
    let mut sel = engine();
    sel.set(Region::new(0.0, 0.0, 100.0, 100.0));
    assert!(sel.begin_move(Point::new(50.0, 50.0)));

    // Under the threshold nothing moves.
    assert_eq!(sel.update_move(Point::new(53.0, 52.0)), None);
    assert_eq!(sel.current().unwrap().origin(), Point::ORIGIN);

    let r = sel.update_move(Point::new(60.0, 54.0)).unwrap();
    assert_eq!(sel.locked_axis(), Some(Axis::Horizontal));
    assert_eq!(r.origin(), Point::new(10.0, 0.0));

    // Later vertical motion does not unlock the axis.
    let r = sel.update_move(Point::new(70.0, 150.0)).unwrap();
    assert_eq!(r.origin(), Point::new(20.0, 0.0));
    assert_eq!(r.size(), crate::Size::new(100.0, 100.0));

    sel.end_drag();
    assert_eq!(sel.locked_axis(), None);
    assert_eq!(sel.current().unwrap().origin(), Point::new(20.0, 0.0));
}

#[test]
fn move_only_starts_inside_selection() {
    let mut sel = engine();
    assert!(!sel.begin_move(Point::ORIGIN));
    sel.set(Region::new(0.0, 0.0, 10.0, 10.0));
    assert!(!sel.begin_move(Point::new(20.0, 20.0)));
    assert!(sel.begin_move(Point::new(10.0, 10.0)));
}

#[test]
fn native_size_selection_has_no_warning() {
    let native = Resolution::new(2048, 2048, 1.0);
    let ok = Region::new(0.0, 0.0, 2048.0, 2048.0);
    assert_eq!(compliance(&ok, &native, 2.0), ResolutionStatus::Ok);

    let wide = Region::new(0.0, 0.0, 3000.0, 2048.0);
    assert!(compliance(&wide, &native, 2.0).is_warning());
}

#[test]
fn status_uses_matching_entry_of_table() {
    let table = crate::ModelKind::ProImage.resolutions();
    let mut sel = engine();
    assert_eq!(sel.resolution_status(table), ResolutionStatus::Ok);

    sel.set(Region::new(0.0, 0.0, 2048.0, 2048.0));
    assert_eq!(sel.resolution_status(table), ResolutionStatus::Ok);

    sel.set(Region::new(0.0, 0.0, 4096.0, 4096.0));
    let ResolutionStatus::ReducedQuality { native } = sel.resolution_status(table) else {
        panic!("expected warning");
    };
    assert_eq!((native.w, native.h), (2048, 2048));

    // No entry close enough: nothing to judge against.
    sel.set(Region::new(0.0, 0.0, 3000.0, 2048.0));
    assert_eq!(sel.resolution_status(table), ResolutionStatus::Ok);
}
