use super::*;
use crate::config::{SelectionConfig, ViewportConfig};
use crate::foundation::core::{Region, Size};
use crate::layers::model::{AssetSource, Layer, LayerContent};
use crate::resolution::Resolution;

struct Fixture {
    viewport: Viewport,
    selection: SelectionEngine,
    layers: LayerStack,
    table: ResolutionTable,
    generating: bool,
}

impl Fixture {
    /// Identity view: zoom 1, no offset.
    fn new() -> Self {
        let cfg = ViewportConfig {
            world_size: 1000.0,
            initial_view_width: 1000.0,
            ..ViewportConfig::default()
        };
        Self {
            viewport: Viewport::new(Size::new(1000.0, 1000.0), cfg),
            selection: SelectionEngine::new(SelectionConfig::default()),
            layers: LayerStack::new(),
            table: ResolutionTable::new(vec![
                Resolution::new(1024, 1024, 1.0),
                Resolution::new(1820, 1024, 1.78),
            ]),
            generating: false,
        }
    }

    fn ctx(&mut self) -> CanvasContext<'_> {
        CanvasContext {
            viewport: &mut self.viewport,
            selection: &mut self.selection,
            layers: &mut self.layers,
            table: &self.table,
            generating: self.generating,
        }
    }

    fn add_layer(&mut self, name: &str, bounds: Region) -> LayerId {
        let layer = Layer::new(
            self.layers.next_id(),
            name,
            LayerContent::Image {
                source: AssetSource::Remote(name.into()),
            },
            bounds,
        )
        .unwrap();
        self.layers.push(layer).unwrap()
    }
}

const P1: PointerId = PointerId(1);
const P2: PointerId = PointerId(2);

fn down(pointer: PointerId, x: f64, y: f64) -> InputEvent {
    InputEvent::Down {
        pointer,
        position: Point::new(x, y),
        button: PointerButton::Primary,
    }
}

fn mv(pointer: PointerId, x: f64, y: f64) -> InputEvent {
    InputEvent::Move {
        pointer,
        position: Point::new(x, y),
    }
}

fn up(pointer: PointerId) -> InputEvent {
    InputEvent::Up { pointer }
}

#[test]
fn select_tool_draws_snapped_selection() {
    let mut fx = Fixture::new();
    let mut gc = GestureController::new(Tool::Select);

    assert_eq!(gc.handle(down(P1, 0.0, 0.0), &mut fx.ctx()), GestureEffect::Selection);
    assert_eq!(gc.mode(), GestureMode::DrawingSelection { pointer: P1 });
    assert_eq!(gc.handle(mv(P1, 200.0, 50.0), &mut fx.ctx()), GestureEffect::Selection);
    gc.handle(up(P1), &mut fx.ctx());

    let r = fx.selection.current().unwrap();
    assert_eq!((r.x, r.y, r.height), (0.0, 0.0, 50.0));
    assert!((r.width - 89.0).abs() < 1e-9);
    assert_eq!(gc.mode(), GestureMode::Idle);
}

#[test]
fn tiny_selection_is_discarded_on_release() {
    let mut fx = Fixture::new();
    let mut gc = GestureController::new(Tool::Select);
    gc.handle(down(P1, 0.0, 0.0), &mut fx.ctx());
    gc.handle(mv(P1, 5.0, 5.0), &mut fx.ctx());
    gc.handle(up(P1), &mut fx.ctx());
    assert_eq!(fx.selection.current(), None);
}

#[test]
fn pressing_inside_selection_slides_it_on_one_axis() {
    let mut fx = Fixture::new();
    fx.selection.set(Region::new(0.0, 0.0, 100.0, 100.0));
    let mut gc = GestureController::new(Tool::Select);

    assert_eq!(gc.handle(down(P1, 50.0, 50.0), &mut fx.ctx()), GestureEffect::Ignored);
    assert_eq!(gc.mode(), GestureMode::DraggingSelection { pointer: P1 });
    gc.handle(mv(P1, 70.0, 53.0), &mut fx.ctx());
    gc.handle(mv(P1, 80.0, 90.0), &mut fx.ctx());
    gc.handle(up(P1), &mut fx.ctx());

    assert_eq!(fx.selection.current(), Some(Region::new(30.0, 0.0, 100.0, 100.0)));
}

#[test]
fn pressing_outside_selection_starts_a_new_one() {
    let mut fx = Fixture::new();
    fx.selection.set(Region::new(0.0, 0.0, 100.0, 100.0));
    let mut gc = GestureController::new(Tool::Select);
    gc.handle(down(P1, 500.0, 500.0), &mut fx.ctx());
    assert_eq!(fx.selection.current(), None);
    assert_eq!(gc.mode(), GestureMode::DrawingSelection { pointer: P1 });
}

#[test]
fn middle_button_pans_with_any_tool() {
    let mut fx = Fixture::new();
    let mut gc = GestureController::new(Tool::Eraser);
    gc.handle(
        InputEvent::Down {
            pointer: P1,
            position: Point::new(100.0, 100.0),
            button: PointerButton::Middle,
        },
        &mut fx.ctx(),
    );
    assert_eq!(gc.handle(mv(P1, 110.0, 105.0), &mut fx.ctx()), GestureEffect::Viewport);
    assert_eq!(fx.viewport.offset(), Vec2::new(10.0, 5.0));
}

#[test]
fn hand_tool_pans() {
    let mut fx = Fixture::new();
    let mut gc = GestureController::new(Tool::Hand);
    gc.handle(down(P1, 0.0, 0.0), &mut fx.ctx());
    gc.handle(mv(P1, -20.0, 0.0), &mut fx.ctx());
    gc.handle(mv(P1, -30.0, 10.0), &mut fx.ctx());
    assert_eq!(fx.viewport.offset(), Vec2::new(-30.0, 10.0));
}

#[test]
fn move_tool_keeps_grab_point() {
    let mut fx = Fixture::new();
    let id = fx.add_layer("A", Region::new(100.0, 100.0, 50.0, 50.0));
    fx.layers.deselect();
    let mut gc = GestureController::new(Tool::Move);

    assert_eq!(
        gc.handle(down(P1, 110.0, 120.0), &mut fx.ctx()),
        GestureEffect::LayerFocused(id)
    );
    assert_eq!(fx.layers.selected(), Some(id));
    assert_eq!(gc.handle(mv(P1, 210.0, 220.0), &mut fx.ctx()), GestureEffect::LayerMoved(id));
    assert_eq!(fx.layers.get(id).unwrap().bounds().origin(), Point::new(200.0, 200.0));
}

#[test]
fn move_tool_skips_locked_layers() {
    let mut fx = Fixture::new();
    let below = fx.add_layer("below", Region::new(0.0, 0.0, 100.0, 100.0));
    let above = fx.add_layer("above", Region::new(0.0, 0.0, 100.0, 100.0));
    fx.layers
        .update(
            above,
            &crate::layers::model::LayerPatch {
                locked: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    let mut gc = GestureController::new(Tool::Move);
    assert_eq!(
        gc.handle(down(P1, 10.0, 10.0), &mut fx.ctx()),
        GestureEffect::LayerFocused(below)
    );
}

#[test]
fn layer_edits_are_suspended_while_generating() {
    let mut fx = Fixture::new();
    let id = fx.add_layer("A", Region::new(0.0, 0.0, 100.0, 100.0));
    fx.generating = true;

    let mut gc = GestureController::new(Tool::Move);
    assert_eq!(gc.handle(down(P1, 10.0, 10.0), &mut fx.ctx()), GestureEffect::Ignored);
    assert_eq!(gc.mode(), GestureMode::Idle);

    gc.set_tool(Tool::Eraser);
    assert_eq!(gc.handle(down(P1, 10.0, 10.0), &mut fx.ctx()), GestureEffect::Ignored);
    assert!(fx.layers.get(id).is_some());

    gc.set_tool(Tool::Select);
    assert_eq!(gc.handle(down(P1, 10.0, 10.0), &mut fx.ctx()), GestureEffect::Selection);
}

#[test]
fn eraser_removes_topmost_hit_and_clears_redo() {
    let mut fx = Fixture::new();
    let a = fx.add_layer("A", Region::new(0.0, 0.0, 100.0, 100.0));
    let _b = fx.add_layer("B", Region::new(500.0, 500.0, 10.0, 10.0));
    fx.layers.undo();
    assert!(fx.layers.can_redo());

    let mut gc = GestureController::new(Tool::Eraser);
    assert_eq!(gc.handle(down(P1, 50.0, 50.0), &mut fx.ctx()), GestureEffect::LayerErased(a));
    assert!(fx.layers.is_empty());
    assert!(!fx.layers.can_redo());
    assert_eq!(gc.handle(mv(P1, 60.0, 60.0), &mut fx.ctx()), GestureEffect::Ignored);
}

#[test]
fn double_click_selects_layer_bounds_even_when_locked() {
    let mut fx = Fixture::new();
    let bounds = Region::new(10.0, 20.0, 300.0, 200.0);
    let id = fx.add_layer("A", bounds);
    fx.layers
        .update(
            id,
            &crate::layers::model::LayerPatch {
                locked: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    fx.layers.deselect();

    let mut gc = GestureController::new(Tool::Hand);
    let effect = gc.handle(
        InputEvent::DoubleClick {
            position: Point::new(50.0, 50.0),
        },
        &mut fx.ctx(),
    );
    assert_eq!(effect, GestureEffect::LayerFocused(id));
    assert_eq!(fx.selection.current(), Some(bounds));
    assert_eq!(fx.layers.selected(), Some(id));
}

#[test]
fn second_pointer_preempts_into_pinch() {
    let mut fx = Fixture::new();
    let mut gc = GestureController::new(Tool::Select);
    gc.handle(down(P1, 400.0, 500.0), &mut fx.ctx());
    gc.handle(down(P2, 600.0, 500.0), &mut fx.ctx());
    assert!(matches!(gc.mode(), GestureMode::PinchZoomPan { .. }));
    assert!(!fx.selection.is_dragging());

    assert_eq!(gc.handle(mv(P2, 800.0, 500.0), &mut fx.ctx()), GestureEffect::Viewport);
    assert!((fx.viewport.zoom() - 2.0).abs() < 1e-9);

    gc.handle(up(P1), &mut fx.ctx());
    assert_eq!(gc.mode(), GestureMode::Idle);
    assert_eq!(gc.handle(mv(P2, 900.0, 500.0), &mut fx.ctx()), GestureEffect::Ignored);
}

fn assert_second_pointer_pinches(fx: &mut Fixture, gc: &mut GestureController) {
    gc.handle(down(P1, 400.0, 500.0), &mut fx.ctx());
    assert_eq!(gc.mode(), GestureMode::Idle);
    gc.handle(down(P2, 600.0, 500.0), &mut fx.ctx());
    assert!(matches!(gc.mode(), GestureMode::PinchZoomPan { .. }));
    assert_eq!(gc.handle(mv(P2, 800.0, 500.0), &mut fx.ctx()), GestureEffect::Viewport);
    assert!((fx.viewport.zoom() - 2.0).abs() < 1e-9);
}

#[test]
fn pinch_starts_after_move_press_on_empty_canvas() {
    let mut fx = Fixture::new();
    let mut gc = GestureController::new(Tool::Move);
    assert_second_pointer_pinches(&mut fx, &mut gc);
}

#[test]
fn pinch_starts_after_suspended_move_press() {
    let mut fx = Fixture::new();
    fx.add_layer("A", Region::new(0.0, 0.0, 1000.0, 1000.0));
    fx.generating = true;
    let mut gc = GestureController::new(Tool::Move);
    assert_second_pointer_pinches(&mut fx, &mut gc);
}

#[test]
fn pinch_starts_after_secondary_press() {
    let mut fx = Fixture::new();
    let mut gc = GestureController::new(Tool::Select);
    gc.handle(
        InputEvent::Down {
            pointer: P1,
            position: Point::new(400.0, 500.0),
            button: PointerButton::Secondary,
        },
        &mut fx.ctx(),
    );
    gc.handle(down(P2, 600.0, 500.0), &mut fx.ctx());
    assert!(matches!(gc.mode(), GestureMode::PinchZoomPan { .. }));
}

#[test]
fn pinch_keeps_center_anchored() {
    let mut fx = Fixture::new();
    let mut gc = GestureController::new(Tool::Hand);
    gc.handle(down(P1, 400.0, 500.0), &mut fx.ctx());
    gc.handle(down(P2, 600.0, 500.0), &mut fx.ctx());
    let anchor_world = fx.viewport.screen_to_world(Point::new(500.0, 500.0));
    gc.handle(mv(P1, 300.0, 500.0), &mut fx.ctx());
    gc.handle(mv(P2, 700.0, 500.0), &mut fx.ctx());
    let after = fx.viewport.world_to_screen(anchor_world);
    assert!((after.x - 500.0).abs() < 1e-9 && (after.y - 500.0).abs() < 1e-9);
}

#[test]
fn vanished_layer_aborts_drag() {
    let mut fx = Fixture::new();
    let id = fx.add_layer("A", Region::new(0.0, 0.0, 100.0, 100.0));
    let mut gc = GestureController::new(Tool::Move);
    gc.handle(down(P1, 10.0, 10.0), &mut fx.ctx());
    fx.layers.remove(id);
    assert_eq!(gc.handle(mv(P1, 20.0, 20.0), &mut fx.ctx()), GestureEffect::Ignored);
    assert_eq!(gc.mode(), GestureMode::Idle);
}

#[test]
fn wheel_zooms_at_cursor() {
    let mut fx = Fixture::new();
    let mut gc = GestureController::default();
    let at = Point::new(250.0, 250.0);
    let effect = gc.handle(
        InputEvent::Wheel {
            position: at,
            delta_y: -100.0,
        },
        &mut fx.ctx(),
    );
    assert_eq!(effect, GestureEffect::Viewport);
    assert!(fx.viewport.zoom() > 1.0);
    assert_eq!(
        gc.handle(
            InputEvent::Wheel {
                position: at,
                delta_y: 0.0,
            },
            &mut fx.ctx()
        ),
        GestureEffect::Ignored
    );
}
