//! Pointer input routing.
//!
//! [`GestureController`] tracks every pointer that is down and maps single-pointer streams onto
//! the active [`Tool`]. A second pointer always switches to pinch zoom/pan, even when the first
//! press did nothing.

use crate::foundation::core::{LayerId, Point, Vec2};
use crate::layers::stack::{HitFilter, LayerStack};
use crate::resolution::ResolutionTable;
use crate::selection::SelectionEngine;
use crate::viewport::Viewport;

/// Active canvas tool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Draw a new selection, or slide the current one when pressing inside it.
    #[default]
    Select,
    /// Drag the topmost unlocked layer under the pointer.
    Move,
    /// Pan the view.
    Hand,
    /// Delete the topmost unlocked layer under the pointer.
    Eraser,
}

/// Identity of one pointer (mouse, pen, or touch contact).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub u32);

/// Button that started a pointer press. Touch and pen contacts report [`PointerButton::Primary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// Drives the active tool.
    Primary,
    /// Pans with every tool.
    Middle,
    /// Tracked for pinch, otherwise inert.
    Secondary,
}

/// Raw input, positions in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// A pointer made contact.
    Down {
        pointer: PointerId,
        position: Point,
        button: PointerButton,
    },
    /// A tracked pointer moved.
    Move {
        pointer: PointerId,
        position: Point,
    },
    /// A pointer was released.
    Up {
        pointer: PointerId,
    },
    /// The platform took the pointer away; handled like [`InputEvent::Up`].
    Cancel {
        pointer: PointerId,
    },
    /// Focus the topmost visible layer at `position`, locked ones included.
    DoubleClick {
        position: Point,
    },
    /// Zoom anchored at `position`; negative `delta_y` zooms in.
    Wheel {
        position: Point,
        delta_y: f64,
    },
}

/// Interaction the controller is in.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GestureMode {
    #[default]
    Idle,
    Panning {
        pointer: PointerId,
        last: Point,
    },
    DrawingSelection {
        pointer: PointerId,
    },
    DraggingSelection {
        pointer: PointerId,
    },
    DraggingLayer {
        pointer: PointerId,
        layer: LayerId,
        /// Pointer position relative to the layer origin at grab time, in world units.
        grab: Vec2,
    },
    Erasing {
        pointer: PointerId,
    },
    PinchZoomPan {
        last_distance: f64,
        last_center: Point,
    },
}

/// What an event changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureEffect {
    /// Nothing observable changed.
    Ignored,
    /// Pan or zoom changed.
    Viewport,
    /// The selection was drawn, moved, finalized or discarded.
    Selection,
    /// The layer became the selected layer.
    LayerFocused(LayerId),
    /// The layer was dragged to a new origin.
    LayerMoved(LayerId),
    /// The layer was removed from the stack.
    LayerErased(LayerId),
}

/// The state containers a gesture may touch.
#[derive(Debug)]
pub struct CanvasContext<'a> {
    pub viewport: &'a mut Viewport,
    pub selection: &'a mut SelectionEngine,
    pub layers: &'a mut LayerStack,
    /// Resolution table of the active model, for selection snapping.
    pub table: &'a ResolutionTable,
    /// A generation batch is in flight: layer edits are suspended.
    pub generating: bool,
}

/// Turns pointer streams into viewport, selection and layer operations.
///
/// One pointer drives the active tool. A second simultaneous pointer preempts it into pinch
/// zoom/pan, and releasing either returns to idle. Pointers stay tracked until released, even
/// when their press left the controller idle.
#[derive(Clone, Debug, Default)]
pub struct GestureController {
    tool: Tool,
    mode: GestureMode,
    pointers: Vec<(PointerId, Point)>,
}

impl GestureController {
    pub fn new(tool: Tool) -> Self {
        Self {
            tool,
            ..Self::default()
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools; any gesture in progress is dropped.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.mode = GestureMode::Idle;
        self.pointers.clear();
    }

    pub fn mode(&self) -> GestureMode {
        self.mode
    }

    pub fn handle(&mut self, event: InputEvent, ctx: &mut CanvasContext<'_>) -> GestureEffect {
        match event {
            InputEvent::Down {
                pointer,
                position,
                button,
            } => self.on_down(pointer, position, button, ctx),
            InputEvent::Move { pointer, position } => self.on_move(pointer, position, ctx),
            InputEvent::Up { pointer } | InputEvent::Cancel { pointer } => {
                self.on_up(pointer, ctx)
            }
            InputEvent::DoubleClick { position } => self.on_double_click(position, ctx),
            InputEvent::Wheel { position, delta_y } => {
                if ctx.viewport.accepts_gestures() && ctx.viewport.wheel(position, delta_y) {
                    GestureEffect::Viewport
                } else {
                    GestureEffect::Ignored
                }
            }
        }
    }

    fn on_down(
        &mut self,
        pointer: PointerId,
        position: Point,
        button: PointerButton,
        ctx: &mut CanvasContext<'_>,
    ) -> GestureEffect {
        if !ctx.viewport.accepts_gestures() {
            return GestureEffect::Ignored;
        }
        if self.pointers.iter().any(|(id, _)| *id == pointer) || self.pointers.len() >= 2 {
            return GestureEffect::Ignored;
        }
        self.pointers.push((pointer, position));

        if self.pointers.len() == 2 {
            return self.start_pinch(ctx);
        }

        let world = ctx.viewport.screen_to_world(position);
        let (mode, effect) = match (button, self.tool) {
            (PointerButton::Middle, _) | (PointerButton::Primary, Tool::Hand) => (
                GestureMode::Panning {
                    pointer,
                    last: position,
                },
                GestureEffect::Ignored,
            ),
            (PointerButton::Secondary, _) => (GestureMode::Idle, GestureEffect::Ignored),
            (PointerButton::Primary, Tool::Select) => {
                if ctx.selection.begin_move(world) {
                    (
                        GestureMode::DraggingSelection { pointer },
                        GestureEffect::Ignored,
                    )
                } else {
                    ctx.selection.begin_draw(world);
                    (
                        GestureMode::DrawingSelection { pointer },
                        GestureEffect::Selection,
                    )
                }
            }
            (PointerButton::Primary, Tool::Move) if !ctx.generating => {
                let hit = ctx
                    .layers
                    .hit_test(world, HitFilter::Editable)
                    .map(|l| (l.id(), world - l.bounds().origin()));
                match hit {
                    Some((id, grab)) => {
                        ctx.layers.select(id);
                        (
                            GestureMode::DraggingLayer {
                                pointer,
                                layer: id,
                                grab,
                            },
                            GestureEffect::LayerFocused(id),
                        )
                    }
                    None => (GestureMode::Idle, GestureEffect::Ignored),
                }
            }
            (PointerButton::Primary, Tool::Eraser) if !ctx.generating => {
                let hit = ctx
                    .layers
                    .hit_test(world, HitFilter::Editable)
                    .map(|l| l.id());
                match hit.and_then(|id| ctx.layers.remove(id)) {
                    Some(removed) => {
                        tracing::debug!(layer = %removed.id(), "erased layer");
                        (
                            GestureMode::Erasing { pointer },
                            GestureEffect::LayerErased(removed.id()),
                        )
                    }
                    None => (GestureMode::Erasing { pointer }, GestureEffect::Ignored),
                }
            }
            (PointerButton::Primary, Tool::Move | Tool::Eraser) => {
                tracing::debug!(tool = ?self.tool, "layer edit suspended while generating");
                (GestureMode::Idle, GestureEffect::Ignored)
            }
        };

        self.set_mode(mode);
        effect
    }

    fn start_pinch(&mut self, ctx: &mut CanvasContext<'_>) -> GestureEffect {
        let effect = match self.mode {
            GestureMode::DrawingSelection { .. } | GestureMode::DraggingSelection { .. } => {
                ctx.selection.end_drag();
                GestureEffect::Selection
            }
            _ => GestureEffect::Ignored,
        };
        let (last_distance, last_center) = self.pinch_geometry();
        self.set_mode(GestureMode::PinchZoomPan {
            last_distance,
            last_center,
        });
        effect
    }

    fn on_move(
        &mut self,
        pointer: PointerId,
        position: Point,
        ctx: &mut CanvasContext<'_>,
    ) -> GestureEffect {
        let Some(slot) = self.pointers.iter_mut().find(|(id, _)| *id == pointer) else {
            return GestureEffect::Ignored;
        };
        slot.1 = position;
        if !ctx.viewport.accepts_gestures() {
            return GestureEffect::Ignored;
        }
        let world = ctx.viewport.screen_to_world(position);

        match self.mode {
            GestureMode::Panning { pointer: p, last } if p == pointer => {
                ctx.viewport.pan_by(position - last);
                self.mode = GestureMode::Panning {
                    pointer: p,
                    last: position,
                };
                GestureEffect::Viewport
            }
            GestureMode::DrawingSelection { pointer: p } if p == pointer => {
                match ctx.selection.update_draw(world, ctx.table) {
                    Some(_) => GestureEffect::Selection,
                    None => GestureEffect::Ignored,
                }
            }
            GestureMode::DraggingSelection { pointer: p } if p == pointer => {
                match ctx.selection.update_move(world) {
                    Some(_) => GestureEffect::Selection,
                    None => GestureEffect::Ignored,
                }
            }
            GestureMode::DraggingLayer {
                pointer: p,
                layer,
                grab,
            } if p == pointer => {
                if ctx.layers.move_to(layer, world - grab) {
                    GestureEffect::LayerMoved(layer)
                } else {
                    tracing::debug!(%layer, "dragged layer is gone, aborting drag");
                    self.set_mode(GestureMode::Idle);
                    GestureEffect::Ignored
                }
            }
            GestureMode::PinchZoomPan {
                last_distance,
                last_center,
            } => {
                let (distance, center) = self.pinch_geometry();
                self.mode = GestureMode::PinchZoomPan {
                    last_distance: distance,
                    last_center: center,
                };
                if last_distance > 0.0 && distance > 0.0 {
                    ctx.viewport
                        .zoom_between(last_center, center, distance / last_distance);
                } else {
                    ctx.viewport.pan_by(center - last_center);
                }
                GestureEffect::Viewport
            }
            _ => GestureEffect::Ignored,
        }
    }

    fn on_up(&mut self, pointer: PointerId, ctx: &mut CanvasContext<'_>) -> GestureEffect {
        let before = self.pointers.len();
        self.pointers.retain(|(id, _)| *id != pointer);
        if self.pointers.len() == before {
            return GestureEffect::Ignored;
        }

        let effect = match self.mode {
            GestureMode::DrawingSelection { pointer: p }
            | GestureMode::DraggingSelection { pointer: p }
                if p == pointer =>
            {
                ctx.selection.end_drag();
                GestureEffect::Selection
            }
            _ => GestureEffect::Ignored,
        };
        self.set_mode(GestureMode::Idle);
        effect
    }

    fn on_double_click(&mut self, position: Point, ctx: &mut CanvasContext<'_>) -> GestureEffect {
        if !ctx.viewport.accepts_gestures() {
            return GestureEffect::Ignored;
        }
        let world = ctx.viewport.screen_to_world(position);
        let Some((id, bounds)) = ctx
            .layers
            .hit_test(world, HitFilter::Visible)
            .map(|l| (l.id(), l.bounds()))
        else {
            return GestureEffect::Ignored;
        };
        ctx.selection.set(bounds);
        ctx.layers.select(id);
        GestureEffect::LayerFocused(id)
    }

    fn pinch_geometry(&self) -> (f64, Point) {
        match self.pointers.as_slice() {
            [(_, a), (_, b)] => (a.distance(*b), a.midpoint(*b)),
            [(_, a)] => (0.0, *a),
            _ => (0.0, Point::ZERO),
        }
    }

    fn set_mode(&mut self, mode: GestureMode) {
        if self.mode != mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "gesture mode");
        }
        self.mode = mode;
    }
}

#[cfg(test)]
#[path = "../tests/unit/gesture.rs"]
mod tests;
