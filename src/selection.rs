//! Selection rectangle with aspect snapping.
//!
//! While the user drags out a selection, its ratio is continuously snapped to the nearest native
//! resolution of the active model, anchored at the press point. Dragging an existing selection
//! locks to one axis after a small threshold so a snapped rectangle can be slid without drifting.

use crate::config::SelectionConfig;
use crate::foundation::core::{Point, Region};
use crate::resolution::{Resolution, ResolutionTable};

/// Axis a selection move is locked to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Only `x` changes.
    Horizontal,
    /// Only `y` changes.
    Vertical,
}

/// Advisory quality status of the current selection.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolutionStatus {
    /// Within native size, or no table entry matches closely enough to judge.
    Ok,
    /// Larger than the matching native resolution; the result will be upscaled.
    ReducedQuality {
        /// Native entry the selection was matched against.
        native: Resolution,
    },
}

impl ResolutionStatus {
    /// `true` for [`ResolutionStatus::ReducedQuality`].
    pub fn is_warning(&self) -> bool {
        matches!(self, ResolutionStatus::ReducedQuality { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
enum DragState {
    Idle,
    Drawing {
        anchor: Point,
    },
    Moving {
        start: Point,
        origin: Point,
        axis: Option<Axis>,
    },
}

/// Owner of the (at most one) world-space selection rectangle.
#[derive(Clone, Debug)]
pub struct SelectionEngine {
    rect: Option<Region>,
    drag: DragState,
    cfg: SelectionConfig,
}

/// Snap the drag from `anchor` to `current` onto the nearest ratio in `table`.
///
/// The controlling dimension is kept from the raw drag and the other one is derived from the
/// entry's ratio; the rectangle grows away from `anchor` in the drag direction.
pub fn snap_to_table(anchor: Point, current: Point, table: &ResolutionTable) -> Region {
    let raw_w = (current.x - anchor.x).abs();
    let raw_h = (current.y - anchor.y).abs();
    let raw_ratio = if raw_h == 0.0 { 1.0 } else { raw_w / raw_h };

    let best = table.nearest(raw_ratio);
    let (w, h) = if raw_ratio > best.ratio {
        (raw_h * best.ratio, raw_h)
    } else {
        (raw_w, raw_w / best.ratio)
    };

    let x = if current.x < anchor.x { anchor.x - w } else { anchor.x };
    let y = if current.y < anchor.y { anchor.y - h } else { anchor.y };
    Region::new(x, y, w, h)
}

/// Judge `selection` against one native entry.
pub fn compliance(selection: &Region, native: &Resolution, slack_px: f64) -> ResolutionStatus {
    if selection.width > f64::from(native.w) + slack_px
        || selection.height > f64::from(native.h) + slack_px
    {
        ResolutionStatus::ReducedQuality {
            native: native.clone(),
        }
    } else {
        ResolutionStatus::Ok
    }
}

impl SelectionEngine {
    /// Engine without a selection.
    pub fn new(cfg: SelectionConfig) -> Self {
        Self {
            rect: None,
            drag: DragState::Idle,
            cfg,
        }
    }

    /// Current selection.
    pub fn current(&self) -> Option<Region> {
        self.rect
    }

    /// Thresholds in use.
    pub fn config(&self) -> &SelectionConfig {
        &self.cfg
    }

    /// Replace the selection (e.g. with a layer's bounds) and abort any drag.
    pub fn set(&mut self, rect: Region) {
        self.rect = Some(rect);
        self.drag = DragState::Idle;
    }

    /// Drop the selection and abort any drag.
    pub fn clear(&mut self) {
        self.rect = None;
        self.drag = DragState::Idle;
    }

    /// `true` while a draw or move drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag != DragState::Idle
    }

    /// `true` when `p` falls inside the current selection.
    pub fn contains(&self, p: Point) -> bool {
        self.rect.is_some_and(|r| r.contains(p))
    }

    /// Start drawing a new selection from `anchor`, discarding the old one.
    pub fn begin_draw(&mut self, anchor: Point) {
        self.rect = None;
        self.drag = DragState::Drawing { anchor };
    }

    /// Update the selection being drawn; the result always has a ratio from `table`.
    pub fn update_draw(&mut self, current: Point, table: &ResolutionTable) -> Option<Region> {
        let DragState::Drawing { anchor } = self.drag else {
            return None;
        };
        let rect = snap_to_table(anchor, current, table);
        self.rect = Some(rect);
        Some(rect)
    }

    /// Start sliding the selection if `p` is inside it.
    pub fn begin_move(&mut self, p: Point) -> bool {
        let Some(rect) = self.rect.filter(|r| r.contains(p)) else {
            return false;
        };
        self.drag = DragState::Moving {
            start: p,
            origin: rect.origin(),
            axis: None,
        };
        true
    }

    /// Slide the selection along its locked axis. The axis is chosen by the first movement that
    /// exceeds the threshold; until then the selection stays put.
    pub fn update_move(&mut self, p: Point) -> Option<Region> {
        let threshold = self.cfg.axis_lock_threshold;
        let DragState::Moving {
            start,
            origin,
            axis,
        } = &mut self.drag
        else {
            return None;
        };
        let dx = p.x - start.x;
        let dy = p.y - start.y;

        if axis.is_none() && (dx.abs() > threshold || dy.abs() > threshold) {
            *axis = Some(if dx.abs() > dy.abs() {
                Axis::Horizontal
            } else {
                Axis::Vertical
            });
            tracing::debug!(?axis, "selection move axis locked");
        }

        let target = match (*axis)? {
            Axis::Horizontal => Point::new(origin.x + dx, origin.y),
            Axis::Vertical => Point::new(origin.x, origin.y + dy),
        };
        let rect = self.rect?.with_origin(target);
        self.rect = Some(rect);
        Some(rect)
    }

    /// Axis the current move is locked to, if any.
    pub fn locked_axis(&self) -> Option<Axis> {
        match self.drag {
            DragState::Moving { axis, .. } => axis,
            _ => None,
        }
    }

    /// Finish any drag. A drawn selection smaller than the minimum size is discarded.
    pub fn end_drag(&mut self) -> Option<Region> {
        let was_drawing = matches!(self.drag, DragState::Drawing { .. });
        self.drag = DragState::Idle;
        if was_drawing
            && let Some(r) = self.rect
            && (r.width < self.cfg.min_size || r.height < self.cfg.min_size)
        {
            tracing::debug!(w = r.width, h = r.height, "selection too small, discarded");
            self.rect = None;
        }
        self.rect
    }

    /// Compare the selection against the table entry whose ratio matches within the configured
    /// tolerance.
    pub fn resolution_status(&self, table: &ResolutionTable) -> ResolutionStatus {
        let Some(rect) = self.rect else {
            return ResolutionStatus::Ok;
        };
        match table.matching(rect.ratio(), self.cfg.ratio_tolerance) {
            Some(native) => compliance(&rect, native, self.cfg.native_slack_px),
            None => ResolutionStatus::Ok,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/selection.rs"]
mod tests;
