use crate::foundation::core::{LayerId, Point, Region};
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::layers::model::{Layer, LayerPatch};

/// Direction for [`LayerStack::move_one`]. `Up` moves toward the top of the stack (index 0).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackDirection {
    /// Toward index 0 (drawn later, on top).
    Up,
    /// Toward the end (drawn earlier, below).
    Down,
}

/// Which layers a hit test may return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitFilter {
    /// Visible layers that are not locked (move and eraser tools).
    Editable,
    /// Any visible layer (double-click selection).
    Visible,
}

impl HitFilter {
    fn admits(self, layer: &Layer) -> bool {
        match self {
            HitFilter::Editable => layer.visible() && !layer.locked(),
            HitFilter::Visible => layer.visible(),
        }
    }
}

/// Ordered layers, most recent first, with a one-level-per-layer undo history.
///
/// Index 0 is the topmost layer; rendering walks the stack back to front. Undo takes the front
/// layer off into a redo buffer and redo puts it back, so the stack itself is the history.
#[derive(Clone, Debug, Default)]
pub struct LayerStack {
    layers: Vec<Layer>,
    redo: Vec<Layer>,
    selected: Option<LayerId>,
    next_id: u64,
}

impl LayerStack {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id no layer of this stack has used.
    pub fn next_id(&mut self) -> LayerId {
        self.next_id += 1;
        LayerId(self.next_id)
    }

    /// Layers, topmost first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layers in draw order (bottom first).
    pub fn bottom_to_top(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id() == id)
    }

    /// Currently selected layer id.
    pub fn selected(&self) -> Option<LayerId> {
        self.selected
    }

    /// Currently selected layer.
    pub fn selected_layer(&self) -> Option<&Layer> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Select a layer that is in the stack.
    pub fn select(&mut self, id: LayerId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.selected = Some(id);
        true
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Layers waiting in the redo buffer, most recently undone first.
    pub fn redo_buffer(&self) -> &[Layer] {
        &self.redo
    }

    pub fn can_undo(&self) -> bool {
        !self.layers.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Insert `layer` on top, select it and clear the redo buffer.
    pub fn push(&mut self, layer: Layer) -> CanvasResult<LayerId> {
        let id = layer.id();
        if self.get(id).is_some() {
            return Err(CanvasError::validation(format!(
                "{id} is already in the stack"
            )));
        }
        layer.bounds().ensure_positive()?;
        self.next_id = self.next_id.max(id.0);
        self.layers.insert(0, layer);
        self.redo.clear();
        self.selected = Some(id);
        tracing::debug!(%id, len = self.layers.len(), "layer pushed");
        Ok(id)
    }

    /// Delete a layer. Clears the redo buffer and the selection if it pointed at the layer.
    pub fn remove(&mut self, id: LayerId) -> Option<Layer> {
        let idx = self.index_of(id)?;
        let layer = self.layers.remove(idx);
        self.redo.clear();
        if self.selected == Some(id) {
            self.selected = None;
        }
        tracing::debug!(%id, "layer removed");
        Some(layer)
    }

    /// Swap a layer with its neighbor. No-op at either end.
    pub fn move_one(&mut self, id: LayerId, dir: StackDirection) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let other = match dir {
            StackDirection::Up if idx > 0 => idx - 1,
            StackDirection::Down if idx + 1 < self.layers.len() => idx + 1,
            _ => return false,
        };
        self.layers.swap(idx, other);
        true
    }

    /// Move the layer at `from` so that it ends up at index `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.layers.len();
        if from >= len || to >= len {
            return false;
        }
        if from != to {
            let layer = self.layers.remove(from);
            self.layers.insert(to, layer);
        }
        true
    }

    /// Shallow-merge `patch` into a layer. `Ok(false)` when the id is unknown.
    pub fn update(&mut self, id: LayerId, patch: &LayerPatch) -> CanvasResult<bool> {
        let Some(layer) = self.layer_mut(id) else {
            return Ok(false);
        };
        layer.apply(patch)?;
        Ok(true)
    }

    /// Move a layer's origin, keeping its size.
    pub fn move_to(&mut self, id: LayerId, origin: Point) -> bool {
        match self.layer_mut(id) {
            Some(layer) => {
                layer.set_origin(origin);
                true
            }
            None => false,
        }
    }

    /// Flip visibility; returns the new state.
    pub fn toggle_visibility(&mut self, id: LayerId) -> Option<bool> {
        let layer = self.layer_mut(id)?;
        let visible = !layer.visible();
        layer.set_visible(visible);
        Some(visible)
    }

    /// Set the edge feather, clamped to `0..=100`. Returns the applied value.
    pub fn set_feather(&mut self, id: LayerId, feather: u8) -> Option<u8> {
        let layer = self.layer_mut(id)?;
        layer.set_feather(feather);
        Some(layer.feather())
    }

    /// Set video playback; `false` for unknown ids and non-video layers.
    pub fn set_playing(&mut self, id: LayerId, playing: bool) -> bool {
        self.layer_mut(id).is_some_and(|l| l.set_playing(playing))
    }

    /// Flip video playback; returns the new state.
    pub fn toggle_playing(&mut self, id: LayerId) -> Option<bool> {
        let layer = self.layer_mut(id)?;
        let playing = !layer.playing()?;
        layer.set_playing(playing);
        Some(playing)
    }

    /// Restore a layer's creation placement. No-op without one.
    pub fn reset_geometry(&mut self, id: LayerId) -> bool {
        self.layer_mut(id).is_some_and(|l| l.reset_geometry())
    }

    /// Take the topmost layer off into the redo buffer.
    pub fn undo(&mut self) -> Option<LayerId> {
        if self.layers.is_empty() {
            return None;
        }
        let layer = self.layers.remove(0);
        let id = layer.id();
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.redo.insert(0, layer);
        tracing::debug!(%id, "undo");
        Some(id)
    }

    /// Put the most recently undone layer back on top and select it.
    pub fn redo(&mut self) -> Option<LayerId> {
        if self.redo.is_empty() {
            return None;
        }
        let layer = self.redo.remove(0);
        let id = layer.id();
        self.layers.insert(0, layer);
        self.selected = Some(id);
        tracing::debug!(%id, "redo");
        Some(id)
    }

    /// Topmost layer admitted by `filter` whose box contains `p`.
    pub fn hit_test(&self, p: Point, filter: HitFilter) -> Option<&Layer> {
        self.layers
            .iter()
            .find(|l| filter.admits(l) && l.contains(p))
    }

    /// Bounding box of every visible layer.
    pub fn visible_bounds(&self) -> Option<Region> {
        let boxes: Vec<Region> = self
            .layers
            .iter()
            .filter(|l| l.visible())
            .map(Layer::bounds)
            .collect();
        Region::bounding(boxes.iter())
    }

    fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id() == id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/stack.rs"]
mod tests;
