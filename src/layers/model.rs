use std::path::PathBuf;
use std::sync::Arc;

use crate::foundation::core::{LayerId, Point, Region};
use crate::foundation::error::{CanvasError, CanvasResult};

/// Highest accepted feather value.
pub const MAX_FEATHER: u8 = 100;

/// Where a layer's pixels come from.
#[derive(Clone, Debug, PartialEq)]
pub enum AssetSource {
    /// Encoded image bytes held in memory (uploads, pastes, generated images).
    Bytes(Arc<[u8]>),
    /// A file on disk, absolute or relative to the asset store root.
    File(PathBuf),
    /// A remote or opaque URI the engine cannot rasterize itself (e.g. a rendered video).
    Remote(String),
}

impl AssetSource {
    /// Wrap owned bytes.
    pub fn bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        AssetSource::Bytes(bytes.into())
    }
}

/// How a layer's asset is mapped into its box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderFit {
    /// Scale to cover the box, cropping the overflow.
    Cover,
    /// Stretch to the exact box.
    #[default]
    Fill,
}

/// Layer kind without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Uploaded or pasted picture.
    Image,
    /// Generated picture.
    Generation,
    /// Generated video.
    Video,
}

/// Kind-specific payload of a layer.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerContent {
    /// Uploaded or pasted picture.
    Image {
        /// Picture source.
        source: AssetSource,
    },
    /// Picture returned by the generation backend.
    Generation {
        /// Picture source.
        source: AssetSource,
        /// Prompt the picture was generated from.
        prompt: String,
    },
    /// Video returned by the generation backend.
    Video {
        /// Video source.
        source: AssetSource,
        /// Playback state.
        playing: bool,
    },
}

impl LayerContent {
    /// Kind tag.
    pub fn kind(&self) -> LayerKind {
        match self {
            LayerContent::Image { .. } => LayerKind::Image,
            LayerContent::Generation { .. } => LayerKind::Generation,
            LayerContent::Video { .. } => LayerKind::Video,
        }
    }

    /// Asset source regardless of kind.
    pub fn source(&self) -> &AssetSource {
        match self {
            LayerContent::Image { source }
            | LayerContent::Generation { source, .. }
            | LayerContent::Video { source, .. } => source,
        }
    }

    /// Still-image source; `None` for video, which has no raster frame to composite.
    pub fn still_source(&self) -> Option<&AssetSource> {
        match self {
            LayerContent::Video { .. } => None,
            other => Some(other.source()),
        }
    }
}

/// A positioned asset on the canvas.
///
/// Layers are owned by [`crate::LayerStack`]; geometry and flags change only through the stack's
/// operations.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    id: LayerId,
    name: String,
    visible: bool,
    locked: bool,
    content: LayerContent,
    bounds: Region,
    initial: Option<Region>,
    feather: u8,
    render_fit: RenderFit,
}

impl Layer {
    /// Create a visible, unlocked layer whose creation placement is `bounds`.
    pub fn new(
        id: LayerId,
        name: impl Into<String>,
        content: LayerContent,
        bounds: Region,
    ) -> CanvasResult<Self> {
        bounds.ensure_positive()?;
        Ok(Self {
            id,
            name: name.into(),
            visible: true,
            locked: false,
            content,
            bounds,
            initial: Some(bounds),
            feather: 0,
            render_fit: RenderFit::default(),
        })
    }

    /// Override the recorded creation placement (or drop it).
    pub fn with_initial(mut self, initial: Option<Region>) -> Self {
        self.initial = initial;
        self
    }

    /// Set the render-fit policy.
    pub fn with_render_fit(mut self, fit: RenderFit) -> Self {
        self.render_fit = fit;
        self
    }

    /// Set the edge feather, clamped to `0..=100`.
    pub fn with_feather(mut self, feather: u8) -> Self {
        self.feather = feather.min(MAX_FEATHER);
        self
    }

    /// Set the visibility flag.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set the lock flag.
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn content(&self) -> &LayerContent {
        &self.content
    }

    pub fn kind(&self) -> LayerKind {
        self.content.kind()
    }

    /// World-space box.
    pub fn bounds(&self) -> Region {
        self.bounds
    }

    /// Placement recorded at creation.
    pub fn initial(&self) -> Option<Region> {
        self.initial
    }

    pub fn feather(&self) -> u8 {
        self.feather
    }

    pub fn render_fit(&self) -> RenderFit {
        self.render_fit
    }

    /// Playback state for video layers, `None` otherwise.
    pub fn playing(&self) -> Option<bool> {
        match self.content {
            LayerContent::Video { playing, .. } => Some(playing),
            _ => None,
        }
    }

    /// Suggested file name for saving the layer's asset: the name with whitespace runs turned
    /// into `_`, plus `.mp4` for videos and `.png` otherwise.
    pub fn download_name(&self) -> String {
        let stem = self.name.split_whitespace().collect::<Vec<_>>().join("_");
        let stem = if stem.is_empty() {
            self.id.to_string()
        } else {
            stem
        };
        let ext = match self.kind() {
            LayerKind::Video => "mp4",
            LayerKind::Image | LayerKind::Generation => "png",
        };
        format!("{stem}.{ext}")
    }

    /// `true` when `p` lies inside the box (edges included).
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    pub(crate) fn set_origin(&mut self, origin: Point) {
        self.bounds = self.bounds.with_origin(origin);
    }

    pub(crate) fn set_feather(&mut self, feather: u8) {
        self.feather = feather.min(MAX_FEATHER);
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_playing(&mut self, value: bool) -> bool {
        match &mut self.content {
            LayerContent::Video { playing, .. } => {
                *playing = value;
                true
            }
            _ => false,
        }
    }

    /// Restore the creation placement. Returns `false` when none was recorded.
    pub(crate) fn reset_geometry(&mut self) -> bool {
        match self.initial {
            Some(initial) => {
                self.bounds = initial;
                true
            }
            None => false,
        }
    }

    pub(crate) fn apply(&mut self, patch: &LayerPatch) -> CanvasResult<()> {
        let bounds = Region::new(
            patch.x.unwrap_or(self.bounds.x),
            patch.y.unwrap_or(self.bounds.y),
            patch.width.unwrap_or(self.bounds.width),
            patch.height.unwrap_or(self.bounds.height),
        );
        bounds.ensure_positive()?;
        if let Some(feather) = patch.feather
            && feather > MAX_FEATHER
        {
            return Err(CanvasError::validation(format!(
                "feather must be within 0..={MAX_FEATHER}, got {feather}"
            )));
        }

        self.bounds = bounds;
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }
        if let Some(feather) = patch.feather {
            self.feather = feather;
        }
        if let Some(fit) = patch.render_fit {
            self.render_fit = fit;
        }
        if let Some(playing) = patch.playing {
            self.set_playing(playing);
        }
        Ok(())
    }
}

/// Shallow partial update for [`crate::LayerStack::update`]. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerPatch {
    pub name: Option<String>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub feather: Option<u8>,
    pub render_fit: Option<RenderFit>,
    /// Ignored for non-video layers.
    pub playing: Option<bool>,
}

#[cfg(test)]
#[path = "../../tests/unit/layers/model.rs"]
mod tests;
