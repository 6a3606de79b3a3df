use std::sync::Arc;

use crate::foundation::error::CanvasResult;
use crate::layers::model::AssetSource;
use crate::resolution::{AspectRatioHint, ModelKind, SizeHint};

/// One image generation call.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageRequest {
    pub model: ModelKind,
    pub prompt: String,
    pub aspect_ratio: AspectRatioHint,
    pub size: SizeHint,
    /// Encoded inputs: the snapshot first (if any), then the references.
    pub images: Vec<Arc<[u8]>>,
    /// References without a snapshot: the output geometry must follow `aspect_ratio`.
    pub force_ratio: bool,
}

impl ImageRequest {
    /// Whether the backend should receive `aspect_ratio`.
    ///
    /// The fast model infers geometry from an input cut and must not be told otherwise; the pro
    /// model falls back to square output without it.
    pub fn sends_aspect_ratio(&self) -> bool {
        self.images.is_empty() || self.force_ratio || self.model == ModelKind::ProImage
    }

    /// Whether the backend should receive `size`.
    pub fn sends_image_size(&self) -> bool {
        self.model == ModelKind::ProImage && (self.images.is_empty() || self.force_ratio)
    }
}

/// One video generation call.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoRequest {
    pub model: ModelKind,
    pub prompt: String,
    /// Encoded first frame.
    pub start_image: Arc<[u8]>,
    /// Encoded last frame for interpolation.
    pub end_image: Option<Arc<[u8]>>,
    pub aspect_ratio: AspectRatioHint,
}

impl VideoRequest {
    pub fn wants_1080p(&self) -> bool {
        self.model == ModelKind::VideoHq
    }
}

/// What the backend handed back.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedAsset {
    pub source: AssetSource,
}

/// The remote generation backend.
///
/// `Ok(None)` means the call succeeded without producing an asset. Errors abort the rest of the
/// current batch.
#[allow(async_fn_in_trait)]
pub trait GenerationService {
    async fn generate_image(&self, request: &ImageRequest) -> CanvasResult<Option<GeneratedAsset>>;

    async fn generate_video(&self, request: &VideoRequest) -> CanvasResult<Option<GeneratedAsset>>;
}

#[cfg(test)]
#[path = "../../tests/unit/generate/service.rs"]
mod tests;
