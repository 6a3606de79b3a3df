//! Genvas is a layered canvas engine for region-based image and video generation.
//!
//! The public API centers on [`CanvasSession`], which owns the state containers:
//!
//! - a [`Viewport`] for pan/zoom between screen and world space
//! - a [`SelectionEngine`] whose drawn rectangles snap to a model's [`ResolutionTable`]
//! - a [`LayerStack`] with undo/redo, reordering and geometry reset
//! - a [`GestureController`] that turns pointer streams into operations on the above
//!
//! Generation runs in three steps so the canvas stays interactive while a batch is in flight:
//! [`CanvasSession::begin_generation`] snapshots the selection into a [`GenerationJob`],
//! [`GenerationJob::run`] awaits a [`GenerationService`], and
//! [`CanvasSession::finish_generation`] places the results as new layers.
#![forbid(unsafe_code)]

mod assets;
mod foundation;

pub(crate) mod config;
pub(crate) mod generate;
pub(crate) mod gesture;
pub(crate) mod layers;
pub(crate) mod render;
pub(crate) mod resolution;
pub(crate) mod selection;
pub(crate) mod session;
pub(crate) mod viewport;

pub use crate::foundation::core::{LayerId, Point, Rect, Region, Size, Vec2};
pub use crate::foundation::error::{CanvasError, CanvasResult};

pub use crate::assets::decode::{decode_image, encode_png, probe_dimensions};
pub use crate::assets::store::{AssetLoader, AssetStore, normalize_rel_path};
pub use crate::assets::{EncodedImage, PreparedImage};
pub use crate::config::{CanvasConfig, GenerationConfig, SelectionConfig, ViewportConfig};
pub use crate::generate::job::{
    GeneratedLayer, GenerationJob, GenerationOutcome, GenerationTicket, JobRequest,
};
pub use crate::generate::policy::{FamilyFit, RenderFitPolicy};
pub use crate::generate::prompt::{
    BLEND_REFERENCES_SUFFIX, MAGIC_FILL_PROMPT, PASTED_LAYER_NAME, PRESERVE_GEOMETRY_SUFFIX,
    augment, generation_layer_name, video_layer_name,
};
pub use crate::generate::references::ReferenceSet;
pub use crate::generate::service::{GeneratedAsset, GenerationService, ImageRequest, VideoRequest};
pub use crate::gesture::{
    CanvasContext, GestureController, GestureEffect, GestureMode, InputEvent, PointerButton,
    PointerId, Tool,
};
pub use crate::layers::model::{
    AssetSource, Layer, LayerContent, LayerKind, LayerPatch, MAX_FEATHER, RenderFit,
};
pub use crate::layers::stack::{HitFilter, LayerStack, StackDirection};
pub use crate::render::composite::{PremulRgba8, over};
pub use crate::render::pipeline::{CompositeOptions, ExportImage, export_composite, snapshot};
pub use crate::render::raster::{DrawStyle, MAX_SURFACE_DIM, Surface, cover_crop, feather_coverage};
pub use crate::resolution::{
    AspectRatioHint, ModelFamily, ModelKind, Resolution, ResolutionTable, SizeHint,
};
pub use crate::selection::{Axis, ResolutionStatus, SelectionEngine, compliance, snap_to_table};
pub use crate::session::{
    CanvasSession, GenerationReport, GenerationRequest, LayerDownload, PasteTarget, Pasted,
};
pub use crate::viewport::Viewport;
