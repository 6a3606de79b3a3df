use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::assets::EncodedImage;
use crate::assets::decode::probe_dimensions;
use crate::assets::store::{AssetLoader, AssetStore};
use crate::config::CanvasConfig;
use crate::foundation::core::{LayerId, Region, Size};
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::generate::job::{GenerationJob, GenerationOutcome, GenerationTicket, JobRequest};
use crate::generate::prompt::{MAGIC_FILL_PROMPT, PASTED_LAYER_NAME, augment};
use crate::generate::references::ReferenceSet;
use crate::generate::service::{GenerationService, ImageRequest, VideoRequest};
use crate::gesture::{CanvasContext, GestureController, GestureEffect, InputEvent, Tool};
use crate::layers::model::{AssetSource, Layer, LayerContent, LayerKind};
use crate::layers::stack::LayerStack;
use crate::render::pipeline::{self, CompositeOptions, ExportImage};
use crate::resolution::{AspectRatioHint, ModelKind, ResolutionTable, SizeHint};
use crate::selection::{ResolutionStatus, SelectionEngine};
use crate::viewport::Viewport;

/// Parameters of one generation batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Requested variations; video models always run one.
    pub variation_count: usize,
    /// Feather given to produced image layers.
    pub feather: u8,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            variation_count: 1,
            feather: 0,
        }
    }

    pub fn with_variations(mut self, count: usize) -> Self {
        self.variation_count = count;
        self
    }

    pub fn with_feather(mut self, feather: u8) -> Self {
        self.feather = feather;
        self
    }
}

/// Where pasted image data goes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PasteTarget {
    #[default]
    Canvas,
    References,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pasted {
    Layer(LayerId),
    Reference(usize),
}

/// Encoded asset of one layer, ready to be saved under `file_name`.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerDownload {
    pub file_name: String,
    pub bytes: Arc<[u8]>,
}

/// Result of applying a finished batch.
#[derive(Debug)]
pub struct GenerationReport {
    /// New layers, in creation order (the last one ends up on top).
    pub created: Vec<LayerId>,
    /// User-facing failure that cut the batch short.
    pub failure: Option<CanvasError>,
}

/// One canvas: the owner of every state container and the entry point for UI actions.
#[derive(Debug)]
pub struct CanvasSession<L: AssetLoader = AssetStore> {
    cfg: CanvasConfig,
    viewport: Viewport,
    selection: SelectionEngine,
    layers: LayerStack,
    assets: L,
    references: ReferenceSet,
    model: ModelKind,
    gestures: GestureController,
    generating: Option<GenerationTicket>,
    next_ticket: u64,
}

impl CanvasSession<AssetStore> {
    /// Session resolving file sources against the working directory.
    pub fn new(screen: Size, cfg: CanvasConfig) -> CanvasResult<Self> {
        Self::with_assets(screen, cfg, AssetStore::default())
    }
}

impl<L: AssetLoader> CanvasSession<L> {
    pub fn with_assets(screen: Size, cfg: CanvasConfig, assets: L) -> CanvasResult<Self> {
        cfg.validate()?;
        Ok(Self {
            viewport: Viewport::new(screen, cfg.viewport.clone()),
            selection: SelectionEngine::new(cfg.selection.clone()),
            layers: LayerStack::new(),
            references: ReferenceSet::new(cfg.generation.reference_limit),
            model: ModelKind::default(),
            gestures: GestureController::default(),
            generating: None,
            next_ticket: 0,
            assets,
            cfg,
        })
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.cfg
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn selection(&self) -> Option<Region> {
        self.selection.current()
    }

    pub fn set_selection(&mut self, region: Region) {
        self.selection.set(region);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    /// Direct access to the stack for the layer panel (reorder, visibility, feather...).
    pub fn layers_mut(&mut self) -> &mut LayerStack {
        &mut self.layers
    }

    pub fn assets_mut(&mut self) -> &mut L {
        &mut self.assets
    }

    pub fn references(&self) -> &ReferenceSet {
        &self.references
    }

    pub fn model(&self) -> ModelKind {
        self.model
    }

    pub fn set_model(&mut self, model: ModelKind) {
        self.model = model;
    }

    pub fn resolution_table(&self) -> &'static ResolutionTable {
        self.model.resolutions()
    }

    pub fn tool(&self) -> Tool {
        self.gestures.tool()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.gestures.set_tool(tool);
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    pub fn is_generating(&self) -> bool {
        self.generating.is_some()
    }

    pub fn handle_input(&mut self, event: InputEvent) -> GestureEffect {
        let mut ctx = CanvasContext {
            viewport: &mut self.viewport,
            selection: &mut self.selection,
            layers: &mut self.layers,
            table: self.model.resolutions(),
            generating: self.generating.is_some(),
        };
        self.gestures.handle(event, &mut ctx)
    }

    /// Advisory quality check of the current selection against the active model.
    pub fn resolution_status(&self) -> ResolutionStatus {
        self.selection.resolution_status(self.resolution_table())
    }

    /// Add an uploaded image at its pixel size, centered on the middle of the view.
    pub fn add_image(
        &mut self,
        name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> CanvasResult<LayerId> {
        let bytes = bytes.into();
        let (w, h) = probe_dimensions(&bytes)?;
        let center = self.viewport.world_center();
        let (w, h) = (f64::from(w), f64::from(h));
        let bounds = Region::positive(center.x - w / 2.0, center.y - h / 2.0, w, h)?;

        let layer = Layer::new(
            self.layers.next_id(),
            name,
            LayerContent::Image {
                source: AssetSource::Bytes(bytes),
            },
            bounds,
        )?
        .with_render_fit(self.cfg.generation.render_fit.upload);
        self.layers.push(layer)
    }

    pub fn paste(
        &mut self,
        bytes: impl Into<Arc<[u8]>>,
        target: PasteTarget,
    ) -> CanvasResult<Pasted> {
        match target {
            PasteTarget::Canvas => self.add_image(PASTED_LAYER_NAME, bytes).map(Pasted::Layer),
            PasteTarget::References => self.add_reference(bytes).map(Pasted::Reference),
        }
    }

    /// Remove a layer. Clears redo and, if it was the active layer, the layer selection.
    pub fn delete_layer(&mut self, id: LayerId) -> bool {
        self.layers.remove(id).is_some()
    }

    pub fn undo(&mut self) -> Option<LayerId> {
        self.layers.undo()
    }

    pub fn redo(&mut self) -> Option<LayerId> {
        self.layers.redo()
    }

    pub fn add_reference(&mut self, bytes: impl Into<Arc<[u8]>>) -> CanvasResult<usize> {
        self.references.add(bytes)
    }

    pub fn remove_reference(&mut self, index: usize) -> bool {
        self.references.remove(index).is_some()
    }

    pub fn clear_references(&mut self) {
        self.references.clear();
    }

    /// Copy a still layer's encoded image into the reference set.
    ///
    /// `Ok(None)` for unknown ids and video layers.
    pub fn use_layer_as_reference(&mut self, id: LayerId) -> CanvasResult<Option<usize>> {
        let Some(layer) = self.layers.get(id) else {
            return Ok(None);
        };
        if layer.kind() == LayerKind::Video {
            return Ok(None);
        }
        let source = layer.content().source().clone();
        let bytes = self.assets.load_bytes(&source)?;
        self.references.add(bytes).map(Some)
    }

    /// The layer's encoded asset under its download name. `Ok(None)` for unknown ids.
    pub fn layer_download(&mut self, id: LayerId) -> CanvasResult<Option<LayerDownload>> {
        let Some(layer) = self.layers.get(id) else {
            return Ok(None);
        };
        let file_name = layer.download_name();
        let source = layer.content().source().clone();
        let bytes = self.assets.load_bytes(&source)?;
        tracing::debug!(layer = %id, %file_name, "layer download");
        Ok(Some(LayerDownload { file_name, bytes }))
    }

    /// Frame every visible layer, or reset the view when there is none.
    pub fn fit_to_content(&mut self) {
        self.viewport.fit_to_content(self.layers.visible_bounds());
    }

    pub fn snapshot(&mut self, region: &Region) -> CanvasResult<Option<EncodedImage>> {
        pipeline::snapshot(
            region,
            self.layers.layers(),
            &mut self.assets,
            CompositeOptions::default(),
        )
    }

    pub fn export(&mut self, opts: CompositeOptions) -> CanvasResult<ExportImage> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        pipeline::export_composite(self.layers.layers(), &mut self.assets, opts, now)
    }

    /// Capture everything a batch needs and mark the session as generating.
    ///
    /// `Ok(None)` when a batch is already running, there is no selection, the prompt is blank,
    /// or a video model has no start frame.
    pub fn begin_generation(
        &mut self,
        request: GenerationRequest,
    ) -> CanvasResult<Option<GenerationJob>> {
        if self.generating.is_some() {
            tracing::debug!("generation already in flight");
            return Ok(None);
        }
        let Some(region) = self.selection.current() else {
            return Ok(None);
        };
        if request.prompt.trim().is_empty() {
            return Ok(None);
        }

        let snapshot = self.snapshot(&region)?;
        let has_snapshot = snapshot.is_some();
        let has_references = !self.references.is_empty();

        let mut images: Vec<Arc<[u8]>> = Vec::with_capacity(self.references.len() + 1);
        if let Some(snap) = snapshot {
            images.push(snap.png);
        }
        images.extend(self.references.images().iter().cloned());

        let prompt = augment(&request.prompt, has_snapshot, has_references);
        let render_fit =
            self.cfg
                .generation
                .render_fit
                .decide(self.model, has_snapshot, has_references);

        let job_request = if self.model.is_video() {
            let Some(start_image) = images.first().cloned() else {
                tracing::warn!(model = self.model.id(), "video generation needs a start frame");
                return Ok(None);
            };
            JobRequest::Video(VideoRequest {
                model: self.model,
                prompt,
                start_image,
                end_image: None,
                aspect_ratio: AspectRatioHint::closest_video(region.ratio()),
            })
        } else {
            JobRequest::Image(ImageRequest {
                model: self.model,
                prompt,
                aspect_ratio: AspectRatioHint::closest(region.ratio()),
                size: SizeHint::for_selection(
                    self.model,
                    region.width,
                    region.height,
                    self.cfg.generation.pro_size_upgrade_px,
                ),
                images,
                force_ratio: has_references && !has_snapshot,
            })
        };

        self.next_ticket += 1;
        let ticket = GenerationTicket(self.next_ticket);
        self.generating = Some(ticket);
        tracing::debug!(
            ticket = ticket.0,
            model = self.model.id(),
            has_snapshot,
            has_references,
            ?render_fit,
            "generation started"
        );

        Ok(Some(GenerationJob::new(
            ticket,
            region,
            job_request,
            render_fit,
            request.feather,
            request.variation_count,
        )))
    }

    /// Magic fill: the fixed outpainting prompt with the configured feather.
    pub fn begin_magic_fill(&mut self, variations: usize) -> CanvasResult<Option<GenerationJob>> {
        let request = GenerationRequest::new(MAGIC_FILL_PROMPT)
            .with_variations(variations)
            .with_feather(self.cfg.generation.magic_fill_feather);
        self.begin_generation(request)
    }

    /// Place a batch's results on the stack, then clear the selection and the generating flag.
    ///
    /// Returns `None` for an outcome whose ticket is no longer current.
    pub fn finish_generation(&mut self, outcome: GenerationOutcome) -> Option<GenerationReport> {
        if self.generating != Some(outcome.ticket) {
            tracing::debug!(ticket = outcome.ticket.0, "dropping stale generation result");
            return None;
        }

        let mut created = Vec::with_capacity(outcome.produced.len());
        for generated in outcome.produced {
            let layer = Layer::new(
                self.layers.next_id(),
                generated.name,
                generated.content,
                outcome.region,
            )
            .map(|l| {
                l.with_render_fit(generated.render_fit)
                    .with_feather(generated.feather)
            })
            .and_then(|l| self.layers.push(l));
            match layer {
                Ok(id) => created.push(id),
                Err(e) => tracing::warn!(error = %e, "generated layer rejected"),
            }
        }

        if let Some(e) = &outcome.failure {
            tracing::warn!(error = %e, created = created.len(), "generation batch failed");
        }
        self.selection.clear();
        self.generating = None;
        Some(GenerationReport {
            created,
            failure: outcome.failure,
        })
    }

    /// Stop waiting for the running batch; its result will be dropped when it arrives.
    pub fn abandon_generation(&mut self) -> Option<GenerationTicket> {
        self.generating.take()
    }

    /// Run a whole batch against `service`: begin, await every variation, apply.
    pub async fn generate<S: GenerationService>(
        &mut self,
        service: &S,
        request: GenerationRequest,
    ) -> CanvasResult<Option<GenerationReport>> {
        let Some(job) = self.begin_generation(request)? else {
            return Ok(None);
        };
        let outcome = job.run(service).await;
        Ok(self.finish_generation(outcome))
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
