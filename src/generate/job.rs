use crate::foundation::core::Region;
use crate::foundation::error::CanvasError;
use crate::generate::prompt::{generation_layer_name, video_layer_name};
use crate::generate::service::{GenerationService, ImageRequest, VideoRequest};
use crate::layers::model::{LayerContent, RenderFit};
use crate::resolution::ModelKind;

/// Identifies one generation batch; results carrying a stale ticket are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GenerationTicket(pub(crate) u64);

impl GenerationTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// The backend call a job repeats per variation.
#[derive(Clone, Debug, PartialEq)]
pub enum JobRequest {
    Image(ImageRequest),
    Video(VideoRequest),
}

impl JobRequest {
    pub fn model(&self) -> ModelKind {
        match self {
            JobRequest::Image(r) => r.model,
            JobRequest::Video(r) => r.model,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            JobRequest::Image(r) => &r.prompt,
            JobRequest::Video(r) => &r.prompt,
        }
    }
}

/// A layer produced by a job, not yet placed on the stack.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedLayer {
    pub name: String,
    pub content: LayerContent,
    pub render_fit: RenderFit,
    pub feather: u8,
}

/// Everything a finished (or aborted) batch hands back to the session.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub ticket: GenerationTicket,
    /// Box every produced layer is placed at.
    pub region: Region,
    /// Successful variations, in request order.
    pub produced: Vec<GeneratedLayer>,
    /// The error that stopped the batch early.
    pub failure: Option<CanvasError>,
}

/// A self-contained generation batch.
///
/// The job owns copies of everything it needs, so the canvas stays free to change while it runs.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationJob {
    ticket: GenerationTicket,
    region: Region,
    request: JobRequest,
    render_fit: RenderFit,
    feather: u8,
    variations: usize,
}

impl GenerationJob {
    pub(crate) fn new(
        ticket: GenerationTicket,
        region: Region,
        request: JobRequest,
        render_fit: RenderFit,
        feather: u8,
        variations: usize,
    ) -> Self {
        let variations = match request {
            JobRequest::Video(_) => 1,
            JobRequest::Image(_) => variations.max(1),
        };
        Self {
            ticket,
            region,
            request,
            render_fit,
            feather,
            variations,
        }
    }

    pub fn ticket(&self) -> GenerationTicket {
        self.ticket
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn request(&self) -> &JobRequest {
        &self.request
    }

    pub fn render_fit(&self) -> RenderFit {
        self.render_fit
    }

    pub fn feather(&self) -> u8 {
        self.feather
    }

    /// Number of sequential backend calls.
    pub fn variations(&self) -> usize {
        self.variations
    }

    /// Issue the variations one after another, stopping at the first error.
    #[tracing::instrument(
        skip(self, service),
        fields(ticket = self.ticket.0, model = self.request.model().id(), variations = self.variations)
    )]
    pub async fn run<S: GenerationService>(self, service: &S) -> GenerationOutcome {
        let mut produced = Vec::new();
        let mut failure = None;

        for i in 0..self.variations {
            let result = match &self.request {
                JobRequest::Image(req) => service.generate_image(req).await.map(|asset| {
                    asset.map(|a| GeneratedLayer {
                        name: generation_layer_name(i, &req.prompt),
                        content: LayerContent::Generation {
                            source: a.source,
                            prompt: req.prompt.clone(),
                        },
                        render_fit: self.render_fit,
                        feather: self.feather,
                    })
                }),
                JobRequest::Video(req) => service.generate_video(req).await.map(|asset| {
                    asset.map(|a| GeneratedLayer {
                        name: video_layer_name(&req.prompt),
                        content: LayerContent::Video {
                            source: a.source,
                            playing: true,
                        },
                        render_fit: self.render_fit,
                        feather: 0,
                    })
                }),
            };

            match result {
                Ok(Some(layer)) => produced.push(layer),
                Ok(None) => tracing::warn!(variation = i, "backend returned no asset"),
                Err(e) => {
                    tracing::warn!(variation = i, error = %e, "generation call failed, stopping batch");
                    failure = Some(match e {
                        CanvasError::Generation(_) => e,
                        other => CanvasError::generation(other.to_string()),
                    });
                    break;
                }
            }
        }

        tracing::debug!(produced = produced.len(), failed = failure.is_some(), "batch done");
        GenerationOutcome {
            ticket: self.ticket,
            region: self.region,
            produced,
            failure,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/job.rs"]
mod tests;
