use crate::assets::EncodedImage;
use crate::assets::store::AssetLoader;
use crate::foundation::core::{Point, Region};
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::layers::model::{Layer, RenderFit};
use crate::render::raster::{DrawStyle, Surface};

/// Which per-layer display attributes the compositor honors.
///
/// The default flattens layers as plain stretched rasters, which is what a generation backend
/// receives as context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositeOptions {
    /// Crop `cover` layers to their box aspect instead of stretching.
    pub honor_render_fit: bool,
    /// Fade layer edges by their feather width.
    pub apply_feather: bool,
}

impl CompositeOptions {
    /// Match what the on-screen canvas shows.
    pub fn display() -> Self {
        Self {
            honor_render_fit: true,
            apply_feather: true,
        }
    }

    fn style_for(&self, layer: &Layer) -> DrawStyle {
        DrawStyle {
            fit: if self.honor_render_fit {
                layer.render_fit()
            } else {
                RenderFit::Fill
            },
            feather: if self.apply_feather {
                layer.feather()
            } else {
                0
            },
        }
    }
}

/// A flattened export of every visible layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportImage {
    pub image: EncodedImage,
    /// World position of the image's top-left pixel.
    pub origin: Point,
    /// Suggested download name, `canvas-export-<unix millis>.png`.
    pub file_name: String,
}

/// Flatten the visible still layers intersecting `region` into a `region`-sized PNG.
///
/// `layers` is in stack order (index 0 on top). Layers whose raster cannot be loaded are skipped.
/// Returns `None` when the region is empty or no layer contributed.
#[tracing::instrument(skip(layers, assets), fields(layers = layers.len()))]
pub fn snapshot(
    region: &Region,
    layers: &[Layer],
    assets: &mut dyn AssetLoader,
    opts: CompositeOptions,
) -> CanvasResult<Option<EncodedImage>> {
    let w = region.width.round();
    let h = region.height.round();
    if !(w >= 1.0 && h >= 1.0) {
        return Ok(None);
    }
    let mut surface = Surface::new(w as u32, h as u32)?;

    let contributed = draw_layers(
        &mut surface,
        layers
            .iter()
            .rev()
            .filter(|l| l.visible() && l.bounds().intersects(region)),
        region.origin(),
        assets,
        opts,
    );

    if contributed == 0 {
        tracing::debug!("snapshot: nothing contributed");
        return Ok(None);
    }
    surface.encode_png().map(Some)
}

/// Flatten every visible layer into one PNG sized to their joint bounding box.
///
/// Video layers widen the box but are not drawn.
#[tracing::instrument(skip(layers, assets), fields(layers = layers.len()))]
pub fn export_composite(
    layers: &[Layer],
    assets: &mut dyn AssetLoader,
    opts: CompositeOptions,
    now_millis: u128,
) -> CanvasResult<ExportImage> {
    let boxes: Vec<Region> = layers
        .iter()
        .filter(|l| l.visible())
        .map(Layer::bounds)
        .collect();
    let bounds = Region::bounding(boxes.iter()).ok_or(CanvasError::NothingToExport)?;

    let w = (bounds.width.round() as u32).max(1);
    let h = (bounds.height.round() as u32).max(1);
    let mut surface = Surface::new(w, h)?;

    let drawn = draw_layers(
        &mut surface,
        layers.iter().rev().filter(|l| l.visible()),
        bounds.origin(),
        assets,
        opts,
    );
    tracing::debug!(width = w, height = h, drawn, "export composited");

    Ok(ExportImage {
        image: surface.encode_png()?,
        origin: bounds.origin(),
        file_name: format!("canvas-export-{now_millis}.png"),
    })
}

fn draw_layers<'a>(
    surface: &mut Surface,
    bottom_to_top: impl Iterator<Item = &'a Layer>,
    origin: Point,
    assets: &mut dyn AssetLoader,
    opts: CompositeOptions,
) -> usize {
    let mut contributed = 0;
    for layer in bottom_to_top {
        let Some(source) = layer.content().still_source() else {
            continue;
        };
        let image = match assets.load_image(source) {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!(layer = %layer.id(), error = %e, "skipping layer that failed to load");
                continue;
            }
        };
        let b = layer.bounds();
        let dest = Region::new(b.x - origin.x, b.y - origin.y, b.width, b.height);
        match surface.draw_image(&image, dest, opts.style_for(layer)) {
            Ok(true) => contributed += 1,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(layer = %layer.id(), error = %e, "skipping layer that failed to draw");
            }
        }
    }
    contributed
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
