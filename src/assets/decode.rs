use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context;

use crate::assets::{EncodedImage, PreparedImage};
use crate::foundation::error::{CanvasError, CanvasResult};

/// Decode any supported raster format into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> CanvasResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| CanvasError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Read just the pixel dimensions of an encoded image.
pub fn probe_dimensions(bytes: &[u8]) -> CanvasResult<(u32, u32)> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("guess image format")?;
    reader
        .into_dimensions()
        .map_err(|e| CanvasError::decode(format!("read image dimensions: {e}")))
}

/// Encode premultiplied RGBA8 as a straight-alpha PNG.
pub fn encode_png(width: u32, height: u32, rgba8_premul: &[u8]) -> CanvasResult<EncodedImage> {
    let mut straight = rgba8_premul.to_vec();
    unpremultiply_rgba8_in_place(&mut straight);
    let img = image::RgbaImage::from_raw(width, height, straight).ok_or_else(|| {
        CanvasError::validation(format!(
            "pixel buffer does not match {width}x{height} rgba8"
        ))
    })?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(EncodedImage {
        width,
        height,
        png: buf.into(),
    })
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
