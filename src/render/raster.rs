use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::assets::decode::encode_png;
use crate::assets::{EncodedImage, PreparedImage};
use crate::foundation::core::Region;
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::layers::model::RenderFit;
use crate::render::composite::over;

/// Largest edge, in pixels, of any raster the compositor will allocate.
pub const MAX_SURFACE_DIM: u32 = 32_768;

/// How a layer's raster is placed into its box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStyle {
    pub fit: RenderFit,
    /// Edge fade width in box pixels; `0` draws hard edges.
    pub feather: u8,
}

/// Premultiplied RGBA8 render target.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Fully transparent surface.
    pub fn new(width: u32, height: u32) -> CanvasResult<Self> {
        if width == 0 || height == 0 {
            return Err(CanvasError::validation("surface width/height must be > 0"));
        }
        if width > MAX_SURFACE_DIM || height > MAX_SURFACE_DIM {
            return Err(CanvasError::validation(format!(
                "surface {width}x{height} exceeds {MAX_SURFACE_DIM}px"
            )));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| CanvasError::validation("surface size overflow"))?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    pub fn encode_png(&self) -> CanvasResult<EncodedImage> {
        encode_png(self.width, self.height, &self.data)
    }

    /// Stretch `image` into `dest` (surface pixel space) and composite it source-over.
    ///
    /// Only the part of `dest` that lands on the surface is resampled. Returns `false` when
    /// `dest` does not touch the surface.
    pub fn draw_image(
        &mut self,
        image: &PreparedImage,
        dest: Region,
        style: DrawStyle,
    ) -> CanvasResult<bool> {
        if image.width == 0 || image.height == 0 {
            return Ok(false);
        }
        let dw = dest.width.round();
        let dh = dest.height.round();
        if !(dw >= 1.0 && dh >= 1.0) {
            return Ok(false);
        }
        if dw > f64::from(MAX_SURFACE_DIM) || dh > f64::from(MAX_SURFACE_DIM) {
            return Err(CanvasError::validation(format!(
                "layer box {dw}x{dh} exceeds {MAX_SURFACE_DIM}px"
            )));
        }
        let (dw, dh) = (dw as u32, dh as u32);
        let x0 = dest.x.round() as i64;
        let y0 = dest.y.round() as i64;

        let vx0 = x0.max(0);
        let vy0 = y0.max(0);
        let vx1 = (x0 + i64::from(dw)).min(i64::from(self.width));
        let vy1 = (y0 + i64::from(dh)).min(i64::from(self.height));
        if vx0 >= vx1 || vy0 >= vy1 {
            return Ok(false);
        }

        let window = BoxWindow {
            x0: (vx0 - x0) as u32,
            y0: (vy0 - y0) as u32,
            x1: (vx1 - x0) as u32,
            y1: (vy1 - y0) as u32,
        };
        let (scaled, ox, oy) = fitted_window(image, dw, dh, window, style.fit)?;

        for y in vy0..vy1 {
            let ly = (y - y0) as u32;
            for x in vx0..vx1 {
                let lx = (x - x0) as u32;
                let coverage = feather_coverage(lx, ly, dw, dh, style.feather);
                if coverage <= 0.0 {
                    continue;
                }
                let Some(src) = lx
                    .checked_sub(ox)
                    .zip(ly.checked_sub(oy))
                    .and_then(|(sx, sy)| scaled.get_pixel_checked(sx, sy))
                else {
                    continue;
                };
                let src = src.0;
                let i = (y as usize * self.width as usize + x as usize) * 4;
                let dst = [
                    self.data[i],
                    self.data[i + 1],
                    self.data[i + 2],
                    self.data[i + 3],
                ];
                self.data[i..i + 4].copy_from_slice(&over(dst, src, coverage));
            }
        }
        Ok(true)
    }
}

/// Centered crop of a `src_w`x`src_h` raster matching the aspect of a `box_w`x`box_h` box.
///
/// Returns `(x, y, width, height)` in source pixels.
pub fn cover_crop(src_w: u32, src_h: u32, box_w: f64, box_h: f64) -> (u32, u32, u32, u32) {
    if src_w == 0 || src_h == 0 || box_w <= 0.0 || box_h <= 0.0 {
        return (0, 0, src_w, src_h);
    }
    let src_ratio = f64::from(src_w) / f64::from(src_h);
    let box_ratio = box_w / box_h;
    if src_ratio > box_ratio {
        let cw = ((f64::from(src_h) * box_ratio).round() as u32).clamp(1, src_w);
        ((src_w - cw) / 2, 0, cw, src_h)
    } else {
        let ch = ((f64::from(src_w) / box_ratio).round() as u32).clamp(1, src_h);
        (0, (src_h - ch) / 2, src_w, ch)
    }
}

/// Opacity of box pixel `(x, y)` under a linear edge fade `feather` pixels wide.
pub fn feather_coverage(x: u32, y: u32, width: u32, height: u32, feather: u8) -> f32 {
    if feather == 0 {
        return 1.0;
    }
    let f = f32::from(feather);
    let ramp = |i: u32, n: u32| {
        let c = i as f32 + 0.5;
        (c.min(n as f32 - c) / f).clamp(0.0, 1.0)
    };
    ramp(x, width) * ramp(y, height)
}

/// Visible part of a layer box, in box pixels, end-exclusive.
#[derive(Clone, Copy, Debug)]
struct BoxWindow {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

/// Resample the source pixels that land in `window` of a `dw`x`dh` box.
///
/// Returns the raster and the box pixel its top-left corner sits on. The source span is
/// widened by one pixel on each side so the filter sees the same neighbours as a full resize.
fn fitted_window(
    image: &PreparedImage,
    dw: u32,
    dh: u32,
    window: BoxWindow,
    fit: RenderFit,
) -> CanvasResult<(RgbaImage, u32, u32)> {
    let (cx, cy, cw, ch) = match fit {
        RenderFit::Fill => (0, 0, image.width, image.height),
        RenderFit::Cover => cover_crop(image.width, image.height, f64::from(dw), f64::from(dh)),
    };

    let (sx0, sx1, tx0, tw) = window_span(window.x0, window.x1, dw, cw);
    let (sy0, sy1, ty0, th) = window_span(window.y0, window.y1, dh, ch);
    let part = crop_rows(image, cx + sx0, cy + sy0, sx1 - sx0, sy1 - sy0)?;

    if part.dimensions() == (tw, th) {
        return Ok((part, tx0, ty0));
    }
    Ok((imageops::resize(&part, tw, th, FilterType::Triangle), tx0, ty0))
}

/// Copy the `w`x`h` block at `(x, y)` out of a prepared image.
fn crop_rows(image: &PreparedImage, x: u32, y: u32, w: u32, h: u32) -> CanvasResult<RgbaImage> {
    let stride = image.width as usize * 4;
    let row_len = w as usize * 4;
    let mut data = Vec::with_capacity(row_len * h as usize);
    for row in y..y + h {
        let start = row as usize * stride + x as usize * 4;
        let line = image
            .rgba8_premul
            .get(start..start + row_len)
            .filter(|_| x + w <= image.width)
            .ok_or_else(|| {
                CanvasError::decode(format!(
                    "prepared image buffer does not match {}x{}",
                    image.width, image.height
                ))
            })?;
        data.extend_from_slice(line);
    }
    RgbaImage::from_raw(w, h, data)
        .ok_or_else(|| CanvasError::decode("cropped raster size mismatch"))
}

/// Map box pixels `b0..b1` of a `box_len` box onto a `src_len` source span.
///
/// Returns `(s0, s1, t0, t_len)`: the source range and the box range it resamples to, with
/// `t0 <= b0` and `t0 + t_len >= b1`.
fn window_span(b0: u32, b1: u32, box_len: u32, src_len: u32) -> (u32, u32, u32, u32) {
    let scale = f64::from(src_len) / f64::from(box_len);
    let s0 = ((f64::from(b0) * scale).floor() as u32)
        .saturating_sub(1)
        .min(src_len.saturating_sub(1));
    let s1 = ((f64::from(b1) * scale).ceil() as u32 + 1).clamp(s0 + 1, src_len);
    let t0 = if s0 == 0 {
        0
    } else {
        ((f64::from(s0) / scale).round() as u32).min(b0)
    };
    let t1 = if s1 == src_len {
        box_len
    } else {
        ((f64::from(s1) / scale).round() as u32).clamp(b1, box_len)
    };
    (s0, s1, t0, (t1 - t0).max(1))
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
