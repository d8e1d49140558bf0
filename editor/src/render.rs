//! Software compositor: flatten a mat document to an RGBA canvas.
//!
//! The canvas is always the fixed 3840x2160 surface. Each filled slot is
//! drawn in index order: the source image is resized by its placement
//! scales, the composed filter pipeline runs over the resized tile, and the
//! tile is blitted at the slot origin plus its offsets, clipped to the slot
//! rect. Filter evaluation is row-parallel; the per-op pixel math matches
//! the interactive preview so saved output equals what was on screen.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashMap;

use image::{ImageFormat, Rgba, RgbaImage, imageops};
use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::constraint::Placement;
use crate::doc::{MatDoc, SourceId};
use crate::filters::{self, FilterKind, FilterParams, FilterPlan, has_active_filters};
use crate::geometry::SlotRect;

/// Compositing failures.
#[derive(Debug, Error)]
pub enum RenderError {
    /// An assignment references a source the caller did not supply.
    #[error("assignment references missing source image {0}")]
    MissingSource(SourceId),
    /// Decode or encode failure in the underlying codec.
    #[error("image codec: {0}")]
    Codec(#[from] image::ImageError),
}

/// Flatten a mat document onto a canvas filled with `background`.
///
/// `sources` maps source ids to decoded images; every assigned source must
/// be present. An empty mat renders as pure background.
///
/// # Errors
///
/// Returns [`RenderError::MissingSource`] when an assignment's source is
/// absent from `sources`.
pub fn compose(
    doc: &MatDoc,
    sources: &HashMap<SourceId, RgbaImage>,
    background: Rgba<u8>,
) -> Result<RgbaImage, RenderError> {
    let mut canvas = RgbaImage::from_pixel(CANVAS_WIDTH as u32, CANVAS_HEIGHT as u32, background);

    for (index, assignment) in doc.iter() {
        let Some(rect) = doc.slot_rect(index) else {
            continue;
        };
        let source = sources
            .get(&assignment.source_id)
            .ok_or(RenderError::MissingSource(assignment.source_id))?;

        let scaled = assignment.placement.scaled_size(assignment.natural_size());
        let scaled_w = scaled.width.round().max(0.0) as u32;
        let scaled_h = scaled.height.round().max(0.0) as u32;
        if scaled_w == 0 || scaled_h == 0 {
            continue;
        }

        // Bilinear; tiles are photo-sized, quality over speed is fine here.
        let mut tile = imageops::resize(source, scaled_w, scaled_h, imageops::FilterType::Triangle);

        if has_active_filters(&assignment.filters) {
            let plan = filters::compose(&assignment.filters);
            debug!(slot = index, ops = plan.ops.len(), "applying filter pipeline");
            apply_plan(&mut tile, &plan);
        }

        blit_clipped(&mut canvas, &tile, rect, assignment.placement);
    }

    Ok(canvas)
}

/// Encode a composed canvas as PNG bytes.
///
/// # Errors
///
/// Returns [`RenderError::Codec`] if encoding fails.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    image.write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Decode raw file bytes into an RGBA image.
///
/// # Errors
///
/// Returns [`RenderError::Codec`] for unreadable or unsupported data.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, RenderError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Run a composed filter pipeline over an image, row-parallel.
///
/// Ops execute in plan order per pixel; channel values stay in f32 between
/// ops and clamp to 0..255 once at the end. Alpha passes through untouched.
pub fn apply_plan(image: &mut RgbaImage, plan: &FilterPlan) {
    if plan.is_empty() {
        return;
    }
    let width = image.width() as usize;
    if width == 0 {
        return;
    }
    let stride = width * 4;
    let params = plan.params;
    let ops = plan.ops.as_slice();

    let raw: &mut [u8] = image;
    raw.par_chunks_mut(stride).for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            let mut r = f32::from(px[0]);
            let mut g = f32::from(px[1]);
            let mut b = f32::from(px[2]);
            for op in ops {
                (r, g, b) = apply_op(*op, &params, r, g, b);
            }
            px[0] = r.round().clamp(0.0, 255.0) as u8;
            px[1] = g.round().clamp(0.0, 255.0) as u8;
            px[2] = b.round().clamp(0.0, 255.0) as u8;
        }
    });
}

/// Rec.709 luma of a 0..255 RGB triple.
fn luma(r: f32, g: f32, b: f32) -> f32 {
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

fn apply_op(kind: FilterKind, params: &FilterParams, r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    match kind {
        FilterKind::Brightness => {
            let shift = params.brightness as f32 * 255.0;
            (r + shift, g + shift, b + shift)
        }
        FilterKind::Contrast => {
            let c = params.contrast as f32;
            let factor = (259.0 * (c + 255.0)) / (255.0 * (259.0 - c));
            (
                factor * (r - 128.0) + 128.0,
                factor * (g - 128.0) + 128.0,
                factor * (b - 128.0) + 128.0,
            )
        }
        FilterKind::Hsl => {
            let (mut r, mut g, mut b) = (r, g, b);
            if params.hue_degrees != 0.0 {
                (r, g, b) = rotate_hue(r, g, b, params.hue_degrees as f32);
            }
            if params.saturation != 0.0 {
                let l = luma(r, g, b);
                let sat = 1.0 + params.saturation as f32;
                r = l + (r - l) * sat;
                g = l + (g - l) * sat;
                b = l + (b - l) * sat;
            }
            (r, g, b)
        }
        FilterKind::WhiteBalance => {
            let temp = params.temperature as f32;
            let tint = params.tint as f32;
            (
                r * (1.0 + temp * 0.5 + tint * 0.2),
                g * (1.0 - tint * 0.2),
                b * (1.0 - temp * 0.5 + tint * 0.2),
            )
        }
        FilterKind::BlackWhite => {
            let l = luma(r, g, b);
            (l, l, l)
        }
        FilterKind::Sepia => (
            0.393 * r + 0.769 * g + 0.189 * b,
            0.349 * r + 0.686 * g + 0.168 * b,
            0.272 * r + 0.534 * g + 0.131 * b,
        ),
        FilterKind::Monochrome => {
            let l = luma(r, g, b);
            let color = params.monochrome_color;
            (
                l * f32::from(color.r) / 255.0,
                l * f32::from(color.g) / 255.0,
                l * f32::from(color.b) / 255.0,
            )
        }
    }
}

/// Rotate hue via the YIQ rotation matrix; channels stay in 0..255.
///
/// Rotating chroma around the NTSC luma axis keeps perceived lightness
/// stable and costs one 3x3 multiply per pixel; a zero angle is the
/// identity matrix exactly.
fn rotate_hue(r: f32, g: f32, b: f32, degrees: f32) -> (f32, f32, f32) {
    let rad = degrees.to_radians();
    let u = rad.cos();
    let w = rad.sin();

    (
        (0.299 + 0.701 * u + 0.168 * w) * r
            + (0.587 - 0.587 * u + 0.330 * w) * g
            + (0.114 - 0.114 * u - 0.497 * w) * b,
        (0.299 - 0.299 * u - 0.328 * w) * r
            + (0.587 + 0.413 * u + 0.035 * w) * g
            + (0.114 - 0.114 * u + 0.292 * w) * b,
        (0.299 - 0.300 * u + 1.250 * w) * r
            + (0.587 - 0.588 * u - 1.050 * w) * g
            + (0.114 + 0.886 * u - 0.203 * w) * b,
    )
}

/// Blit a tile at the slot origin plus placement offsets, clipped to both
/// the slot rect and the canvas bounds.
fn blit_clipped(canvas: &mut RgbaImage, tile: &RgbaImage, rect: SlotRect, placement: Placement) {
    let dest_x = (rect.x + placement.offset_x).round() as i64;
    let dest_y = (rect.y + placement.offset_y).round() as i64;

    let left = (rect.x.round() as i64).max(dest_x).max(0);
    let top = (rect.y.round() as i64).max(dest_y).max(0);
    let right = ((rect.x + rect.width).round() as i64)
        .min(dest_x + i64::from(tile.width()))
        .min(i64::from(canvas.width()));
    let bottom = ((rect.y + rect.height).round() as i64)
        .min(dest_y + i64::from(tile.height()))
        .min(i64::from(canvas.height()));

    for cy in top..bottom {
        for cx in left..right {
            let src = *tile.get_pixel((cx - dest_x) as u32, (cy - dest_y) as u32);
            let dst = canvas.get_pixel_mut(cx as u32, cy as u32);
            *dst = blend_over(src, *dst);
        }
    }
}

/// Source-over blend of straight-alpha pixels.
fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    if src[3] == 255 {
        return src;
    }
    let sa = f32::from(src[3]) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let mut out = [0u8; 4];
    for c in 0..3 {
        let s = f32::from(src[c]);
        let d = f32::from(dst[c]);
        out[c] = (s * sa + d * (1.0 - sa)).round().clamp(0.0, 255.0) as u8;
    }
    out[3] = ((sa + da * (1.0 - sa)) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba(out)
}
