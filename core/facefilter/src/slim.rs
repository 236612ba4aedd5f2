use image::{Rgba, RgbaImage};

use crate::face_detector::FaceRegion;
use crate::region::{self, PixelSpan};

/// Horizontal shrink at full intensity: the face compresses to 90% of
/// its width.
const SLIM_STRENGTH: f32 = 0.1;

/// Pinch each face toward its vertical center line.
///
/// The face rectangle is copied to a scratch buffer, resampled scaled
/// horizontally by `1 - (intensity/100)·0.1` about the rectangle's
/// center, and written back over the original pixels. Destination
/// columns the shrunken copy does not cover keep their original
/// content; everything outside the rectangle is untouched. Rows map
/// 1:1, so the warp preserves the face's full vertical extent.
pub(crate) fn face_slim(buffer: &mut RgbaImage, faces: &[FaceRegion], intensity: f32) {
    let factor = intensity / 100.0 * SLIM_STRENGTH;
    if factor <= 0.0 {
        return;
    }
    let scale = 1.0 - factor;
    let (buf_w, buf_h) = buffer.dimensions();
    for face in faces {
        if let Some(span) = region::face_span(face, buf_w, buf_h) {
            pinch_span(buffer, span, scale);
        }
    }
}

/// Resample one span, shrunken horizontally by `scale` about its center.
///
/// Sampling is linear along x (the warped axis) and exact along y.
fn pinch_span(buffer: &mut RgbaImage, span: PixelSpan, scale: f32) {
    let w = span.width() as usize;
    let h = span.height() as usize;

    // The warp must read pre-warp pixels, so snapshot the span first.
    let mut scratch = vec![[0u8; 4]; w * h];
    for (y, row) in scratch.chunks_exact_mut(w).enumerate() {
        for (x, pixel) in row.iter_mut().enumerate() {
            *pixel = buffer.get_pixel(span.x0 + x as u32, span.y0 + y as u32).0;
        }
    }

    let center = w as f32 / 2.0;
    for y in 0..h {
        let row = &scratch[y * w..(y + 1) * w];
        for x in 0..w {
            // Invert the scale-about-center map to find where this
            // destination pixel samples from.
            let src = center + (x as f32 + 0.5 - center) / scale - 0.5;
            if src < -0.5 || src > w as f32 - 0.5 {
                // Outside the shrunken copy: the original pixel shows through
                continue;
            }
            let value = sample_row(row, src);
            buffer.put_pixel(span.x0 + x as u32, span.y0 + y as u32, Rgba(value));
        }
    }
}

/// Linearly interpolate a row of RGBA samples at fractional position `src`.
fn sample_row(row: &[[u8; 4]], src: f32) -> [u8; 4] {
    let clamped = src.clamp(0.0, (row.len() - 1) as f32);
    let left = clamped.floor() as usize;
    let right = (left + 1).min(row.len() - 1);
    let t = clamped - left as f32;

    let mut out = [0u8; 4];
    for (c, value) in out.iter_mut().enumerate() {
        let a = row[left][c] as f32;
        let b = row[right][c] as f32;
        *value = (a + (b - a) * t).round() as u8;
    }
    out
}
