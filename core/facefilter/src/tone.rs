use image::RgbaImage;

use crate::face_detector::FaceRegion;
use crate::region::{self, PixelSpan};

/// Mid-gray target every channel is pulled toward when smoothing.
const SMOOTHING_TARGET: f32 = 128.0;

/// Fraction of the distance to mid-gray covered at full intensity.
const SMOOTHING_STRENGTH: f32 = 0.1;

/// Channel gain over the eye band at full intensity.
const EYE_GAIN: f32 = 0.2;

/// Channel gain over the mouth band at full intensity.
const TEETH_GAIN: f32 = 0.3;

/// Pull every RGB channel toward mid-gray, flattening color variation.
///
/// Applies to the whole frame: the smoothing approximates a cheap
/// low-pass and is not gated on detected faces.
pub(crate) fn skin_smoothing(buffer: &mut RgbaImage, intensity: f32) {
    let factor = intensity / 100.0;
    for pixel in buffer.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            let c = *channel as f32;
            let smoothed = c + (SMOOTHING_TARGET - c) * factor * SMOOTHING_STRENGTH;
            *channel = smoothed.clamp(0.0, 255.0).round() as u8;
        }
    }
}

/// Brighten the eye band of each detected face.
pub(crate) fn eye_enhancement(buffer: &mut RgbaImage, faces: &[FaceRegion], intensity: f32) {
    let gain = 1.0 + intensity / 100.0 * EYE_GAIN;
    let (buf_w, buf_h) = buffer.dimensions();
    for face in faces {
        if let Some(span) = region::eye_band(face, buf_w, buf_h) {
            brighten_span(buffer, span, gain);
        }
    }
}

/// Brighten the mouth band of each detected face.
pub(crate) fn teeth_whitening(buffer: &mut RgbaImage, faces: &[FaceRegion], intensity: f32) {
    let gain = 1.0 + intensity / 100.0 * TEETH_GAIN;
    let (buf_w, buf_h) = buffer.dimensions();
    for face in faces {
        if let Some(span) = region::mouth_band(face, buf_w, buf_h) {
            brighten_span(buffer, span, gain);
        }
    }
}

/// Multiply the RGB channels of every pixel in `span` by `gain`, capped
/// at white. Alpha is left alone.
fn brighten_span(buffer: &mut RgbaImage, span: PixelSpan, gain: f32) {
    for y in span.y0..span.y1 {
        for x in span.x0..span.x1 {
            let pixel = buffer.get_pixel_mut(x, y);
            for channel in &mut pixel.0[..3] {
                *channel = (*channel as f32 * gain).min(255.0).round() as u8;
            }
        }
    }
}
