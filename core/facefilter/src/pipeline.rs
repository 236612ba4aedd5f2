use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use log::warn;

use crate::error::FilterError;
use crate::face_detector::{FaceDetector, FaceRegion};
use crate::{overlay, slim, tone};
use crate::{BeautifyFilter, FilterKind, OutputFormat, ProcessedFrame};

/// Decode input bytes into a `DynamicImage`.
pub(crate) fn decode_image(input: &[u8]) -> Result<DynamicImage, FilterError> {
    image::load_from_memory(input).map_err(|e| FilterError::DecodeError(e.to_string()))
}

/// Run the detector over a grayscale view of the frame.
///
/// Any backend failure degrades to "no faces detected" — the caller gets
/// an empty set, never an error.
pub(crate) fn detect_regions(
    image: &DynamicImage,
    detector: Option<&dyn FaceDetector>,
) -> Vec<FaceRegion> {
    let Some(detector) = detector else {
        return Vec::new();
    };
    let gray = image::imageops::grayscale(image);
    match detector.detect(gray.as_raw(), gray.width(), gray.height()) {
        Ok(faces) => faces,
        Err(e) => {
            warn!("face detection failed, continuing without detection: {e}");
            Vec::new()
        }
    }
}

/// Dispatch one filter over the frame.
///
/// Infallible by design: region arithmetic clamps or skips, and zero
/// faces leaves every region-scoped filter as a no-op.
pub(crate) fn apply_filter(
    buffer: &mut RgbaImage,
    filter: FilterKind,
    intensity: f32,
    faces: &[FaceRegion],
) {
    match filter {
        FilterKind::Beautify(beautify) => match beautify {
            BeautifyFilter::SmoothSkin => tone::skin_smoothing(buffer, intensity),
            BeautifyFilter::EnhanceEyes => tone::eye_enhancement(buffer, faces, intensity),
            BeautifyFilter::TeethWhitening => tone::teeth_whitening(buffer, faces, intensity),
            BeautifyFilter::FaceSlim => slim::face_slim(buffer, faces, intensity),
        },
        FilterKind::Animal(animal) => overlay::apply(buffer, animal, faces, intensity),
    }
}

/// Encode the frame to the requested format.
pub(crate) fn encode_image(
    buffer: &RgbaImage,
    format: &OutputFormat,
    quality: f32,
) -> Result<Vec<u8>, FilterError> {
    let mut out = Vec::new();

    match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut out)
                .write_image(
                    buffer.as_raw(),
                    buffer.width(),
                    buffer.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(|e| FilterError::EncodeError(e.to_string()))?;
        }
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel; composite onto white first
            let rgb = flatten_alpha(buffer);
            let quality_percent = (quality * 100.0).round() as u8;
            JpegEncoder::new_with_quality(&mut out, quality_percent)
                .write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )
                .map_err(|e| FilterError::EncodeError(e.to_string()))?;
        }
    }

    Ok(out)
}

/// Flatten the alpha channel by compositing onto a white background.
pub(crate) fn flatten_alpha(buffer: &RgbaImage) -> RgbImage {
    let (width, height) = buffer.dimensions();
    let mut rgb = RgbImage::new(width, height);

    for (x, y, pixel) in buffer.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let inv_alpha = 1.0 - alpha;
        let out_r = (r as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        let out_g = (g as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        let out_b = (b as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        rgb.put_pixel(x, y, image::Rgb([out_r, out_g, out_b]));
    }

    rgb
}

/// Full pipeline: decode → detect once → apply filter → encode.
pub(crate) fn process_pipeline(
    input: &[u8],
    filter: Option<FilterKind>,
    requested_id: Option<&str>,
    intensity: f32,
    format: &OutputFormat,
    quality: f32,
    detector: Option<&dyn FaceDetector>,
) -> Result<ProcessedFrame, FilterError> {
    let decoded = decode_image(input)?;

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(FilterError::ZeroDimensions);
    }

    // Detection runs exactly once; every per-filter step of this
    // invocation shares its result.
    let faces = detect_regions(&decoded, detector);

    let mut buffer = decoded.to_rgba8();
    match filter {
        Some(filter) => apply_filter(&mut buffer, filter, intensity, &faces),
        None => {
            // Fail-soft for legacy callers: an id no filter matches
            // passes the frame through untouched.
            if let Some(id) = requested_id {
                warn!("no filter matches id {id:?}, returning the image unmodified");
            }
        }
    }

    let data = encode_image(&buffer, format, quality)?;

    Ok(ProcessedFrame {
        data,
        format: format.clone(),
        width: buffer.width(),
        height: buffer.height(),
        original_size: input.len(),
        faces,
    })
}
