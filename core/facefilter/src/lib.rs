//! Face-driven photo filters: tone remapping, localized brightening,
//! geometric warps, and animal overlays anchored to detected faces.
//!
//! # Example
//!
//! ```no_run
//! use facefilter::{BeautifyFilter, FilterKind, FilterProcessor};
//!
//! let raw_bytes = std::fs::read("portrait.jpg").unwrap();
//! let frame = FilterProcessor::new(raw_bytes)
//!     .unwrap()
//!     .filter(FilterKind::Beautify(BeautifyFilter::SmoothSkin))
//!     .intensity(70.0)
//!     .process()
//!     .unwrap();
//! std::fs::write("smoothed.png", &frame.data).unwrap();
//! ```
#![warn(missing_docs)]

mod error;
/// Face detection traits and data types.
pub mod face_detector;
mod overlay;
mod pipeline;
mod region;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;
mod slim;
pub mod storage;
mod tone;

/// Error type returned by facefilter operations.
pub use error::FilterError;
/// Face detection trait, bounding-box type, and detection error.
pub use face_detector::{DetectionError, FaceDetector, FaceRegion};
#[cfg(feature = "rustface")]
/// Built-in detector that loads a SeetaFace model from disk.
pub use rustface_backend::RustfaceDetector;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::ImageFormat;

/// Beautify filters: per-pixel tone transforms and the slimming warp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeautifyFilter {
    /// Pull every RGB channel toward mid-gray across the whole frame.
    SmoothSkin,
    /// Brighten the eye band of each detected face.
    EnhanceEyes,
    /// Brighten the mouth band of each detected face.
    TeethWhitening,
    /// Compress each face horizontally about its center.
    FaceSlim,
}

/// Animal overlays: vector shapes drawn over each detected face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimalOverlay {
    /// Pink ears above the face.
    BunnyEars,
    /// Whiskers and a triangular nose.
    CatFeatures,
    /// A snout with nostrils at the nose anchor.
    DogNose,
    /// Round ears at the top corners of the face.
    BearFace,
}

/// A filter the pipeline can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Tone and geometry adjustments.
    Beautify(BeautifyFilter),
    /// Alpha-composited shape overlays.
    Animal(AnimalOverlay),
}

/// Coarse classification of a [`FilterKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCategory {
    /// Per-pixel tone transforms and geometric warps.
    Beautify,
    /// Alpha-composited shape overlays.
    AnimalOverlay,
}

impl FilterKind {
    /// Every supported filter.
    pub const ALL: [FilterKind; 8] = [
        FilterKind::Beautify(BeautifyFilter::SmoothSkin),
        FilterKind::Beautify(BeautifyFilter::EnhanceEyes),
        FilterKind::Beautify(BeautifyFilter::TeethWhitening),
        FilterKind::Beautify(BeautifyFilter::FaceSlim),
        FilterKind::Animal(AnimalOverlay::BunnyEars),
        FilterKind::Animal(AnimalOverlay::CatFeatures),
        FilterKind::Animal(AnimalOverlay::DogNose),
        FilterKind::Animal(AnimalOverlay::BearFace),
    ];

    /// Which dispatch category this filter belongs to.
    pub fn category(self) -> FilterCategory {
        match self {
            FilterKind::Beautify(_) => FilterCategory::Beautify,
            FilterKind::Animal(_) => FilterCategory::AnimalOverlay,
        }
    }

    /// Canonical request id for this filter.
    pub fn as_id(self) -> &'static str {
        match self {
            FilterKind::Beautify(BeautifyFilter::SmoothSkin) => "smooth-skin",
            FilterKind::Beautify(BeautifyFilter::EnhanceEyes) => "enhance-eyes",
            FilterKind::Beautify(BeautifyFilter::TeethWhitening) => "teeth-whitening",
            FilterKind::Beautify(BeautifyFilter::FaceSlim) => "face-slim",
            FilterKind::Animal(AnimalOverlay::BunnyEars) => "bunny-ears",
            FilterKind::Animal(AnimalOverlay::CatFeatures) => "cat-features",
            FilterKind::Animal(AnimalOverlay::DogNose) => "dog-nose",
            FilterKind::Animal(AnimalOverlay::BearFace) => "bear-face",
        }
    }

    /// Resolve a request-boundary filter id, e.g. `"smooth-skin"`.
    ///
    /// Returns `None` for ids no filter matches. Callers are expected to
    /// treat that as "pass the image through", not as an error — see
    /// [`FilterProcessor::filter_id`].
    pub fn from_legacy_id(id: &str) -> Option<FilterKind> {
        FilterKind::ALL.iter().copied().find(|f| f.as_id() == id)
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_id())
    }
}

/// Output image format.
#[derive(Debug, Clone, Default)]
pub enum OutputFormat {
    /// Lossless PNG; the alpha channel survives re-encoding.
    #[default]
    Png,

    /// JPEG encoding; alpha is flattened onto a white background.
    Jpeg,
}

impl OutputFormat {
    fn mime(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Result of a single pipeline invocation.
#[derive(Debug, Clone)]
pub struct ProcessedFrame {
    /// The encoded output image bytes.
    pub data: Vec<u8>,

    /// The output format used.
    pub format: OutputFormat,

    /// Width of the output image in pixels.
    pub width: u32,

    /// Height of the output image in pixels.
    pub height: u32,

    /// Size of the original input in bytes.
    pub original_size: usize,

    /// Face regions the detector reported for this frame (possibly empty).
    pub faces: Vec<FaceRegion>,
}

impl ProcessedFrame {
    /// Encode the output as a base64 data URI, e.g. `data:image/png;base64,…`.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime(),
            BASE64.encode(&self.data)
        )
    }
}

/// Maximum accepted input payload: 10 MiB.
const MAX_INPUT_BYTES: usize = 10 * 1024 * 1024;

/// Filter strength used when the caller does not set one.
const DEFAULT_INTENSITY: f32 = 70.0;

/// JPEG quality used when the caller does not set one.
const DEFAULT_QUALITY: f32 = 0.9;

/// Builder for one filter invocation over one image.
///
/// Validates the input up front (format, payload size), then runs
/// decode → face detection → filter → encode on [`FilterProcessor::process`].
pub struct FilterProcessor {
    input: Vec<u8>,
    filter: Option<FilterKind>,
    requested_id: Option<String>,
    intensity: f32,
    format: OutputFormat,
    quality: f32,
    /// User-provided face detector. When `None`, detection is skipped and
    /// region-scoped filters see zero faces.
    detector: Option<Box<dyn FaceDetector>>,
}

impl FilterProcessor {
    /// Create a new processor from raw image bytes (JPEG or PNG).
    ///
    /// Oversized payloads and other formats are rejected here, before
    /// any pixel work happens.
    pub fn new(input: Vec<u8>) -> Result<Self, FilterError> {
        if input.len() > MAX_INPUT_BYTES {
            return Err(FilterError::PayloadTooLarge(input.len()));
        }
        match image::guess_format(&input) {
            Ok(ImageFormat::Png | ImageFormat::Jpeg) => {}
            Ok(_) => return Err(FilterError::UnsupportedFormat),
            Err(e) => return Err(FilterError::DecodeError(e.to_string())),
        }

        Ok(Self {
            input,
            filter: None,
            requested_id: None,
            intensity: DEFAULT_INTENSITY,
            format: OutputFormat::default(),
            quality: DEFAULT_QUALITY,
            detector: None,
        })
    }

    /// Create a processor from a base64 data URI (`data:image/png;base64,…`).
    pub fn from_data_uri(uri: &str) -> Result<Self, FilterError> {
        Self::new(decode_data_uri(uri)?)
    }

    /// Select the filter to apply.
    pub fn filter(mut self, filter: FilterKind) -> Self {
        self.filter = Some(filter);
        self.requested_id = None;
        self
    }

    /// Select a filter by request id, e.g. `"smooth-skin"` or `"bunny-ears"`.
    ///
    /// An id no filter matches is not an error: [`FilterProcessor::process`]
    /// returns the image unmodified and logs a warning, so callers sending
    /// ids this crate never heard of keep working.
    pub fn filter_id(mut self, id: &str) -> Self {
        self.filter = FilterKind::from_legacy_id(id);
        self.requested_id = Some(id.to_string());
        self
    }

    /// Set the filter strength, from 0 (no visible effect) to 100 (the
    /// filter's designed maximum). Default: 70.
    pub fn intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Set the output format (default: `OutputFormat::Png`).
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the JPEG quality from 0.0 (lowest) to 1.0 (highest).
    /// Default: 0.9. PNG output ignores it.
    pub fn quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }

    /// Provide a face detector implementation.
    ///
    /// Without one, region-scoped filters see zero faces and leave the
    /// frame alone; skin smoothing still applies globally.
    ///
    /// ```no_run
    /// use facefilter::{FaceDetector, FaceRegion, DetectionError, FilterProcessor};
    ///
    /// struct MyDetector;
    /// impl FaceDetector for MyDetector {
    ///     fn detect(
    ///         &self,
    ///         gray: &[u8],
    ///         width: u32,
    ///         height: u32,
    ///     ) -> Result<Vec<FaceRegion>, DetectionError> {
    ///         // Your detection logic here
    ///         Ok(vec![])
    ///     }
    /// }
    ///
    /// let bytes = std::fs::read("portrait.jpg").unwrap();
    /// let frame = FilterProcessor::new(bytes)
    ///     .unwrap()
    ///     .filter_id("bunny-ears")
    ///     .face_detector(Box::new(MyDetector))
    ///     .process()
    ///     .unwrap();
    /// ```
    pub fn face_detector(mut self, detector: Box<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Run the pipeline: decode, detect faces once, apply the filter,
    /// re-encode.
    pub fn process(self) -> Result<ProcessedFrame, FilterError> {
        if self.intensity < 0.0 || self.intensity > 100.0 {
            return Err(FilterError::InvalidIntensity(self.intensity));
        }
        if self.quality < 0.0 || self.quality > 1.0 {
            return Err(FilterError::InvalidQuality(self.quality));
        }

        pipeline::process_pipeline(
            &self.input,
            self.filter,
            self.requested_id.as_deref(),
            self.intensity,
            &self.format,
            self.quality,
            self.detector.as_deref(),
        )
    }
}

/// Strip and decode a `data:<mime>;base64,` prefix.
fn decode_data_uri(uri: &str) -> Result<Vec<u8>, FilterError> {
    let payload = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_mime, payload)| payload)
        .ok_or_else(|| FilterError::DecodeError("not a base64 data URI".into()))?;
    BASE64
        .decode(payload)
        .map_err(|e| FilterError::DecodeError(format!("invalid base64 payload: {e}")))
}
