use thiserror::Error;

/// Axis-aligned bounding box of a detected face, in source-image pixels.
///
/// Detectors may place boxes partially (or entirely) outside the image;
/// filters clamp or skip out-of-range geometry rather than fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRegion {
    /// X coordinate of the top-left corner (pixels, may be negative).
    pub x: i32,
    /// Y coordinate of the top-left corner (pixels, may be negative).
    pub y: i32,
    /// Width of the bounding box (pixels, > 0).
    pub width: u32,
    /// Height of the bounding box (pixels, > 0).
    pub height: u32,
}

/// Error produced by a [`FaceDetector`] backend.
///
/// Never escapes the pipeline: a failing detector degrades to an empty
/// region set and the requested filter runs against zero faces.
#[derive(Debug, Error)]
#[error("face detection failed: {0}")]
pub struct DetectionError(pub String);

/// Pluggable face detection backend.
///
/// Implement this trait to provide a custom face detector (ONNX, dlib, etc.)
/// and pass it to [`crate::FilterProcessor::face_detector`]. Detection runs
/// at most once per pipeline invocation and its result is shared by every
/// per-filter step of that invocation.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a row-major grayscale buffer of `width` × `height` bytes.
    fn detect(
        &self,
        gray: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<FaceRegion>, DetectionError>;
}
