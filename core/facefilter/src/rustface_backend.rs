use std::path::Path;

use once_cell::sync::OnceCell;

use crate::face_detector::{DetectionError, FaceDetector, FaceRegion};

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// Loads a SeetaFace model file on construction. For the common case of
/// many pipeline invocations sharing one detector, use
/// [`RustfaceDetector::shared`], which initializes exactly once no
/// matter how many threads race to it.
pub struct RustfaceDetector {
    model: rustface::Model,
}

static SHARED: OnceCell<RustfaceDetector> = OnceCell::new();

impl RustfaceDetector {
    /// Load a SeetaFace model from disk.
    pub fn from_file(path: &Path) -> Result<Self, DetectionError> {
        let data = std::fs::read(path).map_err(|e| {
            DetectionError(format!("failed to read model {}: {e}", path.display()))
        })?;
        let model = rustface::read_model(std::io::Cursor::new(data))
            .map_err(|e| DetectionError(format!("failed to parse model: {e:?}")))?;
        Ok(Self { model })
    }

    /// Process-wide shared instance, loaded on first use.
    ///
    /// Concurrent callers block on the same initialization and observe
    /// the same result; after the first success the `path` argument of
    /// later calls is ignored.
    pub fn shared(path: &Path) -> Result<&'static RustfaceDetector, DetectionError> {
        SHARED.get_or_try_init(|| Self::from_file(path))
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(
        &self,
        gray: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<FaceRegion>, DetectionError> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(20);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceRegion {
                    x: bbox.x(),
                    y: bbox.y(),
                    width: bbox.width(),
                    height: bbox.height(),
                }
            })
            .collect())
    }
}
