use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("failed to decode image: {0}")]
    DecodeError(String),

    #[error("unsupported image format: expected JPEG or PNG")]
    UnsupportedFormat,

    #[error("image payload is {0} bytes, over the 10 MiB limit")]
    PayloadTooLarge(usize),

    #[error("image dimensions are zero")]
    ZeroDimensions,

    #[error("failed to encode image: {0}")]
    EncodeError(String),

    #[error("intensity must be between 0 and 100, got {0}")]
    InvalidIntensity(f32),

    #[error("quality must be between 0.0 and 1.0, got {0}")]
    InvalidQuality(f32),
}
