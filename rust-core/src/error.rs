//! Error types shared by every series and transform

use thiserror::Error;

/// Errors raised by series construction, view slicing and transforms
///
/// Every variant is reported synchronously by the offending call; no entity is
/// modified before the error is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("invalid sample window [{start}, {end}) for axis of length {len}")]
    Range { start: usize, end: usize, len: usize },

    #[error("invalid range {low}..{high}: bounds are inverted or select no samples")]
    FrequencyRange { low: f64, high: f64 },

    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error("FFT processing failed: {0}")]
    Transform(String),
}

pub type Result<T> = std::result::Result<T, SeriesError>;
