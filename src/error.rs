//! Error types for the edit-region detection engine.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DetectionError>;

/// Failures surfaced by the detectors and the image helpers.
///
/// Only malformed input and scorer backend failures can occur during
/// detection; degenerate geometry and undersized images resolve to empty or
/// defaulted results instead.
#[derive(Error, Debug)]
pub enum DetectionError {
    /// The array shape is not `[height, width, 3|4]`.
    #[error("Expected RGB image with shape (H, W, 3), got {shape:?}")]
    InvalidShape { shape: Vec<usize> },

    /// The pixel buffer does not match the declared dimensions.
    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    /// The perceptual scoring backend failed to load or to score a patch.
    #[error("Perceptual scorer failed: {message}")]
    Scorer { message: String },

    /// Image could not be read from disk.
    #[error("Failed to read image {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Image bytes could not be decoded or encoded.
    #[error("Image codec error: {message}")]
    Codec {
        message: String,
        #[source]
        source: Option<image::ImageError>,
    },
}

impl DetectionError {
    pub(crate) fn invalid_shape(shape: &[usize]) -> Self {
        Self::InvalidShape {
            shape: shape.to_vec(),
        }
    }

    /// Wrap a backend failure reported by a [`PatchScorer`](crate::perceptual::PatchScorer).
    pub fn scorer(message: impl Into<String>) -> Self {
        Self::Scorer {
            message: message.into(),
        }
    }

    pub(crate) fn codec(message: impl Into<String>, source: image::ImageError) -> Self {
        Self::Codec {
            message: message.into(),
            source: Some(source),
        }
    }

    /// True for caller mistakes (bad shapes or buffers) as opposed to
    /// environment or backend failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DetectionError::InvalidShape { .. } | DetectionError::BufferSize { .. }
        )
    }
}
