#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod color;
pub mod components;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod perceptual;
pub mod report;
pub mod types;

// Demo configuration
pub mod config;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detectors + results.
pub use crate::detector::{
    detect_edit_regions, DetectionStrategy, EditDetectionOptions, EditDetector,
};
pub use crate::perceptual::{
    detect_edit_regions_perceptual, PatchScorer, PerceptualDetectionOptions, PerceptualDetector,
};
pub use crate::types::{
    DetectionResult, EditDetectionResult, EditRegion, PerceptualDetectionResult, PolygonRegion,
};

pub use crate::error::{DetectionError, Result};
pub use crate::report::format_edit_regions_for_prompt;

// High-level diagnostics returned by the detectors.
pub use crate::diagnostics::{DetectionReport, PipelineTrace};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use edit_regions::prelude::*;
///
/// # fn main() -> edit_regions::Result<()> {
/// let (w, h) = (320usize, 240usize);
/// let original = vec![128u8; w * h * 3];
/// let mut edited = original.clone();
/// edited[..30].fill(255);
///
/// let detector = EditDetector::new(EditDetectionOptions::pixel());
/// let result = detector.detect(
///     ColorImage::new(w, h, 3, &original)?,
///     ColorImage::new(w, h, 3, &edited)?,
/// )?;
/// println!("{}", format_edit_regions_for_prompt(&result));
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ColorImage;
    pub use crate::{
        format_edit_regions_for_prompt, DetectionResult, EditDetectionOptions, EditDetector,
        EditRegion, PerceptualDetectionOptions, PerceptualDetector, PolygonRegion,
    };
}
