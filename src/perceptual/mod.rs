//! Perceptual edit detector.
//!
//! Overview
//! - Samples square patches on a regular grid and scores each aligned pair
//!   with a [`PatchScorer`] (0 = identical, larger = more different).
//! - Interpolates the sparse scores into a dense heatmap.
//! - Thresholds the heatmap, cleans the mask with elliptical opening and
//!   closing, and traces external contours.
//! - Describes every sufficiently large contour by a simplified polygon, its
//!   bounding box, centroid, area and mean heat, ranked by that mean.
//!
//! Modules
//! - [`options`] – configuration types.
//! - [`scorer`] – the scoring trait, the lazy handle and the bundled backend.
//! - [`heatmap`], [`interpolate`] – sampling and densification.
//! - [`morphology`], [`contours`], [`extractor`] – mask to regions.
//! - `pipeline` – the [`PerceptualDetector`] implementation.

pub mod contours;
pub mod extractor;
pub mod heatmap;
pub mod interpolate;
pub mod morphology;
pub mod options;
mod pipeline;
pub mod scorer;

pub use heatmap::{Heatmap, MIN_PATCH_SIZE};
pub use interpolate::{InterpolationMode, PatchSample};
pub use options::PerceptualDetectionOptions;
pub use pipeline::{detect_edit_regions_perceptual, PerceptualDetector};
pub use scorer::{PatchScorer, PatchView, ScorerHandle, StructuralScorer};
