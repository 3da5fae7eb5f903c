//! Option types configuring the perceptual detector.

use serde::{Deserialize, Serialize};

/// Configuration for [`PerceptualDetector`](super::PerceptualDetector).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptualDetectionOptions {
    /// Heatmap value (0..1) above which a pixel counts as changed. Higher is
    /// more permissive.
    pub threshold: f32,
    /// Contours enclosing less area (px²) are dropped.
    pub min_area: usize,
    /// Side of the square patches handed to the scorer. Raised to the
    /// scorer's minimum when smaller.
    pub patch_size: usize,
    /// Step between patch origins. Smaller is more accurate but slower.
    pub stride: usize,
    /// Diameter of the elliptical kernel used for opening and closing.
    pub morphology_kernel_size: usize,
}

impl Default for PerceptualDetectionOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            min_area: 100,
            patch_size: 64,
            stride: 32,
            morphology_kernel_size: 5,
        }
    }
}

impl PerceptualDetectionOptions {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_sampling(mut self, patch_size: usize, stride: usize) -> Self {
        self.patch_size = patch_size;
        self.stride = stride;
        self
    }
}
