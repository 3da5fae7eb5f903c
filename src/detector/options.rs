//! Option types configuring the deterministic detector.
//!
//! Defaults are tuned for AI-edited photographs: Delta-E 12 ignores most
//! diffusion noise, and the block strategy further suppresses isolated
//! speckle. For subtle edits lower `color_threshold`; for very noisy inputs
//! raise `min_block_density`.

use serde::{Deserialize, Serialize};

/// Which deterministic variant turns the Delta-E field into regions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionStrategy {
    /// Connected components of individual changed pixels. Most sensitive.
    Pixel,
    /// Connected components of dense blocks, like a video codec's macroblocks.
    #[default]
    Block,
}

/// Configuration for [`EditDetector`](super::EditDetector).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditDetectionOptions {
    /// Delta-E above which a pixel counts as changed (roughly 0..100).
    pub color_threshold: f32,
    /// Pixel strategy: components with fewer pixels are dropped as noise.
    pub min_region_size: usize,
    pub strategy: DetectionStrategy,
    /// Block strategy: side length of a grid cell in pixels.
    pub block_size: usize,
    /// Block strategy: minimum fraction (0..1) of changed pixels for a block
    /// to count as changed.
    pub min_block_density: f32,
    /// Block strategy: clusters with fewer connected blocks are dropped.
    pub min_block_count: usize,
}

impl Default for EditDetectionOptions {
    fn default() -> Self {
        Self {
            color_threshold: 12.0,
            min_region_size: 10,
            strategy: DetectionStrategy::Block,
            block_size: 8,
            min_block_density: 0.25,
            min_block_count: 2,
        }
    }
}

impl EditDetectionOptions {
    /// Default options using the per-pixel strategy.
    pub fn pixel() -> Self {
        Self {
            strategy: DetectionStrategy::Pixel,
            ..Default::default()
        }
    }

    pub fn with_strategy(mut self, strategy: DetectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_color_threshold(mut self, color_threshold: f32) -> Self {
        self.color_threshold = color_threshold;
        self
    }
}
