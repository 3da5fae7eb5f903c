//! Patch-sampled perceptual heatmap.
//!
//! Square patches are sampled on a regular grid, each aligned pair is scored
//! by the [`PatchScorer`](super::PatchScorer), and the sparse scores are
//! interpolated back to one value per pixel.
use super::interpolate::{interpolate_samples, InterpolationMode, PatchSample};
use super::scorer::{PatchView, ScorerHandle};
use crate::error::Result;
use crate::image::ImageF32;
use log::{debug, warn};

/// Smallest patch side accepted by the scoring backends. Learned backends
/// lose their pooling layers below this size.
pub const MIN_PATCH_SIZE: usize = 64;

/// Dense heatmap plus the samples it was interpolated from.
#[derive(Clone, Debug)]
pub struct Heatmap {
    pub field: ImageF32,
    pub samples: Vec<PatchSample>,
    pub mode: InterpolationMode,
    /// Patch side and stride after applying the minimum patch size.
    pub patch_size: usize,
    pub stride: usize,
}

/// Apply the minimum patch size. An undersized patch is raised to
/// [`MIN_PATCH_SIZE`] and the stride widened to at least half of it.
pub fn effective_sampling(patch_size: usize, stride: usize) -> (usize, usize) {
    let stride = stride.max(1);
    if patch_size < MIN_PATCH_SIZE {
        (MIN_PATCH_SIZE, stride.max(MIN_PATCH_SIZE / 2))
    } else {
        (patch_size, stride)
    }
}

/// Top-left corners of every patch, row-major.
pub fn patch_origins(width: usize, height: usize, patch_size: usize, stride: usize) -> Vec<(usize, usize)> {
    if width < patch_size || height < patch_size {
        return Vec::new();
    }
    let stride = stride.max(1);
    let xs: Vec<usize> = (0..=width - patch_size).step_by(stride).collect();
    (0..=height - patch_size)
        .step_by(stride)
        .flat_map(|y| xs.iter().map(move |&x| (x, y)))
        .collect()
}

/// Build the heatmap for two packed RGB buffers of `width × height` pixels.
///
/// Images smaller than [`MIN_PATCH_SIZE`] on either side yield an all-zero
/// heatmap without touching the scorer.
pub fn compute_heatmap(
    width: usize,
    height: usize,
    original: &[u8],
    edited: &[u8],
    patch_size: usize,
    stride: usize,
    scorer: &ScorerHandle,
) -> Result<Heatmap> {
    let (patch_size, stride) = effective_sampling(patch_size, stride);
    if width < MIN_PATCH_SIZE || height < MIN_PATCH_SIZE {
        warn!(
            "compute_heatmap: image {}x{} below minimum patch {}x{}, returning zeros",
            width, height, MIN_PATCH_SIZE, MIN_PATCH_SIZE
        );
        return Ok(Heatmap {
            field: ImageF32::new(width, height),
            samples: Vec::new(),
            mode: InterpolationMode::Empty,
            patch_size,
            stride,
        });
    }

    let origins = patch_origins(width, height, patch_size, stride);
    let backend = scorer.get()?;
    let score_at = |&(x, y): &(usize, usize)| -> Result<PatchSample> {
        let a = PatchView::new(original, width, x, y, patch_size);
        let b = PatchView::new(edited, width, x, y, patch_size);
        Ok(PatchSample {
            x: x + patch_size / 2,
            y: y + patch_size / 2,
            score: backend.score(&a, &b)?,
        })
    };

    #[cfg(feature = "parallel")]
    let samples: Vec<PatchSample> = {
        use rayon::prelude::*;
        origins.par_iter().map(score_at).collect::<Result<Vec<_>>>()?
    };
    #[cfg(not(feature = "parallel"))]
    let samples: Vec<PatchSample> = origins.iter().map(score_at).collect::<Result<Vec<_>>>()?;

    let (field, mode) = interpolate_samples(&samples, width, height);
    debug!(
        "compute_heatmap: {} patches ({}px, stride {}) via {:?}",
        samples.len(),
        patch_size,
        stride,
        mode
    );
    Ok(Heatmap {
        field,
        samples,
        mode,
        patch_size,
        stride,
    })
}
