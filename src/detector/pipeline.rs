//! Deterministic detector driving Delta-E comparison end-to-end.
//!
//! Typical usage:
//! ```no_run
//! use edit_regions::image::ColorImage;
//! use edit_regions::{EditDetectionOptions, EditDetector};
//!
//! # fn example(a: &[u8], b: &[u8]) -> edit_regions::Result<()> {
//! let original = ColorImage::new(640, 480, 3, a)?;
//! let edited = ColorImage::new(640, 480, 3, b)?;
//! let detector = EditDetector::new(EditDetectionOptions::default());
//! let result = detector.detect(original, edited)?;
//! for region in &result.regions {
//!     println!("{}x{} at ({}, {})", region.width, region.height, region.x, region.y);
//! }
//! # Ok(())
//! # }
//! ```
use super::block::detect_block_based;
use super::options::{DetectionStrategy, EditDetectionOptions};
use super::pixel::detect_pixel_based;
use super::StrategyOutcome;
use crate::color::compute_delta_e;
use crate::diagnostics::{
    elapsed_ms, DetectionReport, FieldStats, InputDescriptor, PipelineTrace, TimingBreakdown,
};
use crate::error::Result;
use crate::image::{AlignedPair, ChangeField, ColorImage};
use crate::types::{DetectionResult, EditDetectionResult, EditRegion};
use log::debug;
use std::time::Instant;

/// Finds rectangular edit regions from per-pixel CIE76 colour distance.
///
/// Stateless apart from its options; one detector can serve any number of
/// image pairs, from any number of threads.
#[derive(Clone, Debug, Default)]
pub struct EditDetector {
    options: EditDetectionOptions,
}

impl EditDetector {
    pub fn new(options: EditDetectionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EditDetectionOptions {
        &self.options
    }

    /// Compare `edited` against `original` and return ranked regions.
    ///
    /// An edited image with different dimensions is resampled to the
    /// original's size; reported coordinates always refer to the original.
    pub fn detect(&self, original: ColorImage<'_>, edited: ColorImage<'_>) -> Result<EditDetectionResult> {
        Ok(self.detect_with_diagnostics(original, edited)?.result)
    }

    /// Run the detector and return the result together with a trace.
    pub fn detect_with_diagnostics(
        &self,
        original: ColorImage<'_>,
        edited: ColorImage<'_>,
    ) -> Result<DetectionReport<EditRegion>> {
        let total_start = Instant::now();
        let opts = &self.options;
        debug!(
            "EditDetector::detect start w={} h={} strategy={:?} threshold={}",
            original.w, original.h, opts.strategy, opts.color_threshold
        );
        let input = InputDescriptor {
            width: original.w,
            height: original.h,
            edited_width: edited.w,
            edited_height: edited.h,
            resampled: false,
        };
        let mut timings = TimingBreakdown::default();

        let align_start = Instant::now();
        let pair = AlignedPair::new(original, edited);
        timings.push_since("align", align_start);

        let delta_start = Instant::now();
        let field = compute_delta_e(pair.width, pair.height, &pair.original, &pair.edited);
        timings.push_since("delta_e", delta_start);

        let regions_start = Instant::now();
        let outcome = self.extract(&field);
        timings.push_since("regions", regions_start);

        let StrategyOutcome {
            regions,
            total_changed,
            raw_components,
        } = outcome;
        debug!(
            "EditDetector::detect components={} kept={} changed_px={}",
            raw_components,
            regions.len(),
            total_changed
        );
        let kept_regions = regions.len();
        let result = DetectionResult::new(regions, total_changed, pair.width, pair.height);
        timings.total_ms = elapsed_ms(total_start);

        let trace = PipelineTrace {
            input: InputDescriptor {
                resampled: pair.resampled,
                ..input
            },
            timings,
            field: FieldStats::from_field(&field),
            raw_candidates: raw_components,
            kept_regions,
            patch_samples: None,
        };
        Ok(DetectionReport {
            result,
            trace,
            field,
        })
    }

    /// Per-pixel Delta-E between the two images on the original's grid.
    pub fn change_field(&self, original: ColorImage<'_>, edited: ColorImage<'_>) -> ChangeField {
        let pair = AlignedPair::new(original, edited);
        compute_delta_e(pair.width, pair.height, &pair.original, &pair.edited)
    }

    fn extract(&self, field: &ChangeField) -> StrategyOutcome {
        let opts = &self.options;
        match opts.strategy {
            DetectionStrategy::Pixel => {
                detect_pixel_based(field, opts.color_threshold, opts.min_region_size)
            }
            DetectionStrategy::Block => detect_block_based(
                field,
                opts.color_threshold,
                opts.block_size,
                opts.min_block_density,
                opts.min_block_count,
            ),
        }
    }
}

/// Convenience wrapper: validate two `[H, W, C]` buffers and run the
/// deterministic detector with `options`.
pub fn detect_edit_regions(
    original: ColorImage<'_>,
    edited: ColorImage<'_>,
    options: &EditDetectionOptions,
) -> Result<EditDetectionResult> {
    EditDetector::new(options.clone()).detect(original, edited)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_with_square(w: usize, h: usize, x0: usize, y0: usize, side: usize) -> Vec<u8> {
        let mut data = vec![128u8; w * h * 3];
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                let i = (y * w + x) * 3;
                data[i..i + 3].copy_from_slice(&[255, 255, 255]);
            }
        }
        data
    }

    #[test]
    fn trace_reports_stages_and_counts() {
        let a = vec![128u8; 64 * 64 * 3];
        let b = gray_with_square(64, 64, 8, 8, 16);
        let detector = EditDetector::new(EditDetectionOptions::pixel());
        let report = detector
            .detect_with_diagnostics(
                ColorImage::new(64, 64, 3, &a).unwrap(),
                ColorImage::new(64, 64, 3, &b).unwrap(),
            )
            .unwrap();
        assert_eq!(report.result.regions.len(), 1);
        assert_eq!(report.trace.raw_candidates, 1);
        assert_eq!(report.trace.kept_regions, 1);
        assert!(!report.trace.input.resampled);
        for stage in ["align", "delta_e", "regions"] {
            assert!(report.trace.timings.stage_ms(stage).is_some(), "missing {stage}");
        }
        assert_eq!(report.field.w, 64);
        assert!(report.trace.field.max > 12.0);
        assert_eq!(report.trace.field.min, 0.0);
    }

    #[test]
    fn both_strategies_locate_an_aligned_square() {
        let a = vec![128u8; 64 * 64 * 3];
        let b = gray_with_square(64, 64, 16, 16, 16);
        for options in [EditDetectionOptions::pixel(), EditDetectionOptions::default()] {
            let result = detect_edit_regions(
                ColorImage::new(64, 64, 3, &a).unwrap(),
                ColorImage::new(64, 64, 3, &b).unwrap(),
                &options,
            )
            .unwrap();
            assert_eq!(result.regions.len(), 1, "{:?}", options.strategy);
            let r = &result.regions[0];
            assert_eq!((r.x, r.y, r.width, r.height), (16, 16, 16, 16));
            assert_eq!(r.pixel_count, 256);
            assert_eq!(result.total_changed, 256);
        }
    }
}
