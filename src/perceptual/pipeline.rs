//! Perceptual detector: patch heatmap → mask → polygon regions.
//!
//! Scoring every patch is far more expensive than the Delta-E pipeline,
//! especially with a learned backend. Callers serving requests should run
//! [`PerceptualDetector::detect`] on a worker thread.
//!
//! ```no_run
//! use edit_regions::image::ColorImage;
//! use edit_regions::{PerceptualDetectionOptions, PerceptualDetector};
//!
//! # fn example(a: &[u8], b: &[u8]) -> edit_regions::Result<()> {
//! let detector = PerceptualDetector::new(PerceptualDetectionOptions::default());
//! let result = detector.detect(
//!     ColorImage::new(512, 512, 3, a)?,
//!     ColorImage::new(512, 512, 3, b)?,
//! )?;
//! println!("{} regions, {:.1}% changed", result.regions.len(), result.percent_changed);
//! # Ok(())
//! # }
//! ```
use super::extractor::{extract_regions, Extraction};
use super::heatmap::{compute_heatmap, Heatmap};
use super::options::PerceptualDetectionOptions;
use super::scorer::{PatchScorer, ScorerHandle};
use crate::diagnostics::{
    elapsed_ms, DetectionReport, FieldStats, InputDescriptor, PipelineTrace, TimingBreakdown,
};
use crate::error::Result;
use crate::image::{AlignedPair, ColorImage};
use crate::types::{DetectionResult, PerceptualDetectionResult, PolygonRegion};
use log::debug;
use std::sync::Arc;
use std::time::Instant;

/// Finds polygon edit regions from a perceptual patch heatmap.
///
/// Owns the [`ScorerHandle`]; the backend is constructed on the first
/// detection that needs it and reused afterwards. Share one detector (for
/// example behind an `Arc`) to share the backend.
#[derive(Debug, Default)]
pub struct PerceptualDetector {
    options: PerceptualDetectionOptions,
    scorer: ScorerHandle,
}

impl PerceptualDetector {
    /// Detector using the bundled structural scorer.
    pub fn new(options: PerceptualDetectionOptions) -> Self {
        Self {
            options,
            scorer: ScorerHandle::default(),
        }
    }

    /// Detector using an already constructed backend.
    pub fn with_scorer(options: PerceptualDetectionOptions, scorer: Arc<dyn PatchScorer>) -> Self {
        Self {
            options,
            scorer: ScorerHandle::ready(scorer),
        }
    }

    /// Detector whose backend is built by `loader` on first use.
    pub fn with_loader<F>(options: PerceptualDetectionOptions, loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn PatchScorer>> + Send + Sync + 'static,
    {
        Self {
            options,
            scorer: ScorerHandle::lazy(loader),
        }
    }

    pub fn options(&self) -> &PerceptualDetectionOptions {
        &self.options
    }

    pub fn scorer(&self) -> &ScorerHandle {
        &self.scorer
    }

    /// Compare `edited` against `original` and return ranked polygon regions.
    pub fn detect(&self, original: ColorImage<'_>, edited: ColorImage<'_>) -> Result<PerceptualDetectionResult> {
        Ok(self.detect_with_diagnostics(original, edited)?.result)
    }

    /// Run the detector and return the result, the heatmap and a trace.
    pub fn detect_with_diagnostics(
        &self,
        original: ColorImage<'_>,
        edited: ColorImage<'_>,
    ) -> Result<DetectionReport<PolygonRegion>> {
        let total_start = Instant::now();
        debug!(
            "PerceptualDetector::detect start w={} h={} patch={} stride={}",
            original.w, original.h, self.options.patch_size, self.options.stride
        );
        let (edited_width, edited_height) = (edited.w, edited.h);
        let mut timings = TimingBreakdown::default();

        let align_start = Instant::now();
        let pair = AlignedPair::new(original, edited);
        timings.push_since("align", align_start);

        let heat_start = Instant::now();
        let heatmap = self.heatmap_for(&pair)?;
        timings.push_since("heatmap", heat_start);
        let stats = FieldStats::from_field(&heatmap.field);
        debug!(
            "PerceptualDetector::detect heatmap min={:.3} max={:.3} mean={:.3}",
            stats.min, stats.max, stats.mean
        );

        let extract_start = Instant::now();
        let Extraction {
            regions,
            total_area,
            raw_contours,
        } = extract_regions(&heatmap.field, &self.options);
        timings.push_since("regions", extract_start);

        let kept_regions = regions.len();
        let result = DetectionResult::new(regions, total_area, pair.width, pair.height);
        debug!(
            "PerceptualDetector::detect contours={} kept={} ({:.1}% of image)",
            raw_contours, kept_regions, result.percent_changed
        );
        timings.total_ms = elapsed_ms(total_start);

        let trace = PipelineTrace {
            input: InputDescriptor {
                width: pair.width,
                height: pair.height,
                edited_width,
                edited_height,
                resampled: pair.resampled,
            },
            timings,
            field: stats,
            raw_candidates: raw_contours,
            kept_regions,
            patch_samples: Some(heatmap.samples.len()),
        };
        Ok(DetectionReport {
            result,
            trace,
            field: heatmap.field,
        })
    }

    /// Dense perceptual heatmap on the original's grid.
    pub fn heatmap(&self, original: ColorImage<'_>, edited: ColorImage<'_>) -> Result<Heatmap> {
        self.heatmap_for(&AlignedPair::new(original, edited))
    }

    fn heatmap_for(&self, pair: &AlignedPair<'_>) -> Result<Heatmap> {
        compute_heatmap(
            pair.width,
            pair.height,
            &pair.original,
            &pair.edited,
            self.options.patch_size,
            self.options.stride,
            &self.scorer,
        )
    }
}

/// Convenience wrapper running a fresh [`PerceptualDetector`] with the
/// bundled scorer.
///
/// The scorer is loaded on every call and dropped afterwards. Long-lived
/// callers should construct one [`PerceptualDetector`] and reuse it so the
/// backend is loaded once.
pub fn detect_edit_regions_perceptual(
    original: ColorImage<'_>,
    edited: ColorImage<'_>,
    options: &PerceptualDetectionOptions,
) -> Result<PerceptualDetectionResult> {
    PerceptualDetector::new(options.clone()).detect(original, edited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perceptual::PatchView;

    /// Scores 1.0 wherever the edited patch differs at all.
    struct AnyChange;

    impl PatchScorer for AnyChange {
        fn score(&self, original: &PatchView<'_>, edited: &PatchView<'_>) -> Result<f32> {
            Ok(if original.same_pixels(edited) { 0.0 } else { 1.0 })
        }
    }

    #[test]
    fn identical_images_have_no_regions() {
        let rgb: Vec<u8> = (0..128 * 128 * 3).map(|i| (i % 251) as u8).collect();
        let detector = PerceptualDetector::new(PerceptualDetectionOptions::default());
        let report = detector
            .detect_with_diagnostics(
                ColorImage::new(128, 128, 3, &rgb).unwrap(),
                ColorImage::new(128, 128, 3, &rgb).unwrap(),
            )
            .unwrap();
        assert!(report.result.regions.is_empty());
        assert_eq!(report.result.total_changed, 0);
        assert_eq!(report.trace.patch_samples, Some(9));
        assert_eq!(report.trace.field.max, 0.0);
    }

    #[test]
    fn undersized_images_return_empty_without_loading_backend() {
        let rgb = vec![0u8; 40 * 40 * 3];
        let white = vec![255u8; 40 * 40 * 3];
        let detector = PerceptualDetector::with_loader(PerceptualDetectionOptions::default(), || {
            Err(crate::DetectionError::scorer("not needed"))
        });
        let result = detector
            .detect(
                ColorImage::new(40, 40, 3, &rgb).unwrap(),
                ColorImage::new(40, 40, 3, &white).unwrap(),
            )
            .unwrap();
        assert!(result.regions.is_empty());
        assert_eq!((result.image_width, result.image_height), (40, 40));
        assert!(!detector.scorer().is_initialized());
    }

    #[test]
    fn wrapper_matches_a_reused_detector() {
        let (w, h) = (128usize, 128usize);
        let original: Vec<u8> = (0..w * h * 3).map(|i| (i % 251) as u8).collect();
        let mut edited = original.clone();
        for y in 40..90 {
            for x in 40..90 {
                let i = (y * w + x) * 3;
                edited[i..i + 3].copy_from_slice(&[0, 0, 0]);
            }
        }
        let options = PerceptualDetectionOptions::default();
        let detector = PerceptualDetector::new(options.clone());
        let a = ColorImage::new(w, h, 3, &original).unwrap();
        let b = ColorImage::new(w, h, 3, &edited).unwrap();
        let held = detector.detect(a, b).unwrap();
        assert_eq!(detector.detect(a, b).unwrap(), held);
        assert_eq!(detect_edit_regions_perceptual(a, b, &options).unwrap(), held);
    }

    #[test]
    fn custom_backend_drives_region_placement() {
        let (w, h) = (256usize, 256usize);
        let original = vec![255u8; w * h * 3];
        let mut edited = original.clone();
        for y in 160..224 {
            for x in 160..224 {
                let i = (y * w + x) * 3;
                edited[i..i + 3].copy_from_slice(&[0, 0, 0]);
            }
        }
        let detector =
            PerceptualDetector::with_scorer(PerceptualDetectionOptions::default(), Arc::new(AnyChange));
        let result = detector
            .detect(
                ColorImage::new(w, h, 3, &original).unwrap(),
                ColorImage::new(w, h, 3, &edited).unwrap(),
            )
            .unwrap();
        assert!(!result.regions.is_empty());
        let top = &result.regions[0];
        let (x, y, bw, bh) = top.bounding_box;
        assert!(x <= 192 && x + bw > 192 && y <= 192 && y + bh > 192, "{:?}", top.bounding_box);
        assert!(top.significance > 10.0);
        assert!(detector.scorer().is_initialized());
    }
}
