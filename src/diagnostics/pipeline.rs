use crate::diagnostics::TimingBreakdown;
use crate::image::ChangeField;
use crate::types::DetectionResult;
use serde::Serialize;

/// Result produced by the `detect_with_diagnostics` entry points of
/// [`EditDetector`](crate::EditDetector) and
/// [`PerceptualDetector`](crate::PerceptualDetector).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport<R> {
    pub result: DetectionResult<R>,
    pub trace: PipelineTrace,
    /// Per-pixel change field the regions were extracted from: Delta-E for
    /// the deterministic pipeline, the interpolated heatmap for the
    /// perceptual one. Dimensions match the original image.
    #[serde(skip)]
    pub field: ChangeField,
}

/// End-to-end trace describing the internal execution of a detector run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    pub field: FieldStats,
    /// Connected components (deterministic) or external contours
    /// (perceptual) found before size filtering.
    pub raw_candidates: usize,
    pub kept_regions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_samples: Option<usize>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub edited_width: usize,
    pub edited_height: usize,
    /// Whether the edited image was resampled to the original's size.
    pub resampled: bool,
}

/// Summary statistics of the change field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl FieldStats {
    pub fn from_field(field: &ChangeField) -> Self {
        let (min, max, mean) = field.min_max_mean();
        Self { min, max, mean }
    }
}

impl PipelineTrace {
    /// One-line human summary, used by the demo binary.
    pub fn summary(&self) -> String {
        let samples = self
            .patch_samples
            .map(|n| format!(" samples={n}"))
            .unwrap_or_default();
        format!(
            "{}x{}{} field[min={:.3} max={:.3} mean={:.3}] candidates={} kept={}{} total={:.2}ms",
            self.input.width,
            self.input.height,
            if self.input.resampled { " (resampled)" } else { "" },
            self.field.min,
            self.field.max,
            self.field.mean,
            self.raw_candidates,
            self.kept_regions,
            samples,
            self.timings.total_ms
        )
    }
}
