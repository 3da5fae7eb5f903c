//! Plain-text rendering of detection results for language-model prompts.
//!
//! Downstream prompts quote this text verbatim, so wording, field order and
//! number formatting are part of the contract and pinned by tests.
use crate::types::{DetectionResult, EditRegion, PolygonRegion};

/// Returned instead of a listing when no region was detected.
pub const NO_CHANGES_SENTINEL: &str =
    "DETECTED EDIT LOCATIONS: No significant changes detected between images.";

/// A region kind that can be listed in a prompt.
pub trait PromptRegion {
    const HEADER: &'static str;

    /// Body of the numbered line, without the leading `"  {i}. "`.
    fn describe(&self) -> String;

    /// Summary line for the whole result.
    fn totals_line(total_changed: usize, percent_changed: f64) -> String;
}

impl PromptRegion for EditRegion {
    const HEADER: &'static str = "DETECTED EDIT LOCATIONS (sorted by significance):";

    fn describe(&self) -> String {
        format!(
            "Region from ({}, {}) to ({}, {}), center: ({}, {}), size: {}x{}, {} pixels changed, intensity: avg={:.1}, max={:.1}, significance: {}/100",
            self.x,
            self.y,
            (self.x + self.width) as i64 - 1,
            (self.y + self.height) as i64 - 1,
            self.center_x,
            self.center_y,
            self.width,
            self.height,
            self.pixel_count,
            self.avg_color_diff,
            self.max_color_diff,
            self.significance
        )
    }

    fn totals_line(total_changed: usize, percent_changed: f64) -> String {
        format!("Total: {total_changed} pixels changed ({percent_changed:.1}% of image)")
    }
}

impl PromptRegion for PolygonRegion {
    const HEADER: &'static str =
        "DETECTED EDIT LOCATIONS (by perceptual difference, sorted by significance):";

    fn describe(&self) -> String {
        let (x, y, w, h) = self.bounding_box;
        format!(
            "Region centered at ({}, {}), bounding box from ({}, {}) to ({}, {}), size: {}x{}, area: {}px, significance: {:.1}/100",
            self.center.0,
            self.center.1,
            x,
            y,
            x + w - 1,
            y + h - 1,
            w,
            h,
            self.area,
            self.significance
        )
    }

    fn totals_line(total_changed: usize, percent_changed: f64) -> String {
        format!("Total changed area: {total_changed}px ({percent_changed:.1}% of image)")
    }
}

/// Render `result` as the numbered listing quoted into prompts, or
/// [`NO_CHANGES_SENTINEL`] when it has no regions.
pub fn format_edit_regions_for_prompt<R: PromptRegion>(result: &DetectionResult<R>) -> String {
    if result.regions.is_empty() {
        return NO_CHANGES_SENTINEL.to_string();
    }
    let mut lines: Vec<String> = Vec::with_capacity(result.regions.len() + 4);
    lines.push(R::HEADER.to_string());
    for (i, region) in result.regions.iter().enumerate() {
        lines.push(format!("  {}. {}", i + 1, region.describe()));
    }
    lines.push(String::new());
    lines.push(R::totals_line(result.total_changed, result.percent_changed));
    lines.push(format!(
        "Image dimensions: {}x{}",
        result.image_width, result.image_height
    ));
    lines.join("\n")
}
