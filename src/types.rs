use serde::Serialize;

/// Axis-aligned changed region found by the deterministic (Delta-E) detector.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRegion {
    /// Top-left X coordinate
    pub x: usize,
    /// Top-left Y coordinate
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub center_x: usize,
    pub center_y: usize,
    /// Changed pixels inside the region.
    pub pixel_count: usize,
    /// Mean Delta-E over the changed pixels, one decimal.
    pub avg_color_diff: f64,
    /// Largest Delta-E among the changed pixels, one decimal.
    pub max_color_diff: f64,
    /// Perceptual significance in `0..=100`.
    pub significance: u32,
}

/// Changed region found by the perceptual detector, outlined by a polygon.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonRegion {
    /// Simplified contour vertices.
    pub polygon: Vec<(i32, i32)>,
    /// `(x, y, w, h)` of the contour.
    pub bounding_box: (i32, i32, i32, i32),
    /// Centroid from image moments, bbox center when degenerate.
    pub center: (i32, i32),
    /// Enclosed contour area in pixels.
    pub area: usize,
    /// Mean heatmap value inside the contour scaled to `0..=100`, one decimal.
    pub significance: f32,
}

/// Ranked regions plus aggregate change statistics for one comparison.
///
/// `image_width`/`image_height` always describe the original image, even
/// when the edited image had different dimensions.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult<R> {
    /// Sorted by significance, most significant first; ties keep discovery order.
    pub regions: Vec<R>,
    /// Changed pixels (deterministic) or summed region area (perceptual).
    pub total_changed: usize,
    pub percent_changed: f64,
    pub image_width: usize,
    pub image_height: usize,
}

pub type EditDetectionResult = DetectionResult<EditRegion>;
pub type PerceptualDetectionResult = DetectionResult<PolygonRegion>;

impl<R> DetectionResult<R> {
    /// Assemble a result, deriving `percent_changed` from the image area.
    pub fn new(regions: Vec<R>, total_changed: usize, image_width: usize, image_height: usize) -> Self {
        let total_pixels = image_width * image_height;
        let percent_changed = if total_pixels > 0 {
            total_changed as f64 / total_pixels as f64 * 100.0
        } else {
            0.0
        };
        Self {
            regions,
            total_changed,
            percent_changed,
            image_width,
            image_height,
        }
    }

    /// An empty result for an image of the given size.
    pub fn empty(image_width: usize, image_height: usize) -> Self {
        Self::new(Vec::new(), 0, image_width, image_height)
    }
}

/// Sort regions by significance, descending, keeping discovery order on ties.
pub(crate) fn sort_edit_regions(regions: &mut [EditRegion]) {
    regions.sort_by(|a, b| b.significance.cmp(&a.significance));
}

/// Sort polygon regions by significance, descending, keeping discovery order on ties.
pub(crate) fn sort_polygon_regions(regions: &mut [PolygonRegion]) {
    regions.sort_by(|a, b| b.significance.total_cmp(&a.significance));
}
