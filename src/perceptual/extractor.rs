//! Turn a perceptual heatmap into ranked polygon regions.
use super::contours::{
    approx_poly_dp, arc_length, bounding_rect, compress_chain, contour_area, external_contours,
    filled_pixels, polygon_moments, SIMPLIFY_EPSILON_FRACTION,
};
use super::morphology::{close, open, BinaryMask, StructuringElement};
use super::options::PerceptualDetectionOptions;
use crate::detector::significance::round1;
use crate::image::ImageF32;
use crate::types::{sort_polygon_regions, PolygonRegion};
use log::debug;

/// Regions extracted from one heatmap.
#[derive(Clone, Debug)]
pub struct Extraction {
    pub regions: Vec<PolygonRegion>,
    /// Sum of region areas.
    pub total_area: usize,
    /// External contours found before area filtering.
    pub raw_contours: usize,
}

/// Threshold, clean up, trace and describe the changed areas of `heatmap`.
pub fn extract_regions(heatmap: &ImageF32, options: &PerceptualDetectionOptions) -> Extraction {
    let threshold = options.threshold;
    let mask = BinaryMask::from_field(heatmap, |v| v > threshold);
    let kernel = StructuringElement::ellipse(options.morphology_kernel_size);
    let mask = close(&open(&mask, &kernel), &kernel);

    let contours = external_contours(&mask);
    let raw_contours = contours.len();
    debug!(
        "extract_regions: {} raw contours, {} px above threshold after morphology",
        raw_contours,
        mask.count()
    );

    let mut regions: Vec<PolygonRegion> = contours
        .iter()
        .filter_map(|chain| describe_contour(chain, heatmap, options.min_area))
        .collect();
    sort_polygon_regions(&mut regions);
    let total_area = regions.iter().map(|r| r.area).sum();

    Extraction {
        regions,
        total_area,
        raw_contours,
    }
}

fn describe_contour(
    chain: &[(i32, i32)],
    heatmap: &ImageF32,
    min_area: usize,
) -> Option<PolygonRegion> {
    let vertices = compress_chain(chain);
    let area = contour_area(&vertices);
    if area < min_area as f64 {
        return None;
    }
    let epsilon = SIMPLIFY_EPSILON_FRACTION * arc_length(&vertices, true);
    let polygon = approx_poly_dp(&vertices, epsilon);

    let bounding_box = bounding_rect(chain);
    let (x, y, w, h) = bounding_box;
    let center = polygon_moments(&vertices)
        .centroid()
        .unwrap_or((x + w / 2, y + h / 2));

    let inside = filled_pixels(chain, heatmap.w, heatmap.h);
    let significance = if inside.is_empty() {
        0.0
    } else {
        let sum: f64 = inside
            .iter()
            .map(|&idx| heatmap.get(idx % heatmap.w, idx / heatmap.w) as f64)
            .sum();
        let mean = sum / inside.len() as f64;
        round1((mean * 100.0).clamp(0.0, 100.0))
    };

    Some(PolygonRegion {
        polygon,
        bounding_box,
        center,
        area: area as usize,
        significance: significance as f32,
    })
}
