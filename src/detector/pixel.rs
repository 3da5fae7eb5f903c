//! Pixel strategy: connected components of individual changed pixels.
use super::significance::{compute_significance, round1};
use super::StrategyOutcome;
use crate::components::{connected_components, Component};
use crate::image::ChangeField;
use crate::types::{sort_edit_regions, EditRegion};

pub(super) fn detect_pixel_based(
    field: &ChangeField,
    color_threshold: f32,
    min_region_size: usize,
) -> StrategyOutcome {
    let (width, height) = (field.w, field.h);
    let changed: Vec<bool> = field.data.iter().map(|&d| d > color_threshold).collect();
    let total_changed = changed.iter().filter(|&&c| c).count();

    let components = connected_components(width, height, |idx| changed[idx]);
    let raw_components = components.len();

    let mut regions: Vec<EditRegion> = components
        .iter()
        .filter(|c| c.len() >= min_region_size)
        .map(|c| region_from_pixels(c, field))
        .collect();
    sort_edit_regions(&mut regions);

    StrategyOutcome {
        regions,
        total_changed,
        raw_components,
    }
}

fn region_from_pixels(component: &Component, field: &ChangeField) -> EditRegion {
    let mut total = 0.0f64;
    let mut max = 0.0f32;
    for &idx in &component.cells {
        let d = field.data[idx];
        total += d as f64;
        max = max.max(d);
    }
    let pixel_count = component.len();
    let avg = if pixel_count > 0 {
        total / pixel_count as f64
    } else {
        0.0
    };

    let width = component.bbox_width();
    let height = component.bbox_height();
    let area = width * height;

    EditRegion {
        x: component.min_x,
        y: component.min_y,
        width,
        height,
        center_x: midpoint(component.min_x, component.max_x),
        center_y: midpoint(component.min_y, component.max_y),
        pixel_count,
        avg_color_diff: round1(avg),
        max_color_diff: round1(max as f64),
        significance: compute_significance(area, avg, pixel_count),
    }
}

#[inline]
fn midpoint(lo: usize, hi: usize) -> usize {
    ((lo + hi) as f64 / 2.0).round_ties_even() as usize
}
