//! Block strategy: threshold grid cells by change density, then cluster them.
//!
//! Comparable to macroblock change detection in video codecs. Isolated
//! noisy pixels rarely push a whole cell over `min_block_density`, and
//! single stray cells are removed by `min_block_count`.
use super::significance::{compute_significance, round1};
use super::StrategyOutcome;
use crate::components::{connected_components, Component};
use crate::image::ChangeField;
use crate::types::{sort_edit_regions, EditRegion};
use log::debug;

#[derive(Clone, Copy, Debug, Default)]
struct BlockStats {
    changed_pixels: usize,
    total_diff: f64,
    max_diff: f32,
    changed: bool,
}

/// Cell layout of the block grid. Edge cells may be smaller than `size`.
#[derive(Clone, Copy, Debug)]
struct BlockGrid {
    size: usize,
    cols: usize,
    rows: usize,
}

impl BlockGrid {
    fn new(width: usize, height: usize, block_size: usize) -> Self {
        let size = block_size.max(1);
        Self {
            size,
            cols: width.div_ceil(size),
            rows: height.div_ceil(size),
        }
    }
}

pub(super) fn detect_block_based(
    field: &ChangeField,
    color_threshold: f32,
    block_size: usize,
    min_block_density: f32,
    min_block_count: usize,
) -> StrategyOutcome {
    let (width, height) = (field.w, field.h);
    let grid = BlockGrid::new(width, height, block_size);
    let (stats, total_changed) = accumulate_blocks(field, &grid, color_threshold, min_block_density);
    debug!(
        "detect_block_based: grid {}x{} (block {}), {} changed cells",
        grid.cols,
        grid.rows,
        grid.size,
        stats.iter().filter(|s| s.changed).count()
    );

    let clusters = connected_components(grid.cols, grid.rows, |idx| stats[idx].changed);
    let raw_components = clusters.len();

    let mut regions: Vec<EditRegion> = clusters
        .iter()
        .filter(|c| c.len() >= min_block_count)
        .map(|c| region_from_blocks(c, &stats, &grid, width, height))
        .collect();
    sort_edit_regions(&mut regions);

    StrategyOutcome {
        regions,
        total_changed,
        raw_components,
    }
}

fn accumulate_blocks(
    field: &ChangeField,
    grid: &BlockGrid,
    color_threshold: f32,
    min_block_density: f32,
) -> (Vec<BlockStats>, usize) {
    let mut stats = vec![BlockStats::default(); grid.cols * grid.rows];
    let mut total_changed = 0usize;

    for y in 0..field.h {
        let row_base = (y / grid.size) * grid.cols;
        let row = &field.data[y * field.stride..y * field.stride + field.w];
        for (x, &d) in row.iter().enumerate() {
            if d <= color_threshold {
                continue;
            }
            total_changed += 1;
            let cell = &mut stats[row_base + x / grid.size];
            cell.changed_pixels += 1;
            cell.total_diff += d as f64;
            cell.max_diff = cell.max_diff.max(d);
        }
    }

    for by in 0..grid.rows {
        let cell_h = (field.h - by * grid.size).min(grid.size);
        for bx in 0..grid.cols {
            let cell_w = (field.w - bx * grid.size).min(grid.size);
            let cell = &mut stats[by * grid.cols + bx];
            let density = cell.changed_pixels as f32 / (cell_w * cell_h) as f32;
            cell.changed = density >= min_block_density;
        }
    }

    (stats, total_changed)
}

fn region_from_blocks(
    cluster: &Component,
    stats: &[BlockStats],
    grid: &BlockGrid,
    image_width: usize,
    image_height: usize,
) -> EditRegion {
    let mut total_diff = 0.0f64;
    let mut pixel_count = 0usize;
    let mut max_diff = 0.0f32;
    for &idx in &cluster.cells {
        let cell = &stats[idx];
        total_diff += cell.total_diff;
        pixel_count += cell.changed_pixels;
        max_diff = max_diff.max(cell.max_diff);
    }

    let x = cluster.min_x * grid.size;
    let y = cluster.min_y * grid.size;
    let right = ((cluster.max_x + 1) * grid.size).min(image_width);
    let bottom = ((cluster.max_y + 1) * grid.size).min(image_height);
    let width = right - x;
    let height = bottom - y;

    let avg = if pixel_count > 0 {
        total_diff / pixel_count as f64
    } else {
        0.0
    };

    EditRegion {
        x,
        y,
        width,
        height,
        center_x: half_way(x, width),
        center_y: half_way(y, height),
        pixel_count,
        avg_color_diff: round1(avg),
        max_color_diff: round1(max_diff as f64),
        significance: compute_significance(width * height, avg, pixel_count),
    }
}

#[inline]
fn half_way(origin: usize, extent: usize) -> usize {
    (origin as f64 + extent as f64 / 2.0).round_ties_even() as usize
}
