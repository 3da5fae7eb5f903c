//! Significance score shared by both deterministic strategies.
//!
//! `100 × (0.4·size + 0.4·intensity + 0.2·density)`, each term in [0, 1].
//! The weights and normalisers are empirical; downstream prompt text depends
//! on their exact numeric effect, so they are pinned by tests.

pub const SIZE_WEIGHT: f64 = 0.4;
pub const INTENSITY_WEIGHT: f64 = 0.4;
pub const DENSITY_WEIGHT: f64 = 0.2;
/// Bounding-box area treated as "full size" (about 100×100 px).
pub const AREA_NORMALIZER: f64 = 10_000.0;
/// Delta-E treated as "full intensity".
pub const INTENSITY_NORMALIZER: f64 = 100.0;

/// Score a region from its bounding-box `area`, mean Delta-E and changed
/// pixel count. Rounded half-to-even and clamped to `0..=100`.
pub fn compute_significance(area: usize, avg_color_diff: f64, pixel_count: usize) -> u32 {
    let size = (area as f64 / AREA_NORMALIZER).min(1.0);
    let intensity = (avg_color_diff / INTENSITY_NORMALIZER).min(1.0);
    let density = if area > 0 {
        pixel_count as f64 / area as f64
    } else {
        0.0
    };
    let score = 100.0 * (SIZE_WEIGHT * size + INTENSITY_WEIGHT * intensity + DENSITY_WEIGHT * density);
    score.clamp(0.0, 100.0).round_ties_even() as u32
}

/// Round to one decimal place for reporting, ties to even.
#[inline]
pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round_ties_even() / 10.0
}
