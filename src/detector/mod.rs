//! Deterministic edit detector built on per-pixel CIE76 Delta-E.
//!
//! Overview
//! - Aligns the edited image to the original's grid (Lanczos3 when sizes
//!   differ) and computes a Delta-E field.
//! - Thresholds the field and groups changes with one of two strategies:
//!   - `Pixel`: 4-connected components of changed pixels, dropping components
//!     smaller than `min_region_size`.
//!   - `Block` (default): splits the frame into `block_size` cells, keeps
//!     cells whose changed fraction reaches `min_block_density`, and groups
//!     cells into clusters of at least `min_block_count`.
//! - Scores every region with a weighted size/intensity/density significance
//!   and sorts descending, stable on ties.
//!
//! Both strategies share [`crate::components::connected_components`].
//!
//! Modules
//! - [`options`] – configuration types.
//! - `pipeline` – the [`EditDetector`] implementation.
//! - `pixel`, `block` – the two grouping strategies.
//! - [`significance`] – the region scoring formula.

mod block;
pub mod options;
mod pipeline;
mod pixel;
pub mod significance;

pub use options::{DetectionStrategy, EditDetectionOptions};
pub use pipeline::{detect_edit_regions, EditDetector};
pub use significance::compute_significance;

use crate::types::EditRegion;

/// Regions produced by one strategy plus the counts the trace reports.
pub(crate) struct StrategyOutcome {
    pub regions: Vec<EditRegion>,
    /// Pixels over threshold in the whole image.
    pub total_changed: usize,
    /// Components found before size filtering.
    pub raw_components: usize,
}
