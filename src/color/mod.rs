//! Color science: sRGB to CIE Lab conversion and the per-pixel Delta-E field.
//!
//! The pipeline is sRGB (8-bit) → linear light (piecewise transfer, LUT) →
//! CIE XYZ under the D65 white → CIE Lab (piecewise cube root) → CIE76
//! Euclidean distance.

pub mod conversion;
pub mod delta_e;

pub use conversion::{delta_e_76, rgb_to_lab, srgb_to_linear, LabConverter};
pub use delta_e::compute_delta_e;
