//! sRGB → linear → CIE XYZ (D65) → CIE Lab.
//!
//! Exact textbook formulas; tests pin numeric tolerances against them, so
//! no approximations beyond f32 arithmetic.
use nalgebra::{Matrix3, Vector3};
use std::sync::OnceLock;

/// Encoded values at or below this (normalized) threshold use the linear segment.
pub const SRGB_LINEAR_THRESHOLD: f32 = 0.04045;
/// D65 reference white, X component.
pub const D65_WHITE_X: f32 = 0.95047;
/// D65 reference white, Z component (Y is 1.0).
pub const D65_WHITE_Z: f32 = 1.08883;
/// Lab transfer-function breakpoint, (6/29)^3.
pub const LAB_EPSILON: f32 = 0.008856;
/// Slope of the linear Lab segment, (29/6)^2 / 3.
pub const LAB_KAPPA: f32 = 7.787;

static SRGB_TO_LINEAR_LUT: OnceLock<[f32; 256]> = OnceLock::new();

fn srgb_lut() -> &'static [f32; 256] {
    SRGB_TO_LINEAR_LUT.get_or_init(|| {
        let mut lut = [0.0f32; 256];
        for (i, v) in lut.iter_mut().enumerate() {
            let c = i as f32 / 255.0;
            *v = if c <= SRGB_LINEAR_THRESHOLD {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            };
        }
        lut
    })
}

/// Decode one 8-bit sRGB channel to linear light in [0, 1].
#[inline]
pub fn srgb_to_linear(c: u8) -> f32 {
    srgb_lut()[c as usize]
}

/// Linear RGB → XYZ matrix for the sRGB primaries under D65.
pub fn rgb_to_xyz_matrix() -> Matrix3<f32> {
    Matrix3::new(
        0.4124, 0.3576, 0.1805, //
        0.2126, 0.7152, 0.0722, //
        0.0193, 0.1192, 0.9505,
    )
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_KAPPA * t + 16.0 / 116.0
    }
}

/// Converts 8-bit sRGB triplets to Lab with a shared XYZ matrix.
#[derive(Clone, Debug)]
pub struct LabConverter {
    xyz: Matrix3<f32>,
}

impl Default for LabConverter {
    fn default() -> Self {
        Self {
            xyz: rgb_to_xyz_matrix(),
        }
    }
}

impl LabConverter {
    #[inline]
    pub fn convert(&self, rgb: [u8; 3]) -> [f32; 3] {
        let lut = srgb_lut();
        let linear = Vector3::new(
            lut[rgb[0] as usize],
            lut[rgb[1] as usize],
            lut[rgb[2] as usize],
        );
        let xyz = self.xyz * linear;
        let fx = lab_f(xyz.x / D65_WHITE_X);
        let fy = lab_f(xyz.y);
        let fz = lab_f(xyz.z / D65_WHITE_Z);
        [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
    }
}

/// Convert a single 8-bit sRGB triplet to CIE Lab `[L, a, b]`.
pub fn rgb_to_lab(rgb: [u8; 3]) -> [f32; 3] {
    LabConverter::default().convert(rgb)
}

/// CIE76 color difference: Euclidean distance between two Lab triplets.
#[inline]
pub fn delta_e_76(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dl = a[0] - b[0];
    let da = a[1] - b[1];
    let db = a[2] - b[2];
    (dl * dl + da * da + db * db).sqrt()
}
