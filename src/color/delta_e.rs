//! Per-pixel Delta-E field between two aligned RGB buffers.
use super::conversion::{delta_e_76, LabConverter};
use crate::image::ImageF32;

/// Compute the CIE76 Delta-E field of two packed RGB buffers of
/// `width × height` pixels. `0` means identical; black against white lands
/// near `100`.
pub fn compute_delta_e(width: usize, height: usize, original: &[u8], edited: &[u8]) -> ImageF32 {
    debug_assert_eq!(original.len(), width * height * 3);
    debug_assert_eq!(edited.len(), width * height * 3);

    let mut field = ImageF32::new(width, height);
    if width == 0 || height == 0 {
        return field;
    }
    let converter = LabConverter::default();
    let row_bytes = width * 3;

    let fill_row = |y: usize, out: &mut [f32]| {
        let a = &original[y * row_bytes..(y + 1) * row_bytes];
        let b = &edited[y * row_bytes..(y + 1) * row_bytes];
        for ((dst, pa), pb) in out.iter_mut().zip(a.chunks_exact(3)).zip(b.chunks_exact(3)) {
            *dst = if pa == pb {
                0.0
            } else {
                delta_e_76(
                    converter.convert([pa[0], pa[1], pa[2]]),
                    converter.convert([pb[0], pb[1], pb[2]]),
                )
            };
        }
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        field
            .data
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, out)| fill_row(y, out));
    }
    #[cfg(not(feature = "parallel"))]
    {
        for (y, out) in field.data.chunks_mut(width).enumerate() {
            fill_row(y, out);
        }
    }

    field
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize, rgb: [u8; 3]) -> Vec<u8> {
        rgb.iter()
            .copied()
            .cycle()
            .take(width * height * 3)
            .collect()
    }

    #[test]
    fn identical_images_have_zero_delta_e() {
        let img = solid(10, 10, [37, 99, 201]);
        let field = compute_delta_e(10, 10, &img, &img);
        assert_eq!((field.w, field.h), (10, 10));
        assert!(field.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn black_vs_white_is_near_one_hundred() {
        let black = solid(8, 4, [0, 0, 0]);
        let white = solid(8, 4, [255, 255, 255]);
        let field = compute_delta_e(8, 4, &black, &white);
        assert!(
            field.data.iter().all(|&v| (90.0..=110.0).contains(&v)),
            "got {:?}",
            &field.data[..4]
        );
    }

    #[test]
    fn constant_colors_give_uniform_field() {
        let a = solid(7, 5, [200, 40, 40]);
        let b = solid(7, 5, [40, 200, 40]);
        let field = compute_delta_e(7, 5, &a, &b);
        let first = field.data[0];
        assert!(first > 50.0, "red vs green should differ strongly, got {first}");
        assert!(field.data.iter().all(|&v| v == first));
    }

    #[test]
    fn similar_colors_have_low_delta_e() {
        let a = solid(4, 4, [100, 100, 100]);
        let b = solid(4, 4, [102, 101, 100]);
        let field = compute_delta_e(4, 4, &a, &b);
        assert!(field.data.iter().all(|&v| v > 0.0 && v < 5.0));
    }
}
