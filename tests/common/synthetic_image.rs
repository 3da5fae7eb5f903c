/// Solid packed RGB image.
pub fn solid_rgb(width: usize, height: usize, rgb: [u8; 3]) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    rgb.iter().copied().cycle().take(width * height * 3).collect()
}

/// Solid packed RGBA image.
pub fn solid_rgba(width: usize, height: usize, rgba: [u8; 4]) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    rgba.iter().copied().cycle().take(width * height * 4).collect()
}

/// Paint an axis-aligned rectangle into a packed image with `channels` bytes
/// per pixel. Only the first three channels are written.
pub fn fill_rect(
    img: &mut [u8],
    width: usize,
    channels: usize,
    (x0, y0, w, h): (usize, usize, usize, usize),
    rgb: [u8; 3],
) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            let i = (y * width + x) * channels;
            img[i..i + 3].copy_from_slice(&rgb);
        }
    }
}

/// Deterministic mid-frequency texture, so patches have structure.
pub fn textured_rgb(width: usize, height: usize) -> Vec<u8> {
    let mut img = vec![0u8; width * height * 3];
    for y in 0..height {
        for x in 0..width {
            let i = (y * width + x) * 3;
            let v = (((x / 4) + (y / 4)) % 2) as u8 * 60 + 100;
            img[i] = v;
            img[i + 1] = v.wrapping_add((x % 7) as u8 * 5);
            img[i + 2] = v.wrapping_sub((y % 5) as u8 * 4);
        }
    }
    img
}
