//! I/O helpers for color images, change fields and JSON.
//!
//! - `load_color_image`: read a PNG/JPEG/etc. into an owned 8-bit RGB buffer.
//! - `decode_color_image`: same, from encoded bytes already in memory.
//! - `save_change_field_png`: write an `ImageF32` field to a grayscale PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
//!
//! The detectors never touch the filesystem; these helpers exist for the
//! demo binary and for callers that start from files.
use super::{ColorImage, ImageF32, ImageView};
use crate::error::{DetectionError, Result};
use image::{DynamicImage, GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned, tightly packed 8-bit RGB buffer with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct RgbBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbBuffer {
    /// Construct an owned RGB buffer given raw bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrow as a validated `ColorImage` view.
    pub fn as_view(&self) -> Result<ColorImage<'_>> {
        ColorImage::new(self.width, self.height, 3, &self.data)
    }

    fn from_dynamic(img: DynamicImage) -> Self {
        let rgb = img.into_rgb8();
        let width = rgb.width() as usize;
        let height = rgb.height() as usize;
        Self::new(width, height, rgb.into_raw())
    }
}

/// Load an image from disk and convert it to 8-bit RGB (alpha discarded).
pub fn load_color_image(path: &Path) -> Result<RgbBuffer> {
    let bytes = fs::read(path).map_err(|source| DetectionError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| DetectionError::codec(format!("failed to decode {}", path.display()), e))?;
    Ok(RgbBuffer::from_dynamic(img))
}

/// Decode encoded image bytes (PNG, JPEG, WebP) to 8-bit RGB.
///
/// Grayscale, palette and RGBA inputs are all converted to RGB.
pub fn decode_color_image(bytes: &[u8]) -> Result<RgbBuffer> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| DetectionError::codec("failed to decode image bytes", e))?;
    Ok(RgbBuffer::from_dynamic(img))
}

/// Save a change field as a grayscale PNG, mapping `value * scale` from
/// [0, 1] to [0, 255] with clamping.
///
/// Use `scale = 1.0 / 100.0` for Delta-E fields and `1.0` for heatmaps.
pub fn save_change_field_png(field: &ImageF32, scale: f32, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(field.w as u32, field.h as u32);
    for y in 0..field.h {
        let row = field.row(y);
        for (x, &px) in row.iter().enumerate() {
            let v = (px * scale * 255.0).clamp(0.0, 255.0);
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path)
        .map_err(|e| DetectionError::codec(format!("failed to save {}", path.display()), e))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> std::result::Result<(), String> {
    ensure_parent_dir(path).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| DetectionError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn decodes_rgba_png_to_rgb() {
        let mut rgba = RgbaImage::new(3, 2);
        for px in rgba.pixels_mut() {
            px.0 = [10, 20, 30, 40];
        }
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(rgba)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let decoded = decode_color_image(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
        let view = decoded.as_view().unwrap();
        assert_eq!(view.channels, 3);
        assert_eq!(view.rgb(2, 1), [10, 20, 30]);
    }

    #[test]
    fn garbage_bytes_are_a_codec_error() {
        let err = decode_color_image(b"not an image").unwrap_err();
        assert!(matches!(err, DetectionError::Codec { .. }));
        assert!(!err.is_validation());
    }
}
