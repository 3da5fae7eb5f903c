//! Borrowed interleaved 8-bit color buffers (RGB or RGBA).
//!
//! `ColorImage` is the input type of both detectors. Construction validates
//! the channel count and buffer length; alpha is carried along but never
//! read by the comparison code.
use super::ImageView;
use crate::error::{DetectionError, Result};
use image::RgbImage;
use std::borrow::Cow;

#[derive(Clone, Copy, Debug)]
pub struct ColorImage<'a> {
    pub w: usize,
    pub h: usize,
    /// Interleaved channels per pixel, 3 (RGB) or 4 (RGBA).
    pub channels: usize,
    pub data: &'a [u8],
}

impl<'a> ColorImage<'a> {
    /// Wrap a tightly packed buffer of `w × h × channels` bytes.
    pub fn new(w: usize, h: usize, channels: usize, data: &'a [u8]) -> Result<Self> {
        if w == 0 || h == 0 || !(3..=4).contains(&channels) {
            return Err(DetectionError::invalid_shape(&[h, w, channels]));
        }
        let expected = w * h * channels;
        if data.len() != expected {
            return Err(DetectionError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            w,
            h,
            channels,
            data,
        })
    }

    /// Wrap a buffer described by an array shape `[height, width, channels]`.
    ///
    /// Grayscale (`[H, W]`) and any shape that is not three-dimensional are
    /// rejected with [`DetectionError::InvalidShape`].
    pub fn from_shape(shape: &[usize], data: &'a [u8]) -> Result<Self> {
        match *shape {
            [h, w, c] => Self::new(w, h, c, data),
            _ => Err(DetectionError::invalid_shape(shape)),
        }
    }

    /// Array shape `[height, width, channels]`.
    pub fn shape(&self) -> [usize; 3] {
        [self.h, self.w, self.channels]
    }

    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.w + x) * self.channels;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Tightly packed RGB bytes, borrowing when the buffer has no alpha.
    pub fn rgb_bytes(&self) -> Cow<'a, [u8]> {
        if self.channels == 3 {
            return Cow::Borrowed(self.data);
        }
        let mut out = Vec::with_capacity(self.pixel_count() * 3);
        for y in 0..self.h {
            for px in self.row(y).chunks_exact(self.channels) {
                out.extend_from_slice(&px[..3]);
            }
        }
        Cow::Owned(out)
    }

    /// Copy into an owned `image::RgbImage`, dropping alpha.
    pub fn to_rgb_image(&self) -> RgbImage {
        let raw = self.rgb_bytes().into_owned();
        // Dimensions were validated at construction, so the buffer always fits.
        RgbImage::from_raw(self.w as u32, self.h as u32, raw)
            .unwrap_or_else(|| RgbImage::new(self.w as u32, self.h as u32))
    }
}

impl ImageView for ColorImage<'_> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn channels(&self) -> usize {
        self.channels
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let len = self.w * self.channels;
        &self.data[y * len..(y + 1) * len]
    }
}
