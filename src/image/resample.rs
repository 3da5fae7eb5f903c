//! Bring an edited image onto the original's pixel grid.
//!
//! Both detectors compare pixels one-to-one, so an edited image with
//! different dimensions is resampled (Lanczos3) to the original's size before
//! any comparison. The original is never resampled.
use super::ColorImage;
use image::imageops::{self, FilterType};
use log::debug;
use std::borrow::Cow;

/// Two RGB buffers sharing the original image's dimensions.
#[derive(Clone, Debug)]
pub struct AlignedPair<'a> {
    pub width: usize,
    pub height: usize,
    pub original: Cow<'a, [u8]>,
    pub edited: Cow<'a, [u8]>,
    /// True when the edited image had to be resampled.
    pub resampled: bool,
}

impl<'a> AlignedPair<'a> {
    pub fn new(original: ColorImage<'a>, edited: ColorImage<'a>) -> Self {
        let (width, height) = (original.w, original.h);
        let resampled = edited.w != width || edited.h != height;
        let edited_rgb = if resampled {
            debug!(
                "AlignedPair::new resampling edited {}x{} -> {}x{}",
                edited.w, edited.h, width, height
            );
            Cow::Owned(resample_rgb(edited, width, height))
        } else {
            edited.rgb_bytes()
        };
        Self {
            width,
            height,
            original: original.rgb_bytes(),
            edited: edited_rgb,
            resampled,
        }
    }
}

/// Resize to `width × height` with a Lanczos3 kernel, returning packed RGB.
pub fn resample_rgb(image: ColorImage<'_>, width: usize, height: usize) -> Vec<u8> {
    let src = image.to_rgb_image();
    imageops::resize(&src, width as u32, height as u32, FilterType::Lanczos3).into_raw()
}
