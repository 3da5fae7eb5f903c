//! Row access shared by the 8-bit inputs and the f32 change fields.

pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Interleaved samples per pixel in a row slice.
    fn channels(&self) -> usize {
        1
    }

    /// Samples of row `y`, `width() * channels()` long.
    fn row(&self, y: usize) -> &[Self::Pixel];

    fn pixel_count(&self) -> usize {
        self.width() * self.height()
    }
}
