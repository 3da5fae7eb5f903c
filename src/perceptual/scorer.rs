//! Patch scoring backends and the lazily-initialised scorer handle.
//!
//! The heatmap builder treats the scorer as an opaque function from two
//! aligned RGB patches to a dissimilarity in roughly `[0, 1]` (0 = identical).
//! Learned backends such as LPIPS plug in through [`PatchScorer`]; the
//! bundled [`StructuralScorer`] is a deterministic, model-free default.
use crate::error::{DetectionError, Result};
use log::info;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Borrowed square window into a packed RGB image.
#[derive(Clone, Copy, Debug)]
pub struct PatchView<'a> {
    data: &'a [u8],
    image_width: usize,
    pub x: usize,
    pub y: usize,
    pub size: usize,
}

impl<'a> PatchView<'a> {
    /// Window of `size × size` pixels at `(x, y)` of a packed RGB image that
    /// is `image_width` pixels wide.
    pub fn new(data: &'a [u8], image_width: usize, x: usize, y: usize, size: usize) -> Self {
        debug_assert!(x + size <= image_width);
        debug_assert!((y + size) * image_width * 3 <= data.len());
        Self {
            data,
            image_width,
            x,
            y,
            size,
        }
    }

    /// Packed RGB bytes of row `py` inside the patch.
    #[inline]
    pub fn row(&self, py: usize) -> &'a [u8] {
        let start = ((self.y + py) * self.image_width + self.x) * 3;
        &self.data[start..start + self.size * 3]
    }

    #[inline]
    pub fn rgb(&self, px: usize, py: usize) -> [u8; 3] {
        let row = self.row(py);
        [row[px * 3], row[px * 3 + 1], row[px * 3 + 2]]
    }

    /// Byte-wise equality of the two windows.
    pub fn same_pixels(&self, other: &PatchView<'_>) -> bool {
        self.size == other.size && (0..self.size).all(|py| self.row(py) == other.row(py))
    }
}

/// Perceptual dissimilarity between two aligned patches.
///
/// Implementations must be deterministic for identical inputs and safe to
/// call from several threads at once.
pub trait PatchScorer: Send + Sync {
    fn score(&self, original: &PatchView<'_>, edited: &PatchView<'_>) -> Result<f32>;

    /// Short backend name for logs and traces.
    fn name(&self) -> &str {
        "custom"
    }
}

type Loader = Box<dyn Fn() -> Result<Arc<dyn PatchScorer>> + Send + Sync>;

/// Once-initialised, shareable handle to a patch scorer.
///
/// Construction of a backend can be expensive (model weights), so it is
/// deferred until the first patch actually needs scoring and then reused for
/// every later call. Concurrent first calls run the loader once; the others
/// wait for it. A failed load is reported and retried on the next call.
pub struct ScorerHandle {
    cell: OnceLock<Arc<dyn PatchScorer>>,
    init_lock: Mutex<()>,
    loader: Loader,
}

impl ScorerHandle {
    /// Handle that builds its scorer with `loader` on first use.
    pub fn lazy<F>(loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn PatchScorer>> + Send + Sync + 'static,
    {
        Self {
            cell: OnceLock::new(),
            init_lock: Mutex::new(()),
            loader: Box::new(loader),
        }
    }

    /// Handle wrapping an already constructed scorer.
    pub fn ready(scorer: Arc<dyn PatchScorer>) -> Self {
        Self {
            cell: OnceLock::from(Arc::clone(&scorer)),
            init_lock: Mutex::new(()),
            loader: Box::new(move || Ok(Arc::clone(&scorer))),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// The scorer, loading it if this is the first use.
    pub fn get(&self) -> Result<Arc<dyn PatchScorer>> {
        if let Some(scorer) = self.cell.get() {
            return Ok(Arc::clone(scorer));
        }
        // Poisoning only means an earlier loader panicked; the cell is still empty.
        let _guard = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(scorer) = self.cell.get() {
            return Ok(Arc::clone(scorer));
        }
        let loaded = (self.loader)()?;
        let scorer = self.cell.get_or_init(|| loaded);
        info!("ScorerHandle: loaded patch scorer '{}'", scorer.name());
        Ok(Arc::clone(scorer))
    }
}

impl Default for ScorerHandle {
    fn default() -> Self {
        Self::lazy(|| Ok(Arc::new(StructuralScorer::default()) as Arc<dyn PatchScorer>))
    }
}

impl fmt::Debug for ScorerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScorerHandle")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Windowed-SSIM dissimilarity, `1 − mean SSIM` clamped to `[0, 1]`.
///
/// SSIM is evaluated per RGB channel on `window × window` windows placed
/// every `step` pixels and averaged over windows and channels. Identical
/// patches score exactly 0.
#[derive(Clone, Debug)]
pub struct StructuralScorer {
    pub window: usize,
    pub step: usize,
}

impl Default for StructuralScorer {
    fn default() -> Self {
        Self { window: 8, step: 4 }
    }
}

const K1: f64 = 0.01;
const K2: f64 = 0.03;
const DYNAMIC_RANGE: f64 = 255.0;

impl StructuralScorer {
    fn window_ssim(&self, a: &PatchView<'_>, b: &PatchView<'_>, wx: usize, wy: usize, ch: usize) -> f64 {
        let c1 = (K1 * DYNAMIC_RANGE).powi(2);
        let c2 = (K2 * DYNAMIC_RANGE).powi(2);
        let n = (self.window * self.window) as f64;

        let (mut sum_a, mut sum_b) = (0.0f64, 0.0f64);
        for py in wy..wy + self.window {
            let (ra, rb) = (a.row(py), b.row(py));
            for px in wx..wx + self.window {
                sum_a += ra[px * 3 + ch] as f64;
                sum_b += rb[px * 3 + ch] as f64;
            }
        }
        let (mean_a, mean_b) = (sum_a / n, sum_b / n);

        let (mut var_a, mut var_b, mut covar) = (0.0f64, 0.0f64, 0.0f64);
        for py in wy..wy + self.window {
            let (ra, rb) = (a.row(py), b.row(py));
            for px in wx..wx + self.window {
                let da = ra[px * 3 + ch] as f64 - mean_a;
                let db = rb[px * 3 + ch] as f64 - mean_b;
                var_a += da * da;
                var_b += db * db;
                covar += da * db;
            }
        }
        var_a /= n;
        var_b /= n;
        covar /= n;

        let numerator = (2.0 * mean_a * mean_b + c1) * (2.0 * covar + c2);
        let denominator = (mean_a * mean_a + mean_b * mean_b + c1) * (var_a + var_b + c2);
        numerator / denominator
    }
}

impl PatchScorer for StructuralScorer {
    fn score(&self, original: &PatchView<'_>, edited: &PatchView<'_>) -> Result<f32> {
        if original.size != edited.size {
            return Err(DetectionError::scorer(format!(
                "patch sizes differ: {} vs {}",
                original.size, edited.size
            )));
        }
        if original.same_pixels(edited) {
            return Ok(0.0);
        }
        let size = original.size;
        let window = self.window.clamp(1, size.max(1));
        let step = self.step.max(1);
        let scorer = Self { window, step };

        let mut total = 0.0f64;
        let mut count = 0usize;
        let mut wy = 0;
        while wy + window <= size {
            let mut wx = 0;
            while wx + window <= size {
                for ch in 0..3 {
                    total += scorer.window_ssim(original, edited, wx, wy, ch);
                    count += 1;
                }
                wx += step;
            }
            wy += step;
        }
        if count == 0 {
            return Ok(0.0);
        }
        let ssim = total / count as f64;
        Ok((1.0 - ssim).clamp(0.0, 1.0) as f32)
    }

    fn name(&self) -> &str {
        "structural"
    }
}
