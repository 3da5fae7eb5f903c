//! Sparse-to-dense interpolation of patch scores.
//!
//! Patch centres always form a rectilinear lattice, so the smooth path is a
//! separable natural cubic spline: one spline along x per lattice row, then
//! one along y per pixel column. Pixels outside the lattice's bounding
//! rectangle (its convex hull) are set to 0.
use crate::image::ImageF32;
use log::debug;

/// One scored patch, positioned at its centre pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatchSample {
    pub x: usize,
    pub y: usize,
    pub score: f32,
}

/// Which interpolation path [`interpolate_samples`] took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpolationMode {
    Empty,
    Uniform,
    Nearest,
    Cubic,
}

/// Densify `samples` onto a `width × height` grid.
///
/// 0 samples give zeros, 1 sample a uniform fill, 2–3 samples (or samples
/// that do not span a 2-D lattice) nearest-neighbour, otherwise cubic.
/// Non-finite outputs become 0 and negative overshoot is clamped to 0.
pub fn interpolate_samples(samples: &[PatchSample], width: usize, height: usize) -> (ImageF32, InterpolationMode) {
    let samples: Vec<PatchSample> = samples
        .iter()
        .map(|s| PatchSample {
            score: sanitize(s.score),
            ..*s
        })
        .collect();

    let (mut field, mode) = match samples.len() {
        0 => (ImageF32::new(width, height), InterpolationMode::Empty),
        1 => (
            ImageF32::filled(width, height, samples[0].score),
            InterpolationMode::Uniform,
        ),
        2 | 3 => (nearest(&samples, width, height), InterpolationMode::Nearest),
        _ => match Lattice::from_samples(&samples) {
            Some(lattice) => (lattice.cubic(width, height), InterpolationMode::Cubic),
            None => {
                debug!(
                    "interpolate_samples: {} samples do not span a lattice, using nearest",
                    samples.len()
                );
                (nearest(&samples, width, height), InterpolationMode::Nearest)
            }
        },
    };
    for v in field.data.iter_mut() {
        *v = sanitize(*v);
    }
    (field, mode)
}

#[inline]
fn sanitize(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

/// Nearest sample by Euclidean distance; ties go to the earlier sample.
fn nearest(samples: &[PatchSample], width: usize, height: usize) -> ImageF32 {
    let mut out = ImageF32::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut best = f64::INFINITY;
            let mut value = 0.0f32;
            for s in samples {
                let dx = x as f64 - s.x as f64;
                let dy = y as f64 - s.y as f64;
                let d2 = dx * dx + dy * dy;
                if d2 < best {
                    best = d2;
                    value = s.score;
                }
            }
            out.set(x, y, value);
        }
    }
    out
}

/// Samples arranged on the full product of their distinct x and y positions.
struct Lattice {
    xs: Vec<usize>,
    ys: Vec<usize>,
    /// Row-major `ys.len() × xs.len()` scores.
    values: Vec<f64>,
}

impl Lattice {
    fn from_samples(samples: &[PatchSample]) -> Option<Self> {
        let mut xs: Vec<usize> = samples.iter().map(|s| s.x).collect();
        let mut ys: Vec<usize> = samples.iter().map(|s| s.y).collect();
        xs.sort_unstable();
        xs.dedup();
        ys.sort_unstable();
        ys.dedup();
        if xs.len() < 2 || ys.len() < 2 || xs.len() * ys.len() != samples.len() {
            return None;
        }
        let mut values = vec![f64::NAN; xs.len() * ys.len()];
        for s in samples {
            let i = xs.binary_search(&s.x).ok()?;
            let j = ys.binary_search(&s.y).ok()?;
            values[j * xs.len() + i] = s.score as f64;
        }
        if values.iter().any(|v| v.is_nan()) {
            return None;
        }
        Some(Self { xs, ys, values })
    }

    fn cubic(&self, width: usize, height: usize) -> ImageF32 {
        let mut out = ImageF32::new(width, height);
        let nx = self.xs.len();
        let x0 = self.xs[0];
        let x1 = self.xs[nx - 1].min(width.saturating_sub(1));
        let y0 = self.ys[0];
        let y1 = self.ys[self.ys.len() - 1].min(height.saturating_sub(1));
        if x0 > x1 || y0 > y1 {
            return out;
        }
        let span = x1 - x0 + 1;
        let knots_x: Vec<f64> = self.xs.iter().map(|&x| x as f64).collect();
        let knots_y: Vec<f64> = self.ys.iter().map(|&y| y as f64).collect();

        // Pass 1: along x for every lattice row.
        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(self.ys.len());
        for j in 0..self.ys.len() {
            let spline = NaturalSpline::fit(&knots_x, &self.values[j * nx..(j + 1) * nx]);
            rows.push((x0..=x1).map(|x| spline.eval(x as f64)).collect());
        }

        // Pass 2: along y for every pixel column inside the lattice.
        let mut column = vec![0.0f64; self.ys.len()];
        for xi in 0..span {
            for (j, row) in rows.iter().enumerate() {
                column[j] = row[xi];
            }
            let spline = NaturalSpline::fit(&knots_y, &column);
            for y in y0..=y1 {
                out.set(x0 + xi, y, spline.eval(y as f64) as f32);
            }
        }
        out
    }
}

/// Natural cubic spline (zero second derivative at both ends).
struct NaturalSpline<'a> {
    knots: &'a [f64],
    values: Vec<f64>,
    /// Second derivatives at the knots.
    m: Vec<f64>,
}

impl<'a> NaturalSpline<'a> {
    fn fit(knots: &'a [f64], values: &[f64]) -> Self {
        let n = knots.len();
        let mut m = vec![0.0f64; n];
        if n > 2 {
            // Tridiagonal system for m[1..n-1], solved with the Thomas algorithm.
            let inner = n - 2;
            let mut diag = vec![0.0f64; inner];
            let mut upper = vec![0.0f64; inner];
            let mut rhs = vec![0.0f64; inner];
            for k in 0..inner {
                let i = k + 1;
                let h0 = knots[i] - knots[i - 1];
                let h1 = knots[i + 1] - knots[i];
                diag[k] = 2.0 * (h0 + h1);
                upper[k] = h1;
                rhs[k] = 6.0 * ((values[i + 1] - values[i]) / h1 - (values[i] - values[i - 1]) / h0);
            }
            for k in 1..inner {
                let lower = knots[k + 1] - knots[k];
                let w = lower / diag[k - 1];
                diag[k] -= w * upper[k - 1];
                rhs[k] -= w * rhs[k - 1];
            }
            m[inner] = rhs[inner - 1] / diag[inner - 1];
            for k in (0..inner - 1).rev() {
                m[k + 1] = (rhs[k] - upper[k] * m[k + 2]) / diag[k];
            }
        }
        Self {
            knots,
            values: values.to_vec(),
            m,
        }
    }

    fn eval(&self, t: f64) -> f64 {
        let n = self.knots.len();
        let k = match self.knots.partition_point(|&knot| knot <= t) {
            0 => 0,
            p => (p - 1).min(n - 2),
        };
        let (ta, tb) = (self.knots[k], self.knots[k + 1]);
        let h = tb - ta;
        let (a, b) = (tb - t, t - ta);
        self.m[k] * a * a * a / (6.0 * h)
            + self.m[k + 1] * b * b * b / (6.0 * h)
            + (self.values[k] / h - self.m[k] * h / 6.0) * a
            + (self.values[k + 1] / h - self.m[k + 1] * h / 6.0) * b
    }
}
