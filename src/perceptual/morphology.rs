//! Binary masks and morphological filtering with an elliptical kernel.
//!
//! Opening (erode, then dilate) removes specks smaller than the kernel;
//! closing (dilate, then erode) fills small holes. Erosion treats pixels
//! outside the image as set and dilation treats them as unset, so regions
//! touching the border are not eaten away from outside.

/// Row-major boolean mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMask {
    pub w: usize,
    pub h: usize,
    pub data: Vec<bool>,
}

impl BinaryMask {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![false; w * h],
        }
    }

    /// Mask of pixels where `predicate(value)` holds.
    pub fn from_field<F: Fn(f32) -> bool>(field: &crate::image::ImageF32, predicate: F) -> Self {
        let mut data = Vec::with_capacity(field.w * field.h);
        for y in 0..field.h {
            let row = &field.data[y * field.stride..y * field.stride + field.w];
            data.extend(row.iter().map(|&v| predicate(v)));
        }
        Self {
            w: field.w,
            h: field.h,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: bool) {
        self.data[y * self.w + x] = v;
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Running count of set pixels per row, `w + 1` entries per row.
    fn row_prefix(&self) -> Vec<u32> {
        let stride = self.w + 1;
        let mut prefix = vec![0u32; stride * self.h];
        for y in 0..self.h {
            let row = &self.data[y * self.w..(y + 1) * self.w];
            let out = &mut prefix[y * stride..(y + 1) * stride];
            for (x, &v) in row.iter().enumerate() {
                out[x + 1] = out[x] + v as u32;
            }
        }
        prefix
    }
}

/// Square structuring element stored as one column run per row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuringElement {
    size: usize,
    anchor: (usize, usize),
    /// Half-open `[j1, j2)` column run per kernel row; `None` for empty rows.
    runs: Vec<Option<(usize, usize)>>,
}

impl StructuringElement {
    /// Ellipse inscribed in a `size × size` box, anchored at its centre.
    pub fn ellipse(size: usize) -> Self {
        let r = (size / 2) as f64;
        let c = size / 2;
        let inv_r2 = if r > 0.0 { 1.0 / (r * r) } else { 0.0 };
        let runs = (0..size)
            .map(|i| {
                let dy = i as f64 - r;
                if dy.abs() > r {
                    return None;
                }
                let dx = (r * ((r * r - dy * dy) * inv_r2).sqrt()).round_ties_even() as usize;
                let j1 = c.saturating_sub(dx);
                let j2 = (c + dx + 1).min(size);
                (j1 < j2).then_some((j1, j2))
            })
            .collect();
        Self {
            size,
            anchor: (c, c),
            runs,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, col: usize, row: usize) -> bool {
        matches!(self.runs.get(row), Some(Some((j1, j2))) if (*j1..*j2).contains(&col))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum MorphOp {
    Erode,
    Dilate,
}

fn apply(mask: &BinaryMask, kernel: &StructuringElement, op: MorphOp) -> BinaryMask {
    let (w, h) = (mask.w, mask.h);
    let mut out = BinaryMask::new(w, h);
    if w == 0 || h == 0 || kernel.size == 0 {
        out.data.copy_from_slice(&mask.data);
        return out;
    }
    let prefix = mask.row_prefix();
    let stride = w + 1;
    let (ax, ay) = (kernel.anchor.0 as isize, kernel.anchor.1 as isize);

    for y in 0..h {
        for x in 0..w {
            let mut value = op == MorphOp::Erode;
            for (i, run) in kernel.runs.iter().enumerate() {
                let Some((j1, j2)) = *run else { continue };
                let yy = y as isize + i as isize - ay;
                if yy < 0 || yy >= h as isize {
                    continue;
                }
                let lo = (x as isize + j1 as isize - ax).clamp(0, w as isize) as usize;
                let hi = (x as isize + j2 as isize - ax).clamp(0, w as isize) as usize;
                if lo >= hi {
                    continue;
                }
                let base = yy as usize * stride;
                let set = (prefix[base + hi] - prefix[base + lo]) as usize;
                match op {
                    MorphOp::Erode if set < hi - lo => {
                        value = false;
                        break;
                    }
                    MorphOp::Dilate if set > 0 => {
                        value = true;
                        break;
                    }
                    _ => {}
                }
            }
            out.data[y * w + x] = value;
        }
    }
    out
}

pub fn erode(mask: &BinaryMask, kernel: &StructuringElement) -> BinaryMask {
    apply(mask, kernel, MorphOp::Erode)
}

pub fn dilate(mask: &BinaryMask, kernel: &StructuringElement) -> BinaryMask {
    apply(mask, kernel, MorphOp::Dilate)
}

/// Erode then dilate.
pub fn open(mask: &BinaryMask, kernel: &StructuringElement) -> BinaryMask {
    dilate(&erode(mask, kernel), kernel)
}

/// Dilate then erode.
pub fn close(mask: &BinaryMask, kernel: &StructuringElement) -> BinaryMask {
    erode(&dilate(mask, kernel), kernel)
}
