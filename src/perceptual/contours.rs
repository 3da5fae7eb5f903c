//! External contours of a binary mask and the polygon measures used to turn
//! them into regions.
//!
//! Border following is delegated to `imageproc` (Suzuki–Abe). The resulting
//! pixel chains are compressed to their direction changes, and all measures
//! below treat a contour as a closed polygon through pixel centres.
use super::morphology::BinaryMask;
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};

pub type Point = (i32, i32);

/// Fraction of the closed perimeter used as Douglas–Peucker tolerance.
pub const SIMPLIFY_EPSILON_FRACTION: f64 = 0.02;

/// Outer borders of the mask's foreground that have no enclosing border.
/// Every boundary pixel of a component appears in its chain, in tracing order.
pub fn external_contours(mask: &BinaryMask) -> Vec<Vec<Point>> {
    if mask.w == 0 || mask.h == 0 {
        return Vec::new();
    }
    let image = GrayImage::from_fn(mask.w as u32, mask.h as u32, |x, y| {
        Luma([if mask.get(x as usize, y as usize) { 255 } else { 0 }])
    });
    find_contours::<i32>(&image)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| c.points.into_iter().map(|p| (p.x, p.y)).collect())
        .filter(|points: &Vec<Point>| !points.is_empty())
        .collect()
}

/// Drop chain points that continue in the same direction as the previous
/// step, keeping only the vertices where the boundary turns.
pub fn compress_chain(points: &[Point]) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let step = |a: Point, b: Point| (b.0 - a.0, b.1 - a.1);
    let kept: Vec<Point> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, points[i]) != step(points[i], next)
        })
        .map(|i| points[i])
        .collect();
    if kept.is_empty() {
        points[..1].to_vec()
    } else {
        kept
    }
}

/// Enclosed area of the closed polygon (absolute shoelace).
pub fn contour_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0f64;
    let mut prev = points[points.len() - 1];
    for &p in points {
        twice += prev.0 as f64 * p.1 as f64 - p.0 as f64 * prev.1 as f64;
        prev = p;
    }
    twice.abs() / 2.0
}

/// Perimeter, including the closing edge when `closed`.
pub fn arc_length(points: &[Point], closed: bool) -> f64 {
    let seg = |a: Point, b: Point| ((b.0 - a.0) as f64).hypot((b.1 - a.1) as f64);
    let open: f64 = points.windows(2).map(|w| seg(w[0], w[1])).sum();
    match (closed, points.first(), points.last()) {
        (true, Some(&first), Some(&last)) if points.len() > 1 => open + seg(last, first),
        _ => open,
    }
}

/// `(x, y, w, h)` of the smallest pixel rectangle holding every point.
pub fn bounding_rect(points: &[Point]) -> (i32, i32, i32, i32) {
    let Some(&(x0, y0)) = points.first() else {
        return (0, 0, 0, 0);
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (x0, y0, x0, y0);
    for &(x, y) in points {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
}

/// Zeroth and first spatial moments of a closed polygon.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    /// Integer centroid, truncated toward zero. `None` for a degenerate polygon.
    pub fn centroid(&self) -> Option<Point> {
        if self.m00 > 0.0 {
            Some(((self.m10 / self.m00) as i32, (self.m01 / self.m00) as i32))
        } else {
            None
        }
    }
}

/// Green's-theorem moments, independent of the traversal direction.
pub fn polygon_moments(points: &[Point]) -> Moments {
    if points.len() < 3 {
        return Moments::default();
    }
    let (mut a00, mut a10, mut a01) = (0.0f64, 0.0f64, 0.0f64);
    let mut prev = points[points.len() - 1];
    for &p in points {
        let (xp, yp) = (prev.0 as f64, prev.1 as f64);
        let (x, y) = (p.0 as f64, p.1 as f64);
        let dxy = xp * y - x * yp;
        a00 += dxy;
        a10 += dxy * (xp + x);
        a01 += dxy * (yp + y);
        prev = p;
    }
    if a00.abs() <= f32::EPSILON as f64 {
        return Moments::default();
    }
    let sign = a00.signum();
    Moments {
        m00: sign * a00 / 2.0,
        m10: sign * a10 / 6.0,
        m01: sign * a01 / 6.0,
    }
}

/// Douglas–Peucker simplification of a closed polygon.
///
/// The curve is split at the vertex farthest from the first one and both
/// halves are simplified independently, so the result always keeps at least
/// those two anchors.
pub fn approx_poly_dp(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let far = (1..n)
        .fold((0usize, -1.0f64), |best, i| {
            let d = dist2(points[0], points[i]);
            if d > best.1 {
                (i, d)
            } else {
                best
            }
        })
        .0;

    // Index `n` stands for point 0 closing the loop.
    let at = |i: usize| points[i % n];
    let mut keep = vec![false; n + 1];
    keep[0] = true;
    keep[far] = true;
    keep[n] = true;

    let mut stack = vec![(0usize, far), (far, n)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let (a, b) = (at(start), at(end));
        let mut max_d = -1.0f64;
        let mut max_i = start;
        for i in start + 1..end {
            let d = line_distance(at(i), a, b);
            if d > max_d {
                max_d = d;
                max_i = i;
            }
        }
        if max_d > epsilon {
            keep[max_i] = true;
            stack.push((max_i, end));
            stack.push((start, max_i));
        }
    }
    (0..n).filter(|&i| keep[i]).map(|i| points[i]).collect()
}

#[inline]
fn dist2(a: Point, b: Point) -> f64 {
    let dx = (b.0 - a.0) as f64;
    let dy = (b.1 - a.1) as f64;
    dx * dx + dy * dy
}

/// Distance from `p` to the infinite line through `a` and `b`.
fn line_distance(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = ((b.0 - a.0) as f64, (b.1 - a.1) as f64);
    let len = dx.hypot(dy);
    if len == 0.0 {
        return dist2(p, a).sqrt();
    }
    (dx * (p.1 - a.1) as f64 - dy * (p.0 - a.0) as f64).abs() / len
}

/// Linear indices of the pixels covered by the filled contour, boundary
/// included, clipped to `width × height`.
pub fn filled_pixels(points: &[Point], width: usize, height: usize) -> Vec<usize> {
    let mut inside = vec![false; width * height];
    let (bx, by, _, bh) = bounding_rect(points);
    let n = points.len();
    let mut crossings: Vec<f64> = Vec::new();

    for y in by.max(0)..(by + bh).min(height as i32) {
        crossings.clear();
        let yf = y as f64;
        for i in 0..n {
            let (x1, y1) = points[i];
            let (x2, y2) = points[(i + 1) % n];
            if y1 == y2 || y < y1.min(y2) || y >= y1.max(y2) {
                continue;
            }
            let t = (yf - y1 as f64) / (y2 - y1) as f64;
            crossings.push(x1 as f64 + t * (x2 - x1) as f64);
        }
        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            let x_start = (pair[0].ceil() as i32).max(bx).max(0);
            let x_end = (pair[1].floor() as i32).min(width as i32 - 1);
            for x in x_start..=x_end {
                inside[y as usize * width + x as usize] = true;
            }
        }
    }
    for i in 0..n {
        for (x, y) in line_pixels(points[i], points[(i + 1) % n]) {
            if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
                inside[y as usize * width + x as usize] = true;
            }
        }
    }
    inside
        .iter()
        .enumerate()
        .filter_map(|(i, &v)| v.then_some(i))
        .collect()
}

/// Bresenham walk from `a` to `b`, both ends included.
fn line_pixels(a: Point, b: Point) -> Vec<Point> {
    let (dx, dy) = ((b.0 - a.0).abs(), -(b.1 - a.1).abs());
    let (sx, sy) = ((b.0 - a.0).signum(), (b.1 - a.1).signum());
    let mut err = dx + dy;
    let (mut x, mut y) = a;
    let mut out = Vec::with_capacity((dx - dy + 1) as usize);
    loop {
        out.push((x, y));
        if (x, y) == b {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    out
}
