//! 4-connected component labeling over an arbitrary cell grid.
//!
//! One routine serves both deterministic strategies: the pixel strategy runs
//! it over the image grid with "Delta-E above threshold" as the predicate,
//! the block strategy over the block grid with "block density above
//! minimum". Growth uses an explicit stack, so a component covering the whole
//! frame cannot exhaust the call stack.

const NEIGH_OFFSETS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A connected set of cells with its bounding box in grid coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    /// Linear indices (`y * width + x`) of the member cells.
    pub cells: Vec<usize>,
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl Component {
    fn seeded(idx: usize, x: usize, y: usize) -> Self {
        Self {
            cells: vec![idx],
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn push(&mut self, idx: usize, x: usize, y: usize) {
        self.cells.push(idx);
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bounding box width in cells (inclusive extent).
    pub fn bbox_width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    /// Bounding box height in cells (inclusive extent).
    pub fn bbox_height(&self) -> usize {
        self.max_y - self.min_y + 1
    }
}

/// Find all 4-connected components of cells for which `is_set(idx)` holds.
///
/// Components are returned in discovery order: the order of their first cell
/// in a row-major scan. The result is fully deterministic.
pub fn connected_components<F>(width: usize, height: usize, is_set: F) -> Vec<Component>
where
    F: Fn(usize) -> bool,
{
    let total = width * height;
    let mut visited = vec![false; total];
    let mut stack: Vec<usize> = Vec::with_capacity(64);
    let mut components = Vec::new();

    for seed in 0..total {
        if visited[seed] || !is_set(seed) {
            continue;
        }
        visited[seed] = true;
        stack.clear();
        stack.push(seed);
        let mut component = Component::seeded(seed, seed % width, seed / width);

        while let Some(idx) = stack.pop() {
            let x = idx % width;
            let y = idx / width;
            if idx != seed {
                component.push(idx, x, y);
            }
            for (dx, dy) in NEIGH_OFFSETS {
                let xn = x as isize + dx;
                let yn = y as isize + dy;
                if xn < 0 || yn < 0 || xn >= width as isize || yn >= height as isize {
                    continue;
                }
                let neighbor = yn as usize * width + xn as usize;
                if visited[neighbor] || !is_set(neighbor) {
                    continue;
                }
                visited[neighbor] = true;
                stack.push(neighbor);
            }
        }
        components.push(component);
    }

    components
}
