//! Uniform spatial hash over the simulation domain, used to drive the
//! short-range force loop and to seed Verlet neighbor-list rebuilds.

/// A uniform grid of buckets covering `[0, lx] x [0, ly]`. Cell side is
/// always `>= max_cutoff` over the in-use element pairs.
#[derive(Debug, Clone)]
pub struct CellList {
    rows: usize,
    cols: usize,
    cell_w: f64,
    cell_h: f64,
    lx: f64,
    ly: f64,
    buckets: Vec<Vec<usize>>,
}

impl CellList {
    /// Build a grid over `[0, lx] x [0, ly]` with cell side `>= max_cutoff`.
    pub fn new(lx: f64, ly: f64, max_cutoff: f64) -> Self {
        let mut grid = Self {
            rows: 1,
            cols: 1,
            cell_w: lx,
            cell_h: ly,
            lx,
            ly,
            buckets: Vec::new(),
        };
        grid.reinitialize(lx, ly, max_cutoff);
        grid
    }

    /// Resize the grid, e.g. because the set of in-use elements (and hence
    /// `max_cutoff`) changed. Existing bucket contents are discarded; the
    /// caller is expected to re-populate via `add_to_cell` afterward.
    pub fn reinitialize(&mut self, lx: f64, ly: f64, max_cutoff: f64) {
        let side = max_cutoff.max(1e-6);
        self.cols = ((lx / side).floor() as usize).max(1);
        self.rows = ((ly / side).floor() as usize).max(1);
        self.cell_w = lx / self.cols as f64;
        self.cell_h = ly / self.rows as f64;
        self.lx = lx;
        self.ly = ly;
        self.buckets = vec![Vec::new(); self.rows * self.cols];
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Empty every bucket without changing the grid's shape.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    fn cell_of(&self, x: f64, y: f64) -> (usize, usize) {
        let col = ((x / self.cell_w) as isize).clamp(0, self.cols as isize - 1) as usize;
        let row = ((y / self.cell_h) as isize).clamp(0, self.rows as isize - 1) as usize;
        (row, col)
    }

    /// Append `atom` to the bucket owning position `(x, y)`.
    pub fn add_to_cell(&mut self, atom: usize, x: f64, y: f64) {
        let (row, col) = self.cell_of(x, y);
        self.buckets[row * self.cols + col].push(atom);
    }

    /// Atom indices in the bucket at flat index `idx = row*cols + col`.
    pub fn get_cell(&self, idx: usize) -> &[usize] {
        &self.buckets[idx]
    }

    pub fn num_cells(&self) -> usize {
        self.rows * self.cols
    }

    /// The half-stencil of cells whose pairs with `(row, col)` have not yet
    /// been visited by a row-major traversal: right, and the three cells in
    /// the row below. The cell itself is not included here; same-cell pairs
    /// are handled by the caller directly.
    pub fn get_neighboring_cells(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        let offsets: [(isize, isize); 4] = [(0, 1), (1, -1), (1, 0), (1, 1)];
        let mut out = Vec::with_capacity(4);
        for (dr, dc) in offsets {
            let nr = row as isize + dr;
            let nc = col as isize + dc;
            if nr >= 0 && nr < self.rows as isize && nc >= 0 && nc < self.cols as isize {
                out.push((nr as usize, nc as usize));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_cover_the_whole_domain() {
        let mut grid = CellList::new(10.0, 10.0, 2.0);
        grid.add_to_cell(0, 0.0, 0.0);
        grid.add_to_cell(1, 9.999, 9.999);
        assert_eq!(grid.get_cell(0), &[0]);
        let last = grid.num_cells() - 1;
        assert_eq!(grid.get_cell(last), &[1]);
    }

    #[test]
    fn half_stencil_stays_in_bounds() {
        let grid = CellList::new(10.0, 10.0, 2.0);
        let last_row = grid.rows() - 1;
        let last_col = grid.cols() - 1;
        for (r, c) in grid.get_neighboring_cells(last_row, last_col) {
            assert!(r < grid.rows());
            assert!(c < grid.cols());
        }
    }

    #[test]
    fn clear_empties_all_buckets() {
        let mut grid = CellList::new(10.0, 10.0, 2.0);
        grid.add_to_cell(0, 1.0, 1.0);
        grid.clear();
        for idx in 0..grid.num_cells() {
            assert!(grid.get_cell(idx).is_empty());
        }
    }
}
