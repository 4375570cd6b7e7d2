//! Per-atom Verlet neighbor list with displacement-based rebuild trigger.
//!
//! Stored CSR-style (`start`/`end` index into a flat `list`) rather than as
//! a `Vec<Vec<usize>>` per atom, avoiding one allocation per atom per
//! rebuild. By convention each unordered pair `(i, j)` is recorded once,
//! filed under the lower atom index, so iterating `i in 0..n` and then
//! `neighbors_of(i)` visits every pair exactly once.

#[derive(Debug, Clone, Default)]
pub struct NeighborList {
    start: Vec<usize>,
    end: Vec<usize>,
    list: Vec<usize>,
    saved_x: Vec<f64>,
    saved_y: Vec<f64>,
    building: Vec<Vec<usize>>,
    max_displacement: f64,
}

impl NeighborList {
    pub fn new() -> Self {
        Self::default()
    }

    /// The skin-width rebuild threshold: `min` over in-use element pairs of
    /// `(cutoffList - cutoff) * sigma_ij`.
    pub fn set_max_displacement(&mut self, max_displacement: f64) {
        self.max_displacement = max_displacement;
    }

    /// Snapshot one atom's position at build time, for the displacement
    /// check in `should_update`.
    pub fn save_atom_position(&mut self, i: usize, x: f64, y: f64) {
        if i >= self.saved_x.len() {
            self.saved_x.resize(i + 1, 0.0);
            self.saved_y.resize(i + 1, 0.0);
        }
        self.saved_x[i] = x;
        self.saved_y[i] = y;
    }

    /// True when any atom has moved more than half the skin width since its
    /// last saved position. Guarantees no pair within the LJ cutoff can
    /// have been missed: two atoms both drifting by up to half the skin
    /// width can together close at most the full skin width before the
    /// next rebuild is triggered.
    pub fn should_update(&self, x: &[f64], y: &[f64]) -> bool {
        if self.max_displacement <= 0.0 {
            return true;
        }
        let half = self.max_displacement * 0.5;
        let half_sq = half * half;
        for i in 0..x.len() {
            let dx = x[i] - self.saved_x.get(i).copied().unwrap_or(x[i]);
            let dy = y[i] - self.saved_y.get(i).copied().unwrap_or(y[i]);
            if dx * dx + dy * dy > half_sq {
                return true;
            }
        }
        false
    }

    /// Start a rebuild for `n` atoms, discarding the previous list.
    pub fn begin_rebuild(&mut self, n: usize) {
        self.building = vec![Vec::new(); n];
    }

    /// Record unordered pair `(i, j)` under the lower index. No-op on
    /// self-pairs.
    pub fn mark_neighbors(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        self.building[lo].push(hi);
    }

    /// Flatten the per-atom staging lists built by `mark_neighbors` into
    /// the CSR representation used by the force loop.
    pub fn finish_rebuild(&mut self, n: usize) {
        self.start = vec![0; n];
        self.end = vec![0; n];
        self.list = Vec::with_capacity(self.building.iter().map(Vec::len).sum());
        for i in 0..n {
            self.start[i] = self.list.len();
            self.list.extend_from_slice(&self.building[i]);
            self.end[i] = self.list.len();
        }
        self.building = Vec::new();
    }

    pub fn get_start_idx_for(&self, i: usize) -> usize {
        self.start.get(i).copied().unwrap_or(0)
    }

    pub fn get_end_idx_for(&self, i: usize) -> usize {
        self.end.get(i).copied().unwrap_or(0)
    }

    pub fn get_list(&self) -> &[usize] {
        &self.list
    }

    pub fn neighbors_of(&self, i: usize) -> &[usize] {
        &self.list[self.get_start_idx_for(i)..self.get_end_idx_for(i)]
    }

    /// All Verlet partners of `i` in either direction: atoms filed under
    /// `i` (index > i) unioned with atoms `< i` whose own list contains
    /// `i`. Query-only; not on the per-step force path.
    pub fn atom_neighbors(&self, i: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self.neighbors_of(i).to_vec();
        for lower in 0..i.min(self.start.len()) {
            if self.neighbors_of(lower).contains(&i) {
                out.push(lower);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_pair_is_visited_once() {
        let mut list = NeighborList::new();
        list.begin_rebuild(4);
        list.mark_neighbors(0, 2);
        list.mark_neighbors(2, 0); // duplicate, opposite order
        list.mark_neighbors(1, 3);
        list.finish_rebuild(4);

        let mut pairs = Vec::new();
        for i in 0..4 {
            for &j in list.neighbors_of(i) {
                pairs.push((i, j));
            }
        }
        assert_eq!(pairs.len(), 2, "duplicate opposite-order pair must collapse");
    }

    #[test]
    fn should_update_after_exceeding_half_skin_width() {
        let mut list = NeighborList::new();
        list.set_max_displacement(0.1);
        list.save_atom_position(0, 0.0, 0.0);
        assert!(!list.should_update(&[0.01], &[0.0]));
        assert!(list.should_update(&[0.2], &[0.0]));
    }

    #[test]
    fn atom_neighbors_is_symmetric_query() {
        let mut list = NeighborList::new();
        list.begin_rebuild(3);
        list.mark_neighbors(0, 2);
        list.finish_rebuild(3);
        assert_eq!(list.atom_neighbors(0), vec![2]);
        assert_eq!(list.atom_neighbors(2), vec![0]);
    }
}
