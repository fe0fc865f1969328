/// Cell-centered grid with `n` interior cells per axis and one ghost ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    n: usize,
}

impl Grid {
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "n must be > 0");
        Self { n }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn stride(&self) -> usize {
        self.n + 2
    }

    pub fn size(&self) -> usize {
        self.stride() * self.stride()
    }

    pub fn h(&self) -> f32 {
        1.0 / self.n as f32
    }

    pub fn idx(&self, i: usize, j: usize) -> usize {
        debug_assert!(i <= self.n + 1 && j <= self.n + 1);
        i + self.stride() * j
    }

    pub fn contains_interior(&self, i: i32, j: i32) -> bool {
        let n = self.n as i32;
        (1..=n).contains(&i) && (1..=n).contains(&j)
    }

    pub fn center(&self) -> (f32, f32) {
        let c = self.n as f32 * 0.5 + 1.0;
        (c, c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn idx_is_a_bijection_onto_the_buffer() {
        let grid = Grid::new(5);
        let mut seen = HashSet::new();
        for j in 0..=grid.n() + 1 {
            for i in 0..=grid.n() + 1 {
                let idx = grid.idx(i, j);
                assert!(idx < grid.size());
                assert!(seen.insert(idx), "offset {idx} produced twice");
            }
        }
        assert_eq!(seen.len(), grid.size());
    }

    #[test]
    fn idx_is_column_fastest() {
        let grid = Grid::new(4);
        assert_eq!(grid.idx(1, 0), 1);
        assert_eq!(grid.idx(0, 1), 6);
        assert_eq!(grid.idx(5, 5), 35);
    }

    #[test]
    fn interior_excludes_ghost_ring() {
        let grid = Grid::new(3);
        assert!(grid.contains_interior(1, 1));
        assert!(grid.contains_interior(3, 3));
        assert!(!grid.contains_interior(0, 2));
        assert!(!grid.contains_interior(2, 4));
        assert!(!grid.contains_interior(-1, 1));
    }
}
