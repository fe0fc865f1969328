use crate::grid::Grid;

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    grid: Grid,
    data: Vec<f32>,
}

impl Field {
    pub fn new(grid: Grid, fill: f32) -> Self {
        let data = vec![fill; grid.size()];
        Self { grid, data }
    }

    pub fn from_fn(grid: Grid, f: impl Fn(usize, usize) -> f32) -> Self {
        let stride = grid.stride();
        let data = (0..grid.size())
            .map(|idx| {
                let i = idx % stride;
                let j = idx / stride;
                f(i, j)
            })
            .collect();
        Self { grid, data }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[self.grid.idx(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f32) {
        let idx = self.grid.idx(i, j);
        self.data[idx] = value;
    }

    pub fn add(&mut self, i: usize, j: usize, amount: f32) {
        let idx = self.grid.idx(i, j);
        self.data[idx] += amount;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    pub fn add_scaled_in_place(&mut self, other: &Self, scale: f32) {
        self.assert_same_grid(other);
        for (value, other_value) in self.data.iter_mut().zip(other.data.iter()) {
            *value += other_value * scale;
        }
    }

    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    pub fn max_abs(&self) -> f32 {
        self.data.iter().fold(0.0, |acc, value| acc.max(value.abs()))
    }

    pub fn interior_sum(&self) -> f32 {
        self.interior_values().sum()
    }

    pub fn interior_abs_sum(&self) -> f32 {
        self.interior_values().map(f32::abs).sum()
    }

    fn interior_values(&self) -> impl Iterator<Item = f32> + '_ {
        let n = self.grid.n();
        (1..=n).flat_map(move |j| (1..=n).map(move |i| self.get(i, j)))
    }

    fn assert_same_grid(&self, other: &Self) {
        assert_eq!(self.grid, other.grid, "field grid mismatch");
    }
}
