//! Observation of [`GridEnv`](crate::GridEnv).
use labyrinth_core::{DiscreteObs, FeatureObs, Obs};

/// Position of the agent on a grid of known shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridObs {
    row: usize,
    col: usize,
    n_rows: usize,
    n_cols: usize,
}

impl GridObs {
    /// Constructs an observation.
    pub fn new(row: usize, col: usize, n_rows: usize, n_cols: usize) -> Self {
        Self {
            row,
            col,
            n_rows,
            n_cols,
        }
    }

    /// Row of the agent.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Column of the agent.
    pub fn col(&self) -> usize {
        self.col
    }

    /// `(row, col)` of the agent.
    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }
}

impl Obs for GridObs {}

impl DiscreteObs for GridObs {
    /// `row * n_cols + col`.
    fn index(&self) -> usize {
        self.row * self.n_cols + self.col
    }
}

impl FeatureObs for GridObs {
    /// One-hot encoding of the position over the flattened grid.
    fn features(&self) -> Vec<f32> {
        let mut v = vec![0f32; self.n_rows * self.n_cols];
        v[self.index()] = 1.0;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_state_index_is_bijective() {
        let (n_rows, n_cols) = (3, 5);
        let ixs: HashSet<usize> = (0..n_rows)
            .flat_map(|i| (0..n_cols).map(move |j| GridObs::new(i, j, n_rows, n_cols).index()))
            .collect();
        assert_eq!(ixs, (0..n_rows * n_cols).collect::<HashSet<_>>());
    }

    #[test]
    fn test_one_hot_features() {
        let obs = GridObs::new(1, 2, 3, 4);
        let v = obs.features();
        assert_eq!(v.len(), 12);
        assert_eq!(v.iter().filter(|x| **x == 1.0).count(), 1);
        assert_eq!(v[6], 1.0);
        assert_eq!(v.iter().sum::<f32>(), 1.0);
    }
}
