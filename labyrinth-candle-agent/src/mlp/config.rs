use anyhow::Result;
use labyrinth_core::util::check_positive;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Mlp`](super::Mlp).
pub struct MlpConfig {
    pub(super) in_dim: usize,
    pub(super) units: Vec<usize>,
    pub(super) out_dim: usize,
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self {
            in_dim: 0,
            units: vec![24, 24],
            out_dim: 4,
        }
    }
}

impl MlpConfig {
    /// Creates configuration of MLP.
    ///
    /// * `units` - Numbers of units of the hidden layers.
    pub fn new(in_dim: usize, units: Vec<usize>, out_dim: usize) -> Self {
        Self {
            in_dim,
            units,
            out_dim,
        }
    }

    /// Sets the input dimension.
    pub fn in_dim(mut self, v: usize) -> Self {
        self.in_dim = v;
        self
    }

    /// Sets the numbers of units of the hidden layers.
    pub fn units(mut self, v: Vec<usize>) -> Self {
        self.units = v;
        self
    }

    /// Sets the output dimension.
    pub fn out_dim(mut self, v: usize) -> Self {
        self.out_dim = v;
        self
    }

    /// Returns the input dimension.
    pub fn get_in_dim(&self) -> usize {
        self.in_dim
    }

    /// Returns the output dimension.
    pub fn get_out_dim(&self) -> usize {
        self.out_dim
    }

    /// Checks that all dimensions are positive.
    pub fn validate(&self) -> Result<()> {
        check_positive("in_dim", self.in_dim)?;
        check_positive("out_dim", self.out_dim)?;
        for &u in self.units.iter() {
            check_positive("units", u)?;
        }
        Ok(())
    }
}
