//! Configuration of [`QTable`](super::QTable).
use anyhow::Result;
use labyrinth_core::util::{check_positive, check_unit_interval};
use serde::{Deserialize, Serialize};

/// Configuration of [`QTable`](super::QTable).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct QTableConfig {
    /// Number of states.
    pub n_states: usize,

    /// Number of actions.
    pub n_actions: usize,

    /// Step size `alpha` of the update.
    pub learning_rate: f64,

    /// Discount factor `gamma`.
    pub discount_factor: f64,
}

impl Default for QTableConfig {
    fn default() -> Self {
        Self {
            n_states: 0,
            n_actions: 4,
            learning_rate: 0.1,
            discount_factor: 0.9,
        }
    }
}

impl QTableConfig {
    /// Sets the number of states.
    pub fn n_states(mut self, v: usize) -> Self {
        self.n_states = v;
        self
    }

    /// Sets the number of actions.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }

    /// Sets the learning rate.
    pub fn learning_rate(mut self, v: f64) -> Self {
        self.learning_rate = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Checks the shape of the table and the ranges of the coefficients.
    pub fn validate(&self) -> Result<()> {
        check_positive("n_states", self.n_states)?;
        check_positive("n_actions", self.n_actions)?;
        check_unit_interval("learning_rate", self.learning_rate)?;
        check_unit_interval("discount_factor", self.discount_factor)?;
        Ok(())
    }
}
