//! Configuration of [`SimpleReplayBuffer`](super::SimpleReplayBuffer).
use crate::util::check_positive;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Configuration of [`SimpleReplayBuffer`](super::SimpleReplayBuffer).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SimpleReplayBufferConfig {
    pub(super) capacity: usize,
    pub(super) seed: u64,
}

impl Default for SimpleReplayBufferConfig {
    fn default() -> Self {
        Self {
            capacity: 2000,
            seed: 42,
        }
    }
}

impl SimpleReplayBufferConfig {
    /// Sets the capacity of the replay buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the random seed for sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks that the capacity is positive.
    pub fn validate(&self) -> Result<()> {
        check_positive("replay_capacity", self.capacity)?;
        Ok(())
    }
}
