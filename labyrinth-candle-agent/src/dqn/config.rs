//! Configuration of DQN agent.
use crate::{Device, QNetworkConfig};
use anyhow::Result;
use labyrinth_core::{util::check_positive, EpsilonGreedyConfig};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Dqn`](super::Dqn) agent.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DqnConfig {
    /// Configuration of the action-value network.
    pub q_network: QNetworkConfig,

    /// Configuration of the explorer.
    pub explorer: EpsilonGreedyConfig,

    /// Number of transitions sampled from the replay buffer per update.
    pub batch_size: usize,

    /// Seed of the random number generator used for exploration.
    pub seed: u64,

    /// Device used for the network. Defaults to the CPU.
    pub device: Option<Device>,
}

impl Default for DqnConfig {
    fn default() -> Self {
        Self {
            q_network: QNetworkConfig::default(),
            explorer: EpsilonGreedyConfig::default(),
            batch_size: 32,
            seed: 42,
            device: None,
        }
    }
}

impl DqnConfig {
    /// Sets the configuration of the action-value network.
    pub fn q_network(mut self, v: QNetworkConfig) -> Self {
        self.q_network = v;
        self
    }

    /// Sets the configuration of the explorer.
    pub fn explorer(mut self, v: EpsilonGreedyConfig) -> Self {
        self.explorer = v;
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the device.
    pub fn device(mut self, v: Device) -> Self {
        self.device = Some(v);
        self
    }

    /// Checks all the nested configurations.
    pub fn validate(&self) -> Result<()> {
        self.q_network.validate()?;
        self.explorer.validate()?;
        check_positive("batch_size", self.batch_size)?;
        Ok(())
    }

    /// Loads [`DqnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DqnConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
