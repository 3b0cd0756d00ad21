//! Configuration of [`QLearning`](super::QLearning) agent.
use crate::QTableConfig;
use anyhow::Result;
use labyrinth_core::EpsilonGreedyConfig;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`QLearning`](super::QLearning) agent.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct QLearningConfig {
    /// Configuration of the action-value table.
    pub q_table: QTableConfig,

    /// Configuration of the explorer.
    pub explorer: EpsilonGreedyConfig,

    /// Seed of the random number generator used for exploration.
    pub seed: u64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            q_table: QTableConfig::default(),
            explorer: EpsilonGreedyConfig::default(),
            seed: 42,
        }
    }
}

impl QLearningConfig {
    /// Sets the configuration of the action-value table.
    pub fn q_table(mut self, v: QTableConfig) -> Self {
        self.q_table = v;
        self
    }

    /// Sets the configuration of the explorer.
    pub fn explorer(mut self, v: EpsilonGreedyConfig) -> Self {
        self.explorer = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Loads [`QLearningConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`QLearningConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_q_learning_config() -> Result<()> {
        let config = QLearningConfig::default()
            .q_table(QTableConfig::default().n_states(16).learning_rate(0.2))
            .explorer(EpsilonGreedyConfig::default().epsilon_decay(0.99))
            .seed(7);

        let dir = TempDir::new("q_learning_config")?;
        let path = dir.path().join("q_learning_config.yaml");
        config.save(&path)?;
        let config_ = QLearningConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
