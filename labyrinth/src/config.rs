//! Configuration of a training run.
use anyhow::Result;
use labyrinth_candle_agent::{mlp::MlpConfig, opt::OptimizerConfig, DqnConfig, QNetworkConfig};
use labyrinth_core::{
    replay_buffer::SimpleReplayBufferConfig,
    util::{check_positive, check_unit_interval},
    DiscreteAct, EpsilonGreedyConfig, TrainerConfig,
};
use labyrinth_grid_env::GridAct;
use labyrinth_tabular_agent::{QLearningConfig, QTableConfig};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Hyperparameters shared by the tabular and the DQN runs.
///
/// Missing keys in a YAML file take their default values.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct RunConfig {
    /// Step size of the tabular update, learning rate of the optimizer for DQN.
    pub learning_rate: f64,

    /// Discount factor.
    pub discount_factor: f64,

    /// Initial exploration rate.
    pub epsilon: f64,

    /// Floor of the exploration rate.
    pub epsilon_min: f64,

    /// Multiplicative decay of the exploration rate per episode.
    pub epsilon_decay: f64,

    /// Number of training episodes.
    pub episodes: usize,

    /// Step cap of an episode.
    pub max_steps_per_episode: usize,

    /// Capacity of the replay buffer (DQN only).
    pub replay_capacity: usize,

    /// Batch size of an update (DQN only).
    pub batch_size: usize,

    /// Hidden layer sizes of the network (DQN only).
    pub hidden_units: Vec<usize>,

    /// Seed for exploration and replay sampling.
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            epsilon: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.995,
            episodes: 1000,
            max_steps_per_episode: 2000,
            replay_capacity: 2000,
            batch_size: 32,
            hidden_units: vec![24, 24],
            seed: 42,
        }
    }
}

impl RunConfig {
    /// Defaults of a DQN run.
    pub fn dqn() -> Self {
        Self {
            learning_rate: 0.001,
            discount_factor: 0.95,
            episodes: 200,
            max_steps_per_episode: 200,
            ..Self::default()
        }
    }

    /// Sets the number of episodes.
    pub fn episodes(mut self, v: usize) -> Self {
        self.episodes = v;
        self
    }

    /// Sets the step cap of an episode.
    pub fn max_steps_per_episode(mut self, v: usize) -> Self {
        self.max_steps_per_episode = v;
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

    /// Sets the per-episode decay of the exploration rate.
    pub fn epsilon_decay(mut self, v: f64) -> Self {
        self.epsilon_decay = v;
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

    /// Checks the coefficients and the sizes.
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("learning_rate", self.learning_rate)?;
        check_unit_interval("discount_factor", self.discount_factor)?;
        self.explorer().validate()?;
        check_positive("episodes", self.episodes)?;
        check_positive("max_steps_per_episode", self.max_steps_per_episode)?;
        check_positive("replay_capacity", self.replay_capacity)?;
        check_positive("batch_size", self.batch_size)?;
        Ok(())
    }

    /// Configuration of the explorer.
    pub fn explorer(&self) -> EpsilonGreedyConfig {
        EpsilonGreedyConfig::default()
            .epsilon(self.epsilon)
            .epsilon_min(self.epsilon_min)
            .epsilon_decay(self.epsilon_decay)
    }

    /// Configuration of the trainer.
    pub fn trainer(&self) -> TrainerConfig {
        TrainerConfig::default()
            .episodes(self.episodes)
            .max_steps_per_episode(self.max_steps_per_episode)
    }

    /// Configuration of a tabular agent on `n_states` states.
    pub fn q_learning(&self, n_states: usize) -> QLearningConfig {
        QLearningConfig::default()
            .q_table(
                QTableConfig::default()
                    .n_states(n_states)
                    .n_actions(GridAct::n_actions())
                    .learning_rate(self.learning_rate)
                    .discount_factor(self.discount_factor),
            )
            .explorer(self.explorer())
            .seed(self.seed)
    }

    /// Configuration of a DQN agent on feature vectors of length `in_dim`.
    pub fn dqn_agent(&self, in_dim: usize) -> DqnConfig {
        let mlp = MlpConfig::new(in_dim, self.hidden_units.clone(), GridAct::n_actions());
        let q_network = QNetworkConfig::default()
            .mlp(mlp)
            .discount_factor(self.discount_factor)
            .opt_config(OptimizerConfig::default().learning_rate(self.learning_rate));
        DqnConfig::default()
            .q_network(q_network)
            .explorer(self.explorer())
            .batch_size(self.batch_size)
            .seed(self.seed)
    }

    /// Configuration of the replay buffer.
    pub fn replay_buffer(&self) -> SimpleReplayBufferConfig {
        SimpleReplayBufferConfig::default()
            .capacity(self.replay_capacity)
            .seed(self.seed)
    }

    /// Loads [`RunConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RunConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
