#![warn(missing_docs)]
//! Core of value-based reinforcement learning on mazes.
//!
//! This crate does not depend on a concrete environment or a concrete value
//! function. It provides:
//!
//! * the interfaces between environments, agents and value estimators
//!   ([`Env`], [`Policy`], [`Agent`], [`ValueEstimator`]),
//! * an epsilon-greedy explorer ([`EpsilonGreedy`]),
//! * a bounded replay memory ([`replay_buffer::SimpleReplayBuffer`]),
//! * the training loop ([`Trainer`]) and the greedy rollout used to read off the
//!   learned path ([`PathExtractor`]),
//! * records and recorders for logging ([`record`]).
pub mod error;
pub mod record;
pub mod replay_buffer;
pub mod util;

#[cfg(test)]
mod dummy;

mod base;
pub use base::{
    Act, Agent, Configurable, DiscreteAct, DiscreteObs, Env, ExperienceBufferBase, FeatureObs,
    Info, Obs, Policy, ReplayBufferBase, Step, Transition, ValueEstimator,
};

mod explorer;
pub use explorer::{EpsilonGreedy, EpsilonGreedyConfig};

mod path;
pub use path::{GreedyPath, PathExtractor};

mod trainer;
pub use trainer::{BestEpisode, EpisodeOutcome, Trainer, TrainerConfig, TrainingSummary};
