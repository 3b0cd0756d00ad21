//! A generic implementation of replay buffer.
mod base;
mod config;
pub use base::{NullReplayBuffer, SimpleReplayBuffer};
pub use config::SimpleReplayBufferConfig;
