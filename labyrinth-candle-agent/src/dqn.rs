//! DQN agent.
mod base;
mod config;
pub use base::Dqn;
pub use config::DqnConfig;
