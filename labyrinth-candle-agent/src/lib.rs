#![warn(missing_docs)]
//! Q-learning with a neural network implemented with [candle](https://crates.io/crates/candle-core).
//!
//! [`QNetwork`] approximates the action values of a state from its feature
//! vector with a multilayer perceptron. [`Dqn`] is an agent training it on
//! batches sampled from a replay buffer.
pub mod dqn;
pub mod mlp;
pub mod opt;
mod q_network;
use anyhow::Result;
pub use dqn::{Dqn, DqnConfig};
pub use q_network::{QNetwork, QNetworkConfig};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq, Default)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    #[default]
    Cpu,

    /// The GPU device of the given ordinal.
    Cuda(usize),
}

impl Device {
    /// Creates the candle device.
    ///
    /// Fails for [`Device::Cuda`] if candle was built without CUDA support.
    pub fn build(self) -> Result<candle_core::Device> {
        match self {
            Self::Cpu => Ok(candle_core::Device::Cpu),
            Self::Cuda(n) => Ok(candle_core::Device::new_cuda(n)?),
        }
    }
}
