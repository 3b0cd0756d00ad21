//! Core functionalities.
mod agent;
mod env;
mod estimator;
mod policy;
mod replay_buffer;
mod step;
mod transition;
use crate::error::LabyrinthError;
pub use agent::Agent;
pub use env::Env;
pub use estimator::ValueEstimator;
pub use policy::{Configurable, Policy};
pub use replay_buffer::{ExperienceBufferBase, ReplayBufferBase};
use std::fmt::Debug;
pub use step::{Info, Step};
pub use transition::Transition;

/// An observation of an environment.
pub trait Obs: Clone + Debug {}

/// An action of an environment.
pub trait Act: Clone + Debug {}

/// An action taken from a finite, ordered action set.
///
/// The order fixes the correspondence between the output index of a value
/// estimator and the transition table of the environment.
pub trait DiscreteAct: Act + Copy {
    /// Number of actions in the set.
    fn n_actions() -> usize;

    /// Index of the action in `0..n_actions()`.
    fn index(&self) -> usize;

    /// Returns the action of the given index.
    ///
    /// Fails with [`LabyrinthError::InvalidAction`] if `ix >= n_actions()`.
    fn from_index(ix: usize) -> Result<Self, LabyrinthError>;
}

/// An observation identifying one state of a finite state space.
pub trait DiscreteObs: Obs {
    /// Index of the state.
    fn index(&self) -> usize;
}

/// An observation encoded as a vector of features.
pub trait FeatureObs: Obs {
    /// Returns the feature vector.
    fn features(&self) -> Vec<f32>;
}
