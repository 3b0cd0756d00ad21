//! Agent.
use super::{Env, Policy, ReplayBufferBase, Transition};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
pub trait Agent<E: Env, R: ReplayBufferBase>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Learns from a transition just observed in the environment.
    ///
    /// Agents learning online update their value estimator with the
    /// transition directly and ignore `buffer`. Agents learning from
    /// experience replay push the transition into `buffer` and perform an
    /// optimization step on a batch sampled from it.
    ///
    /// Returns `None` if no optimization step was done, for example while the
    /// buffer holds fewer transitions than a batch.
    fn observe(&mut self, transition: Transition<E::Obs>, buffer: &mut R)
        -> Result<Option<Record>>;

    /// Called exactly once at the end of every episode, terminated or truncated.
    ///
    /// Returns values to be recorded, like the exploration rate.
    fn end_episode(&mut self) -> Record;

    /// Save the parameters of the agent in the given directory.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Load the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
