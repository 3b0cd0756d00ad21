//! Value estimator.
use super::{Obs, Transition};
use crate::{error::LabyrinthError, record::Record, util::argmax};
use anyhow::Result;

/// Action-value function `Q(s, a)` over a finite action set.
///
/// The trait is object safe, so that estimators of different kinds can be
/// used through `Box<dyn ValueEstimator<Obs = O>>`. Each implementation owns
/// its own representation of the values.
pub trait ValueEstimator {
    /// Observation from which values are estimated.
    type Obs: Obs;

    /// Number of actions.
    fn n_actions(&self) -> usize;

    /// Returns the estimates of all actions in the given state.
    ///
    /// Fails with [`LabyrinthError::StateOutOfRange`] if the state cannot be
    /// represented by the estimator.
    fn action_values(&self, obs: &Self::Obs) -> Result<Vec<f32>>;

    /// Returns the estimate of the expected discounted return of `act` in `obs`.
    fn value(&self, obs: &Self::Obs, act: usize) -> Result<f32> {
        let n_actions = self.n_actions();
        if act >= n_actions {
            return Err(LabyrinthError::InvalidAction(act).into());
        }
        Ok(self.action_values(obs)?[act])
    }

    /// Returns the action with the largest estimate, the lowest index on ties.
    fn best_action(&self, obs: &Self::Obs) -> Result<usize> {
        Ok(argmax(&self.action_values(obs)?))
    }

    /// Moves the estimates toward the Bellman targets of the given transitions.
    ///
    /// The target is `r` for terminal transitions and
    /// `r + gamma * max_a' Q(s', a')` otherwise. An empty batch is a no-op.
    fn update(&mut self, batch: &[Transition<Self::Obs>]) -> Result<Record>;
}
