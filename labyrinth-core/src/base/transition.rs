//! Transition.
use super::Obs;

/// One observed interaction `(o_t, a_t, r_t, o_t+1, done)`.
///
/// The action is stored as its index in the action set, which is also the
/// output index of value estimators. A transition cannot be modified once it
/// is constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<O: Obs> {
    obs: O,
    act: usize,
    reward: f32,
    next_obs: O,
    is_terminated: bool,
}

impl<O: Obs> Transition<O> {
    /// Constructs a transition.
    pub fn new(obs: O, act: usize, reward: f32, next_obs: O, is_terminated: bool) -> Self {
        Self {
            obs,
            act,
            reward,
            next_obs,
            is_terminated,
        }
    }

    /// Observation before the action.
    pub fn obs(&self) -> &O {
        &self.obs
    }

    /// Index of the action.
    pub fn act(&self) -> usize {
        self.act
    }

    /// Reward.
    pub fn reward(&self) -> f32 {
        self.reward
    }

    /// Observation after the action.
    pub fn next_obs(&self) -> &O {
        &self.next_obs
    }

    /// `true` if the episode terminated with this transition.
    ///
    /// Truncation by a step budget is not termination.
    pub fn is_terminated(&self) -> bool {
        self.is_terminated
    }
}
