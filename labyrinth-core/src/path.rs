//! Greedy rollout of a trained value estimator.
use crate::{error::LabyrinthError, DiscreteAct, Env, ValueEstimator};
use anyhow::Result;
use log::trace;

/// The path followed by the greedy policy from the initial state to a terminal state.
#[derive(Debug, Clone)]
pub struct GreedyPath<O, A> {
    steps: Vec<(O, A)>,
    final_obs: O,
    total_reward: f32,
}

impl<O, A> GreedyPath<O, A> {
    /// Observations paired with the actions taken in them, in order.
    pub fn steps(&self) -> &[(O, A)] {
        &self.steps
    }

    /// Iterates over the actions taken.
    pub fn actions(&self) -> impl Iterator<Item = &A> {
        self.steps.iter().map(|(_, a)| a)
    }

    /// Terminal observation reached by the last action.
    pub fn final_obs(&self) -> &O {
        &self.final_obs
    }

    /// Sum of the rewards along the path.
    pub fn total_reward(&self) -> f32 {
        self.total_reward
    }

    /// Number of actions taken.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the initial state was terminal.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Reads off the path of the greedy policy of a value estimator.
///
/// The estimator is only queried, so the extracted path does not depend on
/// exploration.
#[derive(Debug, Clone, Copy)]
pub struct PathExtractor {
    max_steps: usize,
}

impl PathExtractor {
    /// Constructs an extractor giving up after `max_steps` actions.
    pub fn new(max_steps: usize) -> Self {
        Self { max_steps }
    }

    /// Resets `env` and takes the best action until the episode terminates.
    ///
    /// Fails with [`LabyrinthError::Incomplete`] if no terminal state is
    /// reached within the step cap, for example when the greedy policy loops.
    pub fn extract<E, V>(&self, estimator: &V, env: &mut E) -> Result<GreedyPath<E::Obs, E::Act>>
    where
        E: Env,
        E::Act: DiscreteAct,
        V: ValueEstimator<Obs = E::Obs> + ?Sized,
    {
        let mut obs = env.reset()?;
        let mut steps = Vec::new();
        let mut total_reward = 0.0;

        for _ in 0..self.max_steps {
            let act = <E::Act as DiscreteAct>::from_index(estimator.best_action(&obs)?)?;
            let (step, _) = env.step(&act)?;
            trace!("{:?} -> {:?}", act, step.obs);
            total_reward += step.reward;
            steps.push((obs, act));
            obs = step.obs;

            if step.is_terminated {
                return Ok(GreedyPath {
                    steps,
                    final_obs: obs,
                    total_reward,
                });
            }
        }

        Err(LabyrinthError::Incomplete(self.max_steps).into())
    }
}
