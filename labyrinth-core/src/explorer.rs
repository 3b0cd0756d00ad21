//! Epsilon-greedy exploration.
use crate::{util::check_unit_interval, ValueEstimator};
use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration of [`EpsilonGreedy`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedyConfig {
    /// Initial exploration rate.
    pub epsilon: f64,

    /// Lower bound of the exploration rate.
    pub epsilon_min: f64,

    /// Factor applied to the exploration rate at the end of every episode.
    pub epsilon_decay: f64,
}

impl Default for EpsilonGreedyConfig {
    fn default() -> Self {
        Self {
            epsilon: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.995,
        }
    }
}

impl EpsilonGreedyConfig {
    /// Sets the initial exploration rate.
    pub fn epsilon(mut self, v: f64) -> Self {
        self.epsilon = v;
        self
    }

    /// Sets the lower bound of the exploration rate.
    pub fn epsilon_min(mut self, v: f64) -> Self {
        self.epsilon_min = v;
        self
    }

    /// Sets the decay factor. `1.0` keeps the rate constant.
    pub fn epsilon_decay(mut self, v: f64) -> Self {
        self.epsilon_decay = v;
        self
    }

    /// Checks that all values lie in `(0, 1]`.
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("epsilon", self.epsilon)?;
        check_unit_interval("epsilon_min", self.epsilon_min)?;
        check_unit_interval("epsilon_decay", self.epsilon_decay)?;
        Ok(())
    }
}

/// Epsilon-greedy action selection with a multiplicative decay schedule.
///
/// The exploration rate never increases and never goes below `epsilon_min`.
#[derive(Debug, Clone, PartialEq)]
pub struct EpsilonGreedy {
    eps: f64,
    eps_min: f64,
    eps_decay: f64,
}

impl EpsilonGreedy {
    /// Constructs the explorer.
    pub fn build(config: &EpsilonGreedyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            eps: config.epsilon.max(config.epsilon_min),
            eps_min: config.epsilon_min,
            eps_decay: config.epsilon_decay,
        })
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.eps
    }

    /// Takes an action.
    ///
    /// With probability epsilon the action is drawn uniformly from all
    /// actions, otherwise it is the best action of `estimator`.
    pub fn select<V>(&self, obs: &V::Obs, estimator: &V, rng: &mut impl Rng) -> Result<usize>
    where
        V: ValueEstimator + ?Sized,
    {
        if rng.gen::<f64>() < self.eps {
            Ok(rng.gen_range(0..estimator.n_actions()))
        } else {
            estimator.best_action(obs)
        }
    }

    /// Applies `epsilon = max(epsilon_min, epsilon * epsilon_decay)`.
    pub fn decay(&mut self) -> f64 {
        self.eps = (self.eps * self.eps_decay).max(self.eps_min);
        self.eps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{record::Record, Obs, Transition};
    use rand::{rngs::StdRng, SeedableRng};

    #[derive(Clone, Debug)]
    struct UnitObs;

    impl Obs for UnitObs {}

    // Always prefers action 2 out of 4.
    struct Fixed;

    impl ValueEstimator for Fixed {
        type Obs = UnitObs;

        fn n_actions(&self) -> usize {
            4
        }

        fn action_values(&self, _obs: &UnitObs) -> Result<Vec<f32>> {
            Ok(vec![0.0, 0.5, 1.0, 0.5])
        }

        fn update(&mut self, _batch: &[Transition<UnitObs>]) -> Result<Record> {
            Ok(Record::empty())
        }
    }

    #[test]
    fn test_decay_reaches_floor_without_undershoot() -> Result<()> {
        let mut explorer = EpsilonGreedy::build(&EpsilonGreedyConfig::default())?;
        let mut prev = explorer.epsilon();
        for _ in 0..1000 {
            let eps = explorer.decay();
            assert!(eps <= prev);
            assert!(eps >= 0.01);
            prev = eps;
        }
        assert_eq!(explorer.epsilon(), 0.01);
        Ok(())
    }

    #[test]
    fn test_greedy_when_epsilon_is_at_floor() -> Result<()> {
        let config = EpsilonGreedyConfig::default()
            .epsilon(0.01)
            .epsilon_min(0.01);
        let explorer = EpsilonGreedy::build(&config)?;
        let mut rng = StdRng::seed_from_u64(0);
        let n_best = (0..1000)
            .map(|_| explorer.select(&UnitObs, &Fixed, &mut rng))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .filter(|&a| a == 2)
            .count();
        assert!(n_best > 980);
        Ok(())
    }

    #[test]
    fn test_random_when_epsilon_is_one() -> Result<()> {
        let config = EpsilonGreedyConfig::default().epsilon_decay(1.0);
        let explorer = EpsilonGreedy::build(&config)?;
        let mut rng = StdRng::seed_from_u64(0);
        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            counts[explorer.select(&UnitObs, &Fixed, &mut rng)?] += 1;
        }
        assert!(counts.iter().all(|&c| c > 800 && c < 1200));
        Ok(())
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        for config in [
            EpsilonGreedyConfig::default().epsilon(0.0),
            EpsilonGreedyConfig::default().epsilon_min(1.5),
            EpsilonGreedyConfig::default().epsilon_decay(-0.1),
        ] {
            assert!(EpsilonGreedy::build(&config).is_err());
        }
    }
}
