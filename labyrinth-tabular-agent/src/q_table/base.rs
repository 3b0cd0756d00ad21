use super::QTableConfig;
use anyhow::Result;
use labyrinth_core::{
    error::LabyrinthError,
    record::{Record, RecordValue},
    util::max_value,
    DiscreteObs, Transition, ValueEstimator,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::{fs, marker::PhantomData, path::Path};

// What goes to disk.
#[derive(Serialize, Deserialize)]
struct Params {
    n_states: usize,
    n_actions: usize,
    q: Vec<f32>,
}

/// Dense table of action values, initialised to zero.
///
/// A transition `(s, a, r, s', done)` moves `Q[s, a]` toward its Bellman
/// target:
///
/// ```text
/// Q[s, a] <- Q[s, a] + alpha * (target - Q[s, a])
/// target = r                          if done
///          r + gamma * max_a' Q[s', a'] otherwise
/// ```
///
/// Transitions of a batch are applied one after another.
pub struct QTable<O> {
    n_states: usize,
    n_actions: usize,
    alpha: f32,
    gamma: f32,
    q: Vec<f32>,
    phantom: PhantomData<fn() -> O>,
}

impl<O: DiscreteObs> QTable<O> {
    /// Constructs a table of zeros.
    pub fn build(config: &QTableConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            n_states: config.n_states,
            n_actions: config.n_actions,
            alpha: config.learning_rate as f32,
            gamma: config.discount_factor as f32,
            q: vec![0f32; config.n_states * config.n_actions],
            phantom: PhantomData,
        })
    }

    /// Number of states.
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    fn state_index(&self, obs: &O) -> Result<usize, LabyrinthError> {
        let ix = obs.index();
        if ix < self.n_states {
            Ok(ix)
        } else {
            Err(LabyrinthError::StateOutOfRange {
                state: ix,
                size: self.n_states,
            })
        }
    }

    fn row(&self, s: usize) -> &[f32] {
        &self.q[s * self.n_actions..(s + 1) * self.n_actions]
    }

    /// Saves the values with `bincode`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let params = Params {
            n_states: self.n_states,
            n_actions: self.n_actions,
            q: self.q.clone(),
        };
        fs::write(&path, bincode::serialize(&params)?)?;
        info!("Save q-table to {:?}", path.as_ref());
        Ok(())
    }

    /// Loads values saved with [`QTable::save`].
    ///
    /// Fails if the saved table does not have the shape of this one.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let buf = fs::read(&path)?;
        let params: Params = bincode::deserialize(&buf[..])?;
        if params.n_states != self.n_states
            || params.n_actions != self.n_actions
            || params.q.len() != self.q.len()
        {
            return Err(LabyrinthError::InvalidConfig(format!(
                "saved table is {}x{}, expected {}x{}",
                params.n_states, params.n_actions, self.n_states, self.n_actions
            ))
            .into());
        }
        self.q = params.q;
        info!("Load q-table from {:?}", path.as_ref());
        Ok(())
    }
}

impl<O: DiscreteObs> ValueEstimator for QTable<O> {
    type Obs = O;

    fn n_actions(&self) -> usize {
        self.n_actions
    }

    fn action_values(&self, obs: &O) -> Result<Vec<f32>> {
        let s = self.state_index(obs)?;
        Ok(self.row(s).to_vec())
    }

    fn update(&mut self, batch: &[Transition<O>]) -> Result<Record> {
        if batch.is_empty() {
            return Ok(Record::empty());
        }

        let mut sq_err = 0f32;
        for tr in batch.iter() {
            let s = self.state_index(tr.obs())?;
            let a = tr.act();
            if a >= self.n_actions {
                return Err(LabyrinthError::InvalidAction(a).into());
            }

            let target = if tr.is_terminated() {
                tr.reward()
            } else {
                let s_ = self.state_index(tr.next_obs())?;
                tr.reward() + self.gamma * max_value(self.row(s_))
            };

            let ix = s * self.n_actions + a;
            let td_err = target - self.q[ix];
            self.q[ix] += self.alpha * td_err;
            sq_err += td_err * td_err;
        }

        Ok(Record::from_slice(&[(
            "loss",
            RecordValue::Scalar(sq_err / batch.len() as f32),
        )]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_grid_env::GridObs;
    use tempdir::TempDir;

    fn obs(row: usize, col: usize) -> GridObs {
        GridObs::new(row, col, 2, 2)
    }

    fn table() -> QTable<GridObs> {
        let config = QTableConfig::default()
            .n_states(4)
            .learning_rate(0.5)
            .discount_factor(0.9);
        QTable::build(&config).unwrap()
    }

    #[test]
    fn test_zero_initialised() -> Result<()> {
        let q = table();
        for ix in 0..4 {
            let o = obs(ix / 2, ix % 2);
            assert_eq!(q.action_values(&o)?, vec![0.0; 4]);
            assert_eq!(q.best_action(&o)?, 0);
        }
        Ok(())
    }

    #[test]
    fn test_update_toward_bellman_target() -> Result<()> {
        let mut q = table();

        // Terminal transition: the target is the reward
        let tr = Transition::new(obs(0, 1), 1, 10.0, obs(1, 1), true);
        q.update(&[tr])?;
        assert_eq!(q.value(&obs(0, 1), 1)?, 5.0);

        // Bootstrapped target: 0 + 0.9 * 5
        let tr = Transition::new(obs(0, 0), 3, 0.0, obs(0, 1), false);
        q.update(&[tr])?;
        assert!((q.value(&obs(0, 0), 3)? - 2.25).abs() < 1e-6);
        assert_eq!(q.best_action(&obs(0, 0))?, 3);
        Ok(())
    }

    #[test]
    fn test_empty_batch_is_a_no_op() -> Result<()> {
        let mut q = table();
        let record = q.update(&[])?;
        assert!(record.is_empty());
        assert_eq!(q.action_values(&obs(1, 1))?, vec![0.0; 4]);
        Ok(())
    }

    #[test]
    fn test_out_of_range() -> Result<()> {
        let mut q = table();
        let far = GridObs::new(2, 0, 3, 2);
        let err = q.action_values(&far).unwrap_err();
        assert_eq!(
            err.downcast_ref::<LabyrinthError>(),
            Some(&LabyrinthError::StateOutOfRange { state: 4, size: 4 })
        );

        let err = q.value(&obs(0, 0), 4).unwrap_err();
        assert_eq!(
            err.downcast_ref::<LabyrinthError>(),
            Some(&LabyrinthError::InvalidAction(4))
        );

        let tr = Transition::new(obs(0, 0), 9, 1.0, obs(0, 1), false);
        assert!(q.update(&[tr]).is_err());
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let mut q = table();
        q.update(&[Transition::new(obs(1, 0), 2, 1.0, obs(1, 0), true)])?;

        let dir = TempDir::new("q_table")?;
        let path = dir.path().join("q_table.bin");
        q.save(&path)?;

        let mut q_ = table();
        q_.load(&path)?;
        assert_eq!(q_.action_values(&obs(1, 0))?, q.action_values(&obs(1, 0))?);

        let config = QTableConfig::default().n_states(9);
        let mut other = QTable::<GridObs>::build(&config)?;
        assert!(other.load(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        let config = QTableConfig::default().n_states(4).learning_rate(0.0);
        assert!(QTable::<GridObs>::build(&config).is_err());
        let config = QTableConfig::default().n_states(4).discount_factor(1.5);
        assert!(QTable::<GridObs>::build(&config).is_err());
    }
}
