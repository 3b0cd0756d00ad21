//! Action-value network.
use crate::{
    mlp::{Mlp, MlpConfig},
    opt::{Optimizer, OptimizerConfig},
};
use anyhow::Result;
use candle_core::{DType, Device, Tensor, D};
use candle_nn::{loss::mse, VarBuilder, VarMap};
use labyrinth_core::{
    error::LabyrinthError,
    record::{Record, RecordValue},
    util::check_unit_interval,
    FeatureObs, Transition, ValueEstimator,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::{marker::PhantomData, path::Path};

/// Configuration of [`QNetwork`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct QNetworkConfig {
    /// Configuration of the network. The output dimension is the number of actions.
    pub mlp: MlpConfig,

    /// Discount factor `gamma`.
    pub discount_factor: f64,

    /// Configuration of the optimizer.
    pub opt_config: OptimizerConfig,
}

impl Default for QNetworkConfig {
    fn default() -> Self {
        Self {
            mlp: MlpConfig::default(),
            discount_factor: 0.95,
            opt_config: OptimizerConfig::default(),
        }
    }
}

impl QNetworkConfig {
    /// Sets the configuration of the network.
    pub fn mlp(mut self, v: MlpConfig) -> Self {
        self.mlp = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Sets the configuration of the optimizer.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Checks the network shape, the discount factor and the learning rate.
    pub fn validate(&self) -> Result<()> {
        self.mlp.validate()?;
        check_unit_interval("discount_factor", self.discount_factor)?;
        check_unit_interval("learning_rate", self.opt_config.get_learning_rate())?;
        Ok(())
    }
}

/// Action values approximated by a multilayer perceptron on feature vectors.
///
/// An update on a batch builds, for every transition, a target vector equal
/// to the current output of the network for `s` with the entry of the taken
/// action replaced by the Bellman target. The network is then moved toward
/// the targets by one optimizer step minimising the mean squared error. The
/// same network computes the predictions and the targets.
pub struct QNetwork<O> {
    device: Device,
    varmap: VarMap,
    mlp: Mlp,
    opt: Optimizer,
    in_dim: usize,
    n_actions: usize,
    gamma: f32,
    phantom: PhantomData<fn() -> O>,
}

impl<O: FeatureObs> QNetwork<O> {
    /// Constructs a network with randomly initialised weights.
    pub fn build(config: &QNetworkConfig, device: Device) -> Result<Self> {
        config.validate()?;
        let varmap = VarMap::new();
        let mlp = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            Mlp::build(vb, &config.mlp)?
        };
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            device,
            varmap,
            mlp,
            opt,
            in_dim: config.mlp.get_in_dim(),
            n_actions: config.mlp.get_out_dim(),
            gamma: config.discount_factor as f32,
            phantom: PhantomData,
        })
    }

    // Stacks the feature vectors into a `[n, in_dim]` tensor.
    fn features<'a>(&self, obs: impl Iterator<Item = &'a O>) -> Result<Tensor>
    where
        O: 'a,
    {
        let mut xs = Vec::new();
        let mut n = 0;
        for o in obs {
            let x = o.features();
            if x.len() != self.in_dim {
                return Err(LabyrinthError::StateOutOfRange {
                    state: x.len(),
                    size: self.in_dim,
                }
                .into());
            }
            xs.extend(x);
            n += 1;
        }
        Ok(Tensor::from_vec(xs, (n, self.in_dim), &self.device)?)
    }

    /// Saves the parameters in safetensors format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.varmap.save(&path)?;
        info!("Save q-network to {:?}", path.as_ref());
        Ok(())
    }

    /// Loads parameters saved with [`QNetwork::save`].
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.varmap.load(&path)?;
        info!("Load q-network from {:?}", path.as_ref());
        Ok(())
    }
}

impl<O: FeatureObs> ValueEstimator for QNetwork<O> {
    type Obs = O;

    fn n_actions(&self) -> usize {
        self.n_actions
    }

    fn action_values(&self, obs: &O) -> Result<Vec<f32>> {
        let xs = self.features(std::iter::once(obs))?;
        Ok(self.mlp.forward(&xs)?.squeeze(0)?.to_vec1::<f32>()?)
    }

    fn update(&mut self, batch: &[Transition<O>]) -> Result<Record> {
        if batch.is_empty() {
            return Ok(Record::empty());
        }
        if let Some(tr) = batch.iter().find(|tr| tr.act() >= self.n_actions) {
            return Err(LabyrinthError::InvalidAction(tr.act()).into());
        }

        let n = batch.len();
        let obs = self.features(batch.iter().map(|tr| tr.obs()))?;
        let next_obs = self.features(batch.iter().map(|tr| tr.next_obs()))?;

        let pred = self.mlp.forward(&obs)?;
        let max_next = self
            .mlp
            .forward(&next_obs)?
            .detach()
            .max(D::Minus1)?
            .to_vec1::<f32>()?;

        let mut tgt = pred.detach().to_vec2::<f32>()?;
        for (i, tr) in batch.iter().enumerate() {
            tgt[i][tr.act()] = if tr.is_terminated() {
                tr.reward()
            } else {
                tr.reward() + self.gamma * max_next[i]
            };
        }
        let tgt = Tensor::from_vec(
            tgt.into_iter().flatten().collect::<Vec<_>>(),
            (n, self.n_actions),
            &self.device,
        )?;

        let loss = mse(&pred, &tgt)?;
        self.opt.backward_step(&loss)?;

        Ok(Record::from_slice(&[(
            "loss",
            RecordValue::Scalar(loss.to_scalar::<f32>()?),
        )]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_grid_env::GridObs;
    use tempdir::TempDir;

    fn network(lr: f64) -> Result<QNetwork<GridObs>> {
        let config = QNetworkConfig::default()
            .mlp(MlpConfig::default().in_dim(4))
            .opt_config(OptimizerConfig::Adam { lr });
        QNetwork::build(&config, Device::Cpu)
    }

    #[test]
    fn test_regresses_toward_terminal_reward() -> Result<()> {
        let mut q = network(0.01)?;
        let s = GridObs::new(0, 1, 2, 2);
        let tr = Transition::new(s, 2, 1.0, GridObs::new(1, 1, 2, 2), true);
        let batch = vec![tr; 4];

        for _ in 0..500 {
            q.update(&batch)?;
        }
        assert!((q.value(&s, 2)? - 1.0).abs() < 0.1);
        Ok(())
    }

    #[test]
    fn test_action_values_shape() -> Result<()> {
        let q = network(0.001)?;
        let vs = q.action_values(&GridObs::new(1, 0, 2, 2))?;
        assert_eq!(vs.len(), 4);
        assert!(q.best_action(&GridObs::new(1, 0, 2, 2))? < 4);
        Ok(())
    }

    #[test]
    fn test_wrong_feature_length_is_out_of_range() -> Result<()> {
        let q = network(0.001)?;
        let err = q.action_values(&GridObs::new(0, 0, 3, 3)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<LabyrinthError>(),
            Some(&LabyrinthError::StateOutOfRange { state: 9, size: 4 })
        );
        Ok(())
    }

    #[test]
    fn test_empty_batch_and_invalid_action() -> Result<()> {
        let mut q = network(0.001)?;
        let s = GridObs::new(0, 0, 2, 2);
        let before = q.action_values(&s)?;
        assert!(q.update(&[])?.is_empty());
        assert_eq!(q.action_values(&s)?, before);

        let tr = Transition::new(s, 4, 0.0, s, false);
        let err = q.update(&[tr]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<LabyrinthError>(),
            Some(&LabyrinthError::InvalidAction(4))
        );
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let q = network(0.001)?;
        let s = GridObs::new(1, 1, 2, 2);
        let dir = TempDir::new("q_network")?;
        let path = dir.path().join("qnet.safetensors");
        q.save(&path)?;

        let mut q_ = network(0.001)?;
        q_.load(&path)?;
        assert_eq!(q_.action_values(&s)?, q.action_values(&s)?);
        Ok(())
    }
}
