//! DQN agent implemented with candle.
use super::DqnConfig;
use crate::QNetwork;
use anyhow::Result;
use labyrinth_core::{
    error::LabyrinthError,
    record::{Record, RecordValue},
    Agent, Configurable, DiscreteAct, Env, EpsilonGreedy, ExperienceBufferBase, FeatureObs,
    Policy, ReplayBufferBase, Transition, ValueEstimator,
};
use rand::{rngs::StdRng, SeedableRng};
use std::{fs, marker::PhantomData, path::Path};

/// DQN agent implemented with candle.
///
/// Every observed transition is pushed into the replay buffer. Once the
/// buffer holds at least `batch_size` transitions, each observation is
/// followed by one update of the network on a batch sampled uniformly from
/// the buffer. Epsilon decays at the end of every episode.
#[allow(clippy::upper_case_acronyms)]
pub struct Dqn<E: Env> {
    qnet: QNetwork<E::Obs>,
    explorer: EpsilonGreedy,
    batch_size: usize,
    rng: StdRng,
    train: bool,
    n_opts: usize,
    phantom: PhantomData<E>,
}

impl<E> Dqn<E>
where
    E: Env,
    E::Obs: FeatureObs,
    E::Act: DiscreteAct,
{
    /// The action-value network.
    pub fn q_network(&self) -> &QNetwork<E::Obs> {
        &self.qnet
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.explorer.epsilon()
    }

    /// Number of optimization steps done so far.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }
}

impl<E> Configurable for Dqn<E>
where
    E: Env,
    E::Obs: FeatureObs,
    E::Act: DiscreteAct,
{
    type Config = DqnConfig;

    fn build(config: Self::Config) -> Result<Self> {
        config.validate()?;
        let n_actions = <E::Act as DiscreteAct>::n_actions();
        if config.q_network.mlp.get_out_dim() != n_actions {
            return Err(LabyrinthError::InvalidConfig(format!(
                "out_dim = {}, the environment has {} actions",
                config.q_network.mlp.get_out_dim(),
                n_actions
            ))
            .into());
        }
        let device = config.device.unwrap_or_default().build()?;

        Ok(Self {
            qnet: QNetwork::build(&config.q_network, device)?,
            explorer: EpsilonGreedy::build(&config.explorer)?,
            batch_size: config.batch_size,
            rng: StdRng::seed_from_u64(config.seed),
            train: true,
            n_opts: 0,
            phantom: PhantomData,
        })
    }
}

impl<E> Policy<E> for Dqn<E>
where
    E: Env,
    E::Obs: FeatureObs,
    E::Act: DiscreteAct,
{
    fn sample(&mut self, obs: &E::Obs) -> Result<E::Act> {
        let ix = if self.train {
            self.explorer.select(obs, &self.qnet, &mut self.rng)?
        } else {
            self.qnet.best_action(obs)?
        };
        Ok(<E::Act as DiscreteAct>::from_index(ix)?)
    }
}

impl<E, R> Agent<E, R> for Dqn<E>
where
    E: Env,
    E::Obs: FeatureObs,
    E::Act: DiscreteAct,
    R: ReplayBufferBase<Batch = Vec<Transition<E::Obs>>>
        + ExperienceBufferBase<Item = Transition<E::Obs>>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn observe(&mut self, transition: Transition<E::Obs>, buffer: &mut R) -> Result<Option<Record>> {
        buffer.push(transition)?;
        if buffer.len() < self.batch_size {
            return Ok(None);
        }

        let batch = buffer.batch(self.batch_size)?;
        let record = self.qnet.update(&batch)?;
        self.n_opts += 1;
        Ok(Some(record))
    }

    fn end_episode(&mut self) -> Record {
        let eps = self.explorer.decay();
        Record::from_slice(&[("epsilon", RecordValue::Scalar(eps as f32))])
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.qnet.save(path.join("qnet.safetensors"))
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.qnet.load(path.join("qnet.safetensors"))
    }
}
