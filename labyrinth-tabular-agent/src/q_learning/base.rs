use super::QLearningConfig;
use crate::QTable;
use anyhow::Result;
use labyrinth_core::{
    error::LabyrinthError,
    record::{Record, RecordValue},
    Agent, Configurable, DiscreteAct, DiscreteObs, Env, EpsilonGreedy, Policy, ReplayBufferBase,
    Transition, ValueEstimator,
};
use rand::{rngs::StdRng, SeedableRng};
use std::{fs, marker::PhantomData, path::Path};

/// Q-learning agent with an action-value table.
///
/// The table is updated with every observed transition, so the replay buffer
/// given by the trainer is not used. In training mode actions are selected
/// epsilon-greedily and epsilon decays at the end of every episode. In
/// evaluation mode the agent is greedy.
pub struct QLearning<E: Env> {
    q_table: QTable<E::Obs>,
    explorer: EpsilonGreedy,
    rng: StdRng,
    train: bool,
    phantom: PhantomData<E>,
}

impl<E> QLearning<E>
where
    E: Env,
    E::Obs: DiscreteObs,
    E::Act: DiscreteAct,
{
    /// The action-value table.
    pub fn q_table(&self) -> &QTable<E::Obs> {
        &self.q_table
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.explorer.epsilon()
    }
}

impl<E> Configurable for QLearning<E>
where
    E: Env,
    E::Obs: DiscreteObs,
    E::Act: DiscreteAct,
{
    type Config = QLearningConfig;

    fn build(config: Self::Config) -> Result<Self> {
        let n_actions = <E::Act as DiscreteAct>::n_actions();
        if config.q_table.n_actions != n_actions {
            return Err(LabyrinthError::InvalidConfig(format!(
                "n_actions = {}, the environment has {} actions",
                config.q_table.n_actions, n_actions
            ))
            .into());
        }
        Ok(Self {
            q_table: QTable::build(&config.q_table)?,
            explorer: EpsilonGreedy::build(&config.explorer)?,
            rng: StdRng::seed_from_u64(config.seed),
            train: true,
            phantom: PhantomData,
        })
    }
}

impl<E> Policy<E> for QLearning<E>
where
    E: Env,
    E::Obs: DiscreteObs,
    E::Act: DiscreteAct,
{
    fn sample(&mut self, obs: &E::Obs) -> Result<E::Act> {
        let ix = if self.train {
            self.explorer.select(obs, &self.q_table, &mut self.rng)?
        } else {
            self.q_table.best_action(obs)?
        };
        Ok(<E::Act as DiscreteAct>::from_index(ix)?)
    }
}

impl<E, R> Agent<E, R> for QLearning<E>
where
    E: Env,
    E::Obs: DiscreteObs,
    E::Act: DiscreteAct,
    R: ReplayBufferBase,
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

    fn observe(&mut self, transition: Transition<E::Obs>, _buffer: &mut R) -> Result<Option<Record>> {
        Ok(Some(self.q_table.update(&[transition])?))
    }

    fn end_episode(&mut self) -> Record {
        let eps = self.explorer.decay();
        Record::from_slice(&[("epsilon", RecordValue::Scalar(eps as f32))])
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.q_table.save(path.join("q_table.bin"))
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.q_table.load(path.join("q_table.bin"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QTableConfig;
    use labyrinth_core::{
        record::NullRecorder, replay_buffer::NullReplayBuffer, EpsilonGreedyConfig,
        PathExtractor, Trainer, TrainerConfig,
    };
    use labyrinth_grid_env::{GridAct, GridEnv, GridEnvConfig, GridObs, Maze};
    use tempdir::TempDir;

    type Buffer = NullReplayBuffer<Transition<GridObs>>;

    fn agent(n_states: usize) -> Result<QLearning<GridEnv>> {
        let config = QLearningConfig::default()
            .q_table(QTableConfig::default().n_states(n_states))
            .explorer(EpsilonGreedyConfig::default().epsilon_decay(0.99));
        QLearning::build(config)
    }

    #[test]
    fn test_learns_corridor() -> Result<()> {
        let maze: Maze = "S..G".parse()?;
        let mut env = GridEnv::build(&GridEnvConfig::maze_reward(maze), 0)?;
        let mut agent = agent(env.n_states())?;
        let mut buffer = Buffer::build(&())?;
        let mut recorder = NullRecorder::new();

        let config = TrainerConfig::default()
            .episodes(200)
            .max_steps_per_episode(100);
        let summary =
            Trainer::build(config)?.train(&mut env, &mut agent, &mut buffer, &mut recorder)?;
        assert_eq!(summary.episodes(), 200);
        assert_eq!(summary.best_episode.map(|b| b.steps()), Some(3));
        assert!(agent.epsilon() < 1.0);

        let path = PathExtractor::new(100).extract(agent.q_table(), &mut env)?;
        assert_eq!(path.actions().copied().collect::<Vec<_>>(), vec![GridAct::Right; 3]);
        Ok(())
    }

    #[test]
    fn test_eval_mode_is_greedy() -> Result<()> {
        let maze: Maze = "S.\n.G".parse()?;
        let env = GridEnv::build(&GridEnvConfig::maze_reward(maze), 0)?;
        let mut agent = agent(env.n_states())?;
        let obs = env.obs();

        let tr = Transition::new(obs, GridAct::Down as usize, 1.0, obs, false);
        Agent::<GridEnv, Buffer>::observe(&mut agent, tr, &mut Buffer::build(&())?)?;
        Agent::<GridEnv, Buffer>::eval(&mut agent);
        for _ in 0..20 {
            assert_eq!(agent.sample(&obs)?, GridAct::Down);
        }
        Ok(())
    }

    #[test]
    fn test_action_count_must_match_env() {
        let q_table = QTableConfig::default().n_states(4).n_actions(3);
        let config = QLearningConfig::default().q_table(q_table);
        let err = QLearning::<GridEnv>::build(config).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<LabyrinthError>(),
            Some(LabyrinthError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_save_and_load_params() -> Result<()> {
        let maze: Maze = "S.\n.G".parse()?;
        let env = GridEnv::build(&GridEnvConfig::maze_reward(maze), 0)?;
        let obs = env.obs();
        let mut agent = agent(env.n_states())?;
        let tr = Transition::new(obs, GridAct::Right as usize, 1.0, obs, true);
        Agent::<GridEnv, Buffer>::observe(&mut agent, tr, &mut Buffer::build(&())?)?;

        let dir = TempDir::new("q_learning")?;
        Agent::<GridEnv, Buffer>::save_params(&agent, dir.path())?;
        let mut agent_ = self::agent(env.n_states())?;
        Agent::<GridEnv, Buffer>::load_params(&mut agent_, dir.path())?;
        assert_eq!(agent_.q_table().value(&obs, 3)?, 0.1);
        Ok(())
    }
}
