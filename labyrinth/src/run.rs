//! Training runs on grid mazes and random walks in the continuous maze.
use crate::RunConfig;
use anyhow::Result;
use labyrinth_candle_agent::Dqn;
use labyrinth_core::{
    record::{AggregateRecorder, RecordValue, Recorder},
    replay_buffer::{NullReplayBuffer, SimpleReplayBuffer},
    Configurable, Env, GreedyPath, PathExtractor, Policy, ReplayBufferBase, Trainer,
    TrainingSummary, Transition, ValueEstimator,
};
use labyrinth_grid_env::{
    ContinuousMazeEnv, ContinuousMazeEnvConfig, ContinuousObs, GridAct, GridEnv, GridObs,
    UniformRandomPolicy,
};
use labyrinth_tabular_agent::QLearning;
use log::info;
use std::sync::{Arc, Mutex};

/// Flag set from outside, for example by a Ctrl-C handler, to stop training.
pub type StopSignal = Arc<Mutex<bool>>;

fn trainer(config: &RunConfig, stop: Option<StopSignal>) -> Result<Trainer> {
    let trainer = Trainer::build(config.trainer())?;
    Ok(match stop {
        Some(stop) => trainer.with_stop_signal(stop),
        None => trainer,
    })
}

/// Trains a tabular Q-learning agent on `env`.
pub fn train_tabular(
    env: &mut GridEnv,
    config: &RunConfig,
    stop: Option<StopSignal>,
    recorder: &mut dyn AggregateRecorder,
) -> Result<(QLearning<GridEnv>, TrainingSummary<GridObs>)> {
    config.validate()?;
    let mut agent = QLearning::build(config.q_learning(env.n_states()))?;
    let mut buffer = NullReplayBuffer::<Transition<GridObs>>::build(&())?;
    info!("Q-learning on a maze of {} states", env.n_states());

    let summary = trainer(config, stop)?.train(env, &mut agent, &mut buffer, recorder)?;
    Ok((agent, summary))
}

/// Trains a DQN agent on `env` with the one-hot encoding of the agent cell.
pub fn train_dqn(
    env: &mut GridEnv,
    config: &RunConfig,
    stop: Option<StopSignal>,
    recorder: &mut dyn AggregateRecorder,
) -> Result<(Dqn<GridEnv>, TrainingSummary<GridObs>)> {
    config.validate()?;
    let mut agent = Dqn::build(config.dqn_agent(env.n_states()))?;
    let mut buffer = SimpleReplayBuffer::<Transition<GridObs>>::build(&config.replay_buffer())?;
    info!("DQN on a maze of {} states", env.n_states());

    let summary = trainer(config, stop)?.train(env, &mut agent, &mut buffer, recorder)?;
    Ok((agent, summary))
}

/// Greedy path of a trained estimator from the start cell.
pub fn greedy_path<V>(
    estimator: &V,
    env: &mut GridEnv,
    max_steps: usize,
) -> Result<GreedyPath<GridObs, GridAct>>
where
    V: ValueEstimator<Obs = GridObs> + ?Sized,
{
    PathExtractor::new(max_steps).extract(estimator, env)
}

/// Cells visited along a path, the start and the final cell included.
pub fn path_cells(path: &GreedyPath<GridObs, GridAct>) -> Vec<(usize, usize)> {
    path.steps()
        .iter()
        .map(|(obs, _)| obs.position())
        .chain(std::iter::once(path.final_obs().position()))
        .collect()
}

/// Whether a path ends on a goal cell rather than on a wall hit.
pub fn reached_goal(env: &GridEnv, path: &GreedyPath<GridObs, GridAct>) -> bool {
    let (row, col) = path.final_obs().position();
    env.maze().is_goal(row, col)
}

/// Moves an agent with uniformly random actions in the continuous maze.
///
/// Every step record is written to `recorder` with the step index. Returns
/// the final position.
pub fn random_walk(
    config: &ContinuousMazeEnvConfig,
    n_steps: usize,
    seed: u64,
    recorder: &mut dyn Recorder,
) -> Result<ContinuousObs> {
    let mut env = ContinuousMazeEnv::build(config, seed as i64)?;
    let mut policy = UniformRandomPolicy::new(config.max_action, seed);
    let mut obs = env.reset()?;

    for t in 0..n_steps {
        let act = policy.sample(&obs)?;
        let (step, mut record) = env.step(&act)?;
        record.insert("step", RecordValue::Scalar(t as f32));
        recorder.write(record);
        obs = step.obs;
    }
    info!("Random walk ended at ({:.1}, {:.1})", obs.x, obs.y);
    Ok(obs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_core::record::BufferedRecorder;
    use labyrinth_grid_env::{GridEnvConfig, Maze};
    use labyrinth_tabular_agent::{QTable, QTableConfig};

    #[test]
    fn test_path_cells_include_both_ends() -> Result<()> {
        let maze: Maze = "S.G".parse()?;
        let mut env = GridEnv::build(&GridEnvConfig::maze_reward(maze), 0)?;
        let config = RunConfig::default().episodes(50).max_steps_per_episode(50);
        let (agent, _) = train_tabular(&mut env, &config, None, &mut BufferedRecorder::new())?;

        let path = greedy_path(agent.q_table(), &mut env, 10)?;
        assert_eq!(path_cells(&path), vec![(0, 0), (0, 1), (0, 2)]);
        Ok(())
    }

    #[test]
    fn test_path_ending_on_a_wall_misses_the_goal() -> Result<()> {
        let maze: Maze = "#\nS\nG".parse()?;
        let mut env = GridEnv::build(&GridEnvConfig::sparse_goal(maze), 0)?;
        let q_table = QTable::<GridObs>::build(&QTableConfig::default().n_states(env.n_states()))?;

        // Ties go to Up, which hits the wall and ends the episode
        let path = greedy_path(&q_table, &mut env, 10)?;
        assert_eq!(path.len(), 1);
        assert_eq!(path.final_obs().position(), (1, 0));
        assert!(!reached_goal(&env, &path));

        let config = RunConfig::default().episodes(100).max_steps_per_episode(10);
        let (agent, _) = train_tabular(&mut env, &config, None, &mut BufferedRecorder::new())?;
        let path = greedy_path(agent.q_table(), &mut env, 10)?;
        assert!(reached_goal(&env, &path));
        Ok(())
    }

    #[test]
    fn test_random_walk_stays_in_arena() -> Result<()> {
        let config = ContinuousMazeEnvConfig::default();
        let mut recorder = BufferedRecorder::new();
        let obs = random_walk(&config, 100, 1, &mut recorder)?;
        assert!(obs.x >= 10.0 && obs.x <= 590.0);
        assert!(obs.y >= 10.0 && obs.y <= 390.0);

        let records: Vec<_> = recorder.iter().collect();
        assert_eq!(records.len(), 100);
        assert_eq!(records[99].get_scalar("step")?, 99.0);
        assert!(records[0].get_scalar("agent_x").is_ok());
        Ok(())
    }
}
