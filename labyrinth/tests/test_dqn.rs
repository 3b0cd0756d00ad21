use anyhow::Result;
use labyrinth::{greedy_path, reached_goal, train_dqn, LoggingRecorder, RunConfig};
use labyrinth_core::{Env, ValueEstimator};
use labyrinth_grid_env::{GridAct, GridEnv, GridEnvConfig, Maze};
use tempdir::TempDir;

#[test_log::test]
fn test_dqn_on_open_grid() -> Result<()> {
    for seed in 1..=3 {
        let mut env = GridEnv::build(&GridEnvConfig::maze_reward(Maze::open(4, 4)?), 0)?;
        let config = RunConfig::dqn().seed(seed);
        let mut recorder = LoggingRecorder::new();
        let (agent, summary) = train_dqn(&mut env, &config, None, &mut recorder)?;
        assert_eq!(summary.episodes(), 200);
        assert!(agent.n_opts() > 0);
        assert_eq!(summary.best_episode.as_ref().map(|b| b.steps()), Some(6));

        let flushed = recorder.last_flushed().expect("no flush");
        assert!(flushed.get_scalar("episode_steps_mean").is_ok());

        let path = greedy_path(agent.q_network(), &mut env, 50)?;
        assert_eq!(path.len(), 6);
        assert!(path
            .actions()
            .all(|a| *a == GridAct::Down || *a == GridAct::Right));
        assert_eq!(path.final_obs().position(), (3, 3));
        assert!(reached_goal(&env, &path));
    }
    Ok(())
}

#[test_log::test]
fn test_run_config_file() -> Result<()> {
    let dir = TempDir::new("labyrinth")?;
    let path = dir.path().join("run.yaml");
    std::fs::write(
        &path,
        "learning_rate: 0.005\nepisodes: 3\nmax_steps_per_episode: 10\nbatch_size: 4\nhidden_units: [8]\n",
    )?;
    let config = RunConfig::load(&path)?;

    let mut env = GridEnv::build(&GridEnvConfig::sparse_goal(Maze::open(3, 3)?), 0)?;
    let (agent, summary) = train_dqn(&mut env, &config, None, &mut LoggingRecorder::new())?;
    assert_eq!(summary.episodes(), 3);
    assert_eq!(agent.q_network().n_actions(), 4);
    assert_eq!(env.reset()?.position(), (0, 0));
    Ok(())
}
