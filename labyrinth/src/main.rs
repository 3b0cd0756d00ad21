use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use labyrinth::{
    greedy_path, path_cells, random_walk, reached_goal, train_dqn, train_tabular, LoggingRecorder,
    RunConfig, StopSignal,
};
use labyrinth_core::{
    error::LabyrinthError,
    replay_buffer::{NullReplayBuffer, SimpleReplayBuffer},
    Agent, Env, TrainingSummary, Transition, ValueEstimator,
};
use labyrinth_grid_env::{ContinuousMazeEnvConfig, GridEnv, GridEnvConfig, GridObs, Maze};
use log::{info, warn};
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

/// Trains reinforcement learning agents to solve grid mazes.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Q-learning with a table of action values.
    Tabular(TrainArgs),

    /// Q-learning with a neural network and experience replay.
    Dqn(TrainArgs),

    /// Random moves in the continuous maze.
    RandomWalk {
        /// Number of steps.
        #[arg(short, long, default_value_t = 1000)]
        steps: usize,

        /// Random seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Maze file. Defaults to the built-in maze of the subcommand.
    #[arg(short, long)]
    maze: Option<PathBuf>,

    /// Run configuration in YAML.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of episodes, overriding the configuration.
    #[arg(short, long)]
    episodes: Option<usize>,

    /// Reward scheme.
    #[arg(short, long, value_enum, default_value_t = Reward::MazeReward)]
    reward: Reward,

    /// Directory where the learned parameters and the configuration are saved.
    #[arg(short, long)]
    save: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Reward {
    /// Goal 10, step -0.01, wall -1 without ending the episode.
    MazeReward,

    /// Goal 1, step 0, wall -1 ending the episode.
    SparseGoal,
}

impl TrainArgs {
    fn run_config(&self, default: RunConfig) -> Result<RunConfig> {
        let config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => default,
        };
        Ok(match self.episodes {
            Some(n) => config.episodes(n),
            None => config,
        })
    }

    fn env(&self, default: Maze) -> Result<GridEnv> {
        let maze = match &self.maze {
            Some(path) => Maze::load(path)?,
            None => default,
        };
        let config = match self.reward {
            Reward::MazeReward => GridEnvConfig::maze_reward(maze),
            Reward::SparseGoal => GridEnvConfig::sparse_goal(maze),
        };
        GridEnv::build(&config, 0)
    }

    fn save_config(&self, config: &RunConfig) -> Result<Option<&Path>> {
        match &self.save {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                config.save(dir.join("run.yaml"))?;
                Ok(Some(dir.as_path()))
            }
            None => Ok(None),
        }
    }
}

fn stop_signal() -> Result<StopSignal> {
    let stop = Arc::new(Mutex::new(false));
    let stop_ = stop.clone();
    ctrlc::set_handler(move || {
        if let Ok(mut stop) = stop_.lock() {
            *stop = true;
        }
    })?;
    Ok(stop)
}

fn show_path<V>(estimator: &V, env: &mut GridEnv, max_steps: usize) -> Result<()>
where
    V: ValueEstimator<Obs = GridObs> + ?Sized,
{
    match greedy_path(estimator, env, max_steps) {
        Ok(path) => {
            info!(
                "Greedy path of {} steps, return {:.2}",
                path.len(),
                path.total_reward()
            );
            let actions: Vec<_> = path.actions().map(|a| a.to_string()).collect();
            println!("{}", actions.join(" "));
            print!("{}", env.maze().draw_path(&path_cells(&path)));
            if !reached_goal(env, &path) {
                warn!("The greedy path ended without reaching a goal");
            }
            Ok(())
        }
        Err(e) => match e.downcast_ref::<LabyrinthError>() {
            Some(LabyrinthError::Incomplete(n)) => {
                warn!("The greedy policy did not reach a goal within {} steps", n);
                Ok(())
            }
            _ => Err(e),
        },
    }
}

fn tabular(args: &TrainArgs, stop: StopSignal) -> Result<()> {
    let config = args.run_config(RunConfig::default())?;
    let mut env = args.env(Maze::builtin()?)?;
    let mut recorder = LoggingRecorder::new();
    let (agent, summary) = train_tabular(&mut env, &config, Some(stop), &mut recorder)?;
    report(&summary);

    if let Some(dir) = args.save_config(&config)? {
        Agent::<GridEnv, NullReplayBuffer<Transition<GridObs>>>::save_params(&agent, dir)?;
    }
    show_path(agent.q_table(), &mut env, config.max_steps_per_episode)
}

fn dqn(args: &TrainArgs, stop: StopSignal) -> Result<()> {
    let config = args.run_config(RunConfig::dqn())?;
    let mut env = args.env(Maze::open(4, 4)?)?;
    let mut recorder = LoggingRecorder::new();
    let (agent, summary) = train_dqn(&mut env, &config, Some(stop), &mut recorder)?;
    report(&summary);

    if let Some(dir) = args.save_config(&config)? {
        Agent::<GridEnv, SimpleReplayBuffer<Transition<GridObs>>>::save_params(&agent, dir)?;
    }
    show_path(agent.q_network(), &mut env, config.max_steps_per_episode)
}

fn report(summary: &TrainingSummary<GridObs>) {
    if summary.cancelled {
        warn!("Training stopped after {} episodes", summary.episodes());
    }
    info!(
        "{} of {} episodes reached a terminal state",
        summary.n_terminated(),
        summary.episodes()
    );
    if let Some(best) = &summary.best_episode {
        info!("Shortest episode: {} steps in episode {}", best.steps(), best.episode);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Tabular(args) => tabular(args, stop_signal()?),
        Command::Dqn(args) => dqn(args, stop_signal()?),
        Command::RandomWalk { steps, seed } => {
            let config = ContinuousMazeEnvConfig::default();
            random_walk(&config, *steps, *seed, &mut LoggingRecorder::new())?;
            Ok(())
        }
    }
}
