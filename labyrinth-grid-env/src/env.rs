mod config;
use crate::{GridAct, GridObs, Maze};
use anyhow::Result;
pub use config::{CollisionPolicy, GridEnvConfig};
use labyrinth_core::{
    record::{Record, RecordValue},
    Env, Info, Step,
};
use log::trace;

/// What happened in a step besides the reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridInfo {
    /// The move was blocked by a wall.
    pub hit_wall: bool,

    /// The agent is on a goal cell.
    pub reached_goal: bool,
}

impl Info for GridInfo {}

/// What a renderer needs to draw the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Row of the agent.
    pub agent_row: usize,

    /// Column of the agent.
    pub agent_col: usize,

    /// Row of the first goal cell.
    pub goal_row: usize,

    /// Column of the first goal cell.
    pub goal_col: usize,
}

impl From<Snapshot> for Record {
    fn from(s: Snapshot) -> Self {
        Record::from_slice(&[
            ("agent_row", RecordValue::Scalar(s.agent_row as f32)),
            ("agent_col", RecordValue::Scalar(s.agent_col as f32)),
            ("goal_row", RecordValue::Scalar(s.goal_row as f32)),
            ("goal_col", RecordValue::Scalar(s.goal_col as f32)),
        ])
    }
}

/// Agent moving on a [`Maze`] toward a goal cell.
///
/// The environment is deterministic. A move out of the grid leaves the agent
/// in place and is rewarded like any other step. A move into a wall leaves the
/// agent in place as well, is rewarded with the wall reward and, depending on
/// the [`CollisionPolicy`], ends the episode. Entering a goal cell ends the
/// episode with the goal reward.
///
/// ```
/// use labyrinth_core::Env;
/// use labyrinth_grid_env::{GridAct, GridEnv, GridEnvConfig, Maze};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = GridEnvConfig::maze_reward(Maze::open(2, 2)?);
/// let mut env = GridEnv::build(&config, 0)?;
/// env.reset()?;
/// let (step, _) = env.step(&GridAct::Right)?;
/// assert_eq!(step.obs.position(), (0, 1));
/// let (step, _) = env.step(&GridAct::Down)?;
/// assert!(step.is_terminated);
/// assert_eq!(step.reward, 10.0);
/// # Ok(())
/// # }
/// ```
pub struct GridEnv {
    maze: Maze,
    start: (usize, usize),
    pos: (usize, usize),
    goal_reward: f32,
    step_reward: f32,
    wall_reward: f32,
    collision: CollisionPolicy,
}

impl GridEnv {
    /// The maze.
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Current observation.
    pub fn obs(&self) -> GridObs {
        GridObs::new(self.pos.0, self.pos.1, self.maze.n_rows(), self.maze.n_cols())
    }

    /// Number of states, `n_rows * n_cols`.
    pub fn n_states(&self) -> usize {
        self.maze.n_rows() * self.maze.n_cols()
    }

    /// Positions of the agent and the goal.
    pub fn snapshot(&self) -> Snapshot {
        let (goal_row, goal_col) = self.maze.goals()[0];
        Snapshot {
            agent_row: self.pos.0,
            agent_col: self.pos.1,
            goal_row,
            goal_col,
        }
    }

    // Target cell of a move, clamped to the grid.
    fn target(&self, act: &GridAct) -> (usize, usize) {
        let (dr, dc) = act.offset();
        let clamp = |v: usize, d: isize, n: usize| -> usize {
            v.checked_add_signed(d).map_or(v, |v| v.min(n - 1))
        };
        (
            clamp(self.pos.0, dr, self.maze.n_rows()),
            clamp(self.pos.1, dc, self.maze.n_cols()),
        )
    }
}

impl Env for GridEnv {
    type Config = GridEnvConfig;
    type Obs = GridObs;
    type Act = GridAct;
    type Info = GridInfo;

    /// The seed is ignored.
    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        config.validate()?;
        let start = config.start_cell();

        Ok(Self {
            maze: config.maze.clone(),
            start,
            pos: start,
            goal_reward: config.goal_reward,
            step_reward: config.step_reward,
            wall_reward: config.wall_reward,
            collision: config.collision,
        })
    }

    fn step(&mut self, a: &GridAct) -> Result<(Step<Self>, Record)> {
        let (reward, is_terminated, info) = if self.maze.is_goal(self.pos.0, self.pos.1) {
            // Only reachable when starting on a goal
            let info = GridInfo {
                hit_wall: false,
                reached_goal: true,
            };
            (self.goal_reward, true, info)
        } else {
            let (row, col) = self.target(a);
            if self.maze.is_wall(row, col) {
                let info = GridInfo {
                    hit_wall: true,
                    reached_goal: false,
                };
                let done = self.collision == CollisionPolicy::Terminate;
                (self.wall_reward, done, info)
            } else {
                self.pos = (row, col);
                if self.maze.is_goal(row, col) {
                    let info = GridInfo {
                        hit_wall: false,
                        reached_goal: true,
                    };
                    (self.goal_reward, true, info)
                } else {
                    (self.step_reward, false, GridInfo::default())
                }
            }
        };
        trace!("{} -> {:?}, reward {}", a, self.pos, reward);

        let step = Step::new(self.obs(), *a, reward, is_terminated, info);
        Ok((step, self.snapshot().into()))
    }

    fn reset(&mut self) -> Result<GridObs> {
        self.pos = self.start;
        Ok(self.obs())
    }
}
