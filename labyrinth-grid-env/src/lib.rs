#![warn(missing_docs)]
//! Maze environments.
//!
//! [`GridEnv`] is a discrete maze read from a text grid with four moves.
//! Its observations expose both a state index, for tabular estimators, and a
//! one-hot feature vector, for function approximators.
//!
//! [`ContinuousMazeEnv`] is an arena with rectangular walls where the agent
//! moves by continuous displacements.
//!
//! ```no_run
//! use labyrinth_core::Env;
//! use labyrinth_grid_env::{GridEnv, GridEnvConfig, Maze};
//!
//! # fn main() -> anyhow::Result<()> {
//! let maze = Maze::load("labyrinth/mazes/open4x4.txt")?;
//! let mut env = GridEnv::build(&GridEnvConfig::sparse_goal(maze), 0)?;
//! let obs = env.reset()?;
//! # Ok(())
//! # }
//! ```
mod act;
mod continuous;
mod env;
mod maze;
mod obs;
pub use act::GridAct;
pub use continuous::{
    ContinuousAct, ContinuousMazeEnv, ContinuousMazeEnvConfig, ContinuousObs, Rect,
    UniformRandomPolicy,
};
pub use env::{CollisionPolicy, GridEnv, GridEnvConfig, GridInfo, Snapshot};
pub use maze::{CellKind, Maze};
pub use obs::GridObs;
