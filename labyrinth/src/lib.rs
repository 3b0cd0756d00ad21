//! Trains agents to find the shortest path through a grid maze.
//!
//! The `labyrinth` binary wraps the functions of this crate:
//!
//! * `labyrinth tabular` trains a Q-table, by default on the built-in 13x13 maze.
//! * `labyrinth dqn` trains a Q-network with experience replay, by default on
//!   an open 4x4 maze.
//! * `labyrinth random-walk` moves an agent randomly in the continuous maze.
//!
//! After training, the greedy path is printed over the maze:
//!
//! ```text
//! S**.
//! ..*.
//! ..*.
//! ..*G
//! ```
mod config;
mod recorder;
mod run;
pub use config::RunConfig;
pub use recorder::LoggingRecorder;
pub use run::{
    greedy_path, path_cells, random_walk, reached_goal, train_dqn, train_tabular, StopSignal,
};
