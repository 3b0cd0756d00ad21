//! Configuration of [`GridEnv`](super::GridEnv).
use crate::{CellKind, Maze};
use labyrinth_core::error::LabyrinthError;
use serde::{Deserialize, Serialize};

/// What happens when the agent moves into a wall.
///
/// In both cases the agent stays where it is and receives the wall reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The episode goes on.
    Penalize,

    /// The episode terminates.
    Terminate,
}

/// Configuration of [`GridEnv`](super::GridEnv).
///
/// Use one of the presets [`GridEnvConfig::maze_reward`] and
/// [`GridEnvConfig::sparse_goal`], then adjust with the setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridEnvConfig {
    pub(super) maze: Maze,

    /// Overrides the start cell of the maze.
    #[serde(default)]
    pub(super) start: Option<(usize, usize)>,

    pub(super) goal_reward: f32,
    pub(super) step_reward: f32,
    pub(super) wall_reward: f32,
    pub(super) collision: CollisionPolicy,
}

impl GridEnvConfig {
    /// Rewards `+10` at the goal, `-0.01` per step and `-1` for bumping into
    /// a wall, which does not end the episode.
    pub fn maze_reward(maze: Maze) -> Self {
        Self {
            maze,
            start: None,
            goal_reward: 10.0,
            step_reward: -0.01,
            wall_reward: -1.0,
            collision: CollisionPolicy::Penalize,
        }
    }

    /// Rewards `+1` at the goal and nothing per step. Bumping into a wall
    /// ends the episode with `-1`.
    pub fn sparse_goal(maze: Maze) -> Self {
        Self {
            maze,
            start: None,
            goal_reward: 1.0,
            step_reward: 0.0,
            wall_reward: -1.0,
            collision: CollisionPolicy::Terminate,
        }
    }

    /// Places the agent on `(row, col)` instead of the start cell of the maze.
    pub fn start(mut self, row: usize, col: usize) -> Self {
        self.start = Some((row, col));
        self
    }

    /// Sets the reward for entering a goal cell.
    pub fn goal_reward(mut self, v: f32) -> Self {
        self.goal_reward = v;
        self
    }

    /// Sets the reward of any other step.
    pub fn step_reward(mut self, v: f32) -> Self {
        self.step_reward = v;
        self
    }

    /// Sets the reward for moving into a wall.
    pub fn wall_reward(mut self, v: f32) -> Self {
        self.wall_reward = v;
        self
    }

    /// Sets the collision policy.
    pub fn collision(mut self, v: CollisionPolicy) -> Self {
        self.collision = v;
        self
    }

    /// The maze.
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Start cell, taking the override into account.
    pub fn start_cell(&self) -> (usize, usize) {
        self.start.unwrap_or_else(|| self.maze.start())
    }

    /// Checks that the start cell lies inside the grid and is not a wall.
    pub fn validate(&self) -> Result<(), LabyrinthError> {
        let (row, col) = self.start_cell();
        match self.maze.cell(row, col) {
            None => Err(LabyrinthError::InvalidConfig(format!(
                "start ({}, {}) is outside the {}x{} grid",
                row,
                col,
                self.maze.n_rows(),
                self.maze.n_cols()
            ))),
            Some(CellKind::Wall) => Err(LabyrinthError::InvalidConfig(format!(
                "start ({}, {}) is a wall",
                row, col
            ))),
            Some(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_serde_grid_env_config() -> Result<()> {
        let maze: Maze = "S.#\n..G".parse()?;
        let config = GridEnvConfig::sparse_goal(maze).start(1, 0);
        let yaml = serde_yaml::to_string(&config)?;
        assert!(yaml.contains("terminate"));
        let config_: GridEnvConfig = serde_yaml::from_str(&yaml)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_start_override_is_validated() -> Result<()> {
        let maze: Maze = "S.#\n..G".parse()?;
        let config = GridEnvConfig::maze_reward(maze);
        assert!(config.clone().start(1, 1).validate().is_ok());
        assert!(config.clone().start(0, 2).validate().is_err());
        assert!(config.start(2, 0).validate().is_err());
        Ok(())
    }
}
