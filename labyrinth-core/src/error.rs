//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
///
/// Most fallible functions return [`anyhow::Result`]; these variants can be
/// recovered with `err.downcast_ref::<LabyrinthError>()`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LabyrinthError {
    /// An action index outside the action set of the environment.
    #[error("Invalid action index: {0}")]
    InvalidAction(usize),

    /// A malformed maze grid.
    #[error("Invalid maze: {0}")]
    InvalidMaze(String),

    /// A state the value estimator cannot represent.
    #[error("State {state} is out of range (the estimator covers {size})")]
    StateOutOfRange {
        /// Index of the state, or the length of its feature vector.
        state: usize,

        /// Number of states, or the input dimension, of the estimator.
        size: usize,
    },

    /// More samples were requested than the replay buffer holds.
    #[error("Requested {requested} samples, but only {available} are stored")]
    InsufficientSamples {
        /// Requested batch size.
        requested: usize,

        /// Number of stored items.
        available: usize,
    },

    /// A greedy rollout did not terminate within the step budget.
    #[error("Greedy rollout did not terminate within {0} steps")]
    Incomplete(usize),

    /// A configuration value outside its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
