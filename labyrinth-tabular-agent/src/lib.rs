#![warn(missing_docs)]
//! Tabular Q-learning.
//!
//! [`QTable`] keeps one value per state-action pair and is updated with the
//! Q-learning rule after every transition. [`QLearning`] is an agent
//! combining it with an epsilon-greedy explorer.
mod q_learning;
mod q_table;
pub use q_learning::{QLearning, QLearningConfig};
pub use q_table::{QTable, QTableConfig};
