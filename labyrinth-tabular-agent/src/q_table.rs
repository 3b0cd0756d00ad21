//! Action-value table.
mod base;
mod config;
pub use base::QTable;
pub use config::QTableConfig;
