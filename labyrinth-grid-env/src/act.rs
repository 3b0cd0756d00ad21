//! Action of [`GridEnv`](crate::GridEnv).
use labyrinth_core::{error::LabyrinthError, Act, DiscreteAct};
use std::fmt;

/// A move to a neighbouring cell.
///
/// The discriminants are the action indices used by value estimators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridAct {
    /// `(-1, 0)`
    Up = 0,

    /// `(+1, 0)`
    Down = 1,

    /// `(0, -1)`
    Left = 2,

    /// `(0, +1)`
    Right = 3,
}

impl GridAct {
    /// All actions in index order.
    pub const ALL: [GridAct; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Offset of the move as `(row, col)`.
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

impl Act for GridAct {}

impl DiscreteAct for GridAct {
    fn n_actions() -> usize {
        Self::ALL.len()
    }

    fn index(&self) -> usize {
        *self as usize
    }

    fn from_index(ix: usize) -> Result<Self, LabyrinthError> {
        Self::ALL
            .get(ix)
            .copied()
            .ok_or(LabyrinthError::InvalidAction(ix))
    }
}

impl fmt::Display for GridAct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        write!(f, "{}", s)
    }
}
