//! Maze grid.
use anyhow::Result;
use labyrinth_core::error::LabyrinthError;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path, str::FromStr};

/// Kind of a cell of a [`Maze`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// A free cell.
    Empty,

    /// A cell the agent cannot enter.
    Wall,

    /// The cell where the agent starts.
    Start,

    /// A cell ending the episode.
    Goal,
}

impl CellKind {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '#' => Some(Self::Wall),
            '.' | ' ' => Some(Self::Empty),
            'S' => Some(Self::Start),
            'G' => Some(Self::Goal),
            _ => None,
        }
    }

    fn to_char(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Empty => '.',
            Self::Start => 'S',
            Self::Goal => 'G',
        }
    }
}

const BUILTIN: [&str; 13] = [
    "#############",
    "#S..#.......#",
    "##.########.#",
    "#...........#",
    "#.####.####.#",
    "#G...#....#.#",
    "####.####.#.#",
    "##.#....#...#",
    "#..#.##.#####",
    "#.#####.#...#",
    "#.#.......###",
    "#.#######..##",
    "#############",
];

/// An immutable rectangular grid of cells.
///
/// A maze has exactly one start cell and at least one goal cell. In the text
/// format, each line is a row: `#` is a wall, `.` or a space is an empty
/// cell, `S` is the start and `G` is a goal.
///
/// ```
/// use labyrinth_grid_env::{CellKind, Maze};
///
/// let maze: Maze = "S.#\n..G\n".parse().unwrap();
/// assert_eq!((maze.n_rows(), maze.n_cols()), (2, 3));
/// assert_eq!(maze.cell(0, 2), Some(CellKind::Wall));
/// assert_eq!(maze.start(), (0, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Maze {
    n_rows: usize,
    n_cols: usize,
    cells: Vec<CellKind>,
    start: (usize, usize),
    goals: Vec<(usize, usize)>,
}

impl Maze {
    /// Constructs a maze from its rows.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LabyrinthError> {
        if rows.is_empty() {
            return Err(LabyrinthError::InvalidMaze("the grid is empty".to_string()));
        }

        let n_cols = rows[0].as_ref().chars().count();
        if n_cols == 0 {
            return Err(LabyrinthError::InvalidMaze("the grid is empty".to_string()));
        }

        let mut cells = Vec::with_capacity(rows.len() * n_cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != n_cols {
                return Err(LabyrinthError::InvalidMaze(format!(
                    "row {} has {} cells, expected {}",
                    i,
                    row.chars().count(),
                    n_cols
                )));
            }
            for (j, c) in row.chars().enumerate() {
                let cell = CellKind::from_char(c).ok_or_else(|| {
                    LabyrinthError::InvalidMaze(format!("unknown cell {:?} at ({}, {})", c, i, j))
                })?;
                cells.push(cell);
            }
        }

        let positions = |kind: CellKind| -> Vec<(usize, usize)> {
            cells
                .iter()
                .enumerate()
                .filter(|(_, c)| **c == kind)
                .map(|(ix, _)| (ix / n_cols, ix % n_cols))
                .collect()
        };

        let starts = positions(CellKind::Start);
        if starts.len() != 1 {
            return Err(LabyrinthError::InvalidMaze(format!(
                "expected exactly one start cell, found {}",
                starts.len()
            )));
        }
        let goals = positions(CellKind::Goal);
        if goals.is_empty() {
            return Err(LabyrinthError::InvalidMaze("no goal cell".to_string()));
        }

        Ok(Self {
            n_rows: rows.len(),
            n_cols,
            cells,
            start: starts[0],
            goals,
        })
    }

    /// Loads a maze from a text file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(text.parse::<Self>()?)
    }

    /// A grid without walls, starting at the top-left corner with the goal at
    /// the bottom-right corner.
    pub fn open(n_rows: usize, n_cols: usize) -> Result<Self, LabyrinthError> {
        let rows: Vec<String> = (0..n_rows)
            .map(|i| {
                (0..n_cols)
                    .map(|j| match (i, j) {
                        (0, 0) => 'S',
                        _ if i + 1 == n_rows && j + 1 == n_cols => 'G',
                        _ => '.',
                    })
                    .collect()
            })
            .collect();
        Self::from_rows(&rows)
    }

    /// The 13x13 maze the command line tool trains on by default.
    pub fn builtin() -> Result<Self, LabyrinthError> {
        Self::from_rows(&BUILTIN)
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Returns the kind of the cell, `None` outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> Option<CellKind> {
        if row < self.n_rows && col < self.n_cols {
            Some(self.cells[row * self.n_cols + col])
        } else {
            None
        }
    }

    /// Position of the start cell.
    pub fn start(&self) -> (usize, usize) {
        self.start
    }

    /// Positions of the goal cells in row-major order.
    pub fn goals(&self) -> &[(usize, usize)] {
        &self.goals
    }

    /// Returns `true` if the cell is a wall.
    pub fn is_wall(&self, row: usize, col: usize) -> bool {
        self.cell(row, col) == Some(CellKind::Wall)
    }

    /// Returns `true` if the cell is a goal.
    pub fn is_goal(&self, row: usize, col: usize) -> bool {
        self.cell(row, col) == Some(CellKind::Goal)
    }

    /// Returns the rows of the maze in the text format.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.n_cols)
            .map(|row| row.iter().map(|c| c.to_char()).collect())
            .collect()
    }

    /// Draws the maze with the given cells marked by `*`.
    ///
    /// Start and goal cells keep their marker.
    pub fn draw_path(&self, path: &[(usize, usize)]) -> String {
        let mut rows: Vec<Vec<char>> = self.rows().into_iter().map(|r| r.chars().collect()).collect();
        for &(i, j) in path {
            if self.cell(i, j) == Some(CellKind::Empty) {
                rows[i][j] = '*';
            }
        }
        rows.into_iter()
            .map(|r| r.into_iter().collect::<String>() + "\n")
            .collect()
    }
}

impl FromStr for Maze {
    type Err = LabyrinthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows: Vec<&str> = s.lines().collect();
        while rows.last().map_or(false, |r| r.is_empty()) {
            rows.pop();
        }
        Self::from_rows(&rows)
    }
}

impl TryFrom<Vec<String>> for Maze {
    type Error = LabyrinthError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<Maze> for Vec<String> {
    fn from(maze: Maze) -> Self {
        maze.rows()
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(s: &str) -> bool {
        matches!(s.parse::<Maze>(), Err(LabyrinthError::InvalidMaze(_)))
    }

    #[test]
    fn test_parse_maze() -> Result<()> {
        let maze: Maze = "#S #\n#..#\n#G.#\n".parse()?;
        assert_eq!(maze.n_rows(), 3);
        assert_eq!(maze.n_cols(), 4);
        assert_eq!(maze.start(), (0, 1));
        assert_eq!(maze.goals(), &[(2, 1)]);
        assert_eq!(maze.cell(0, 2), Some(CellKind::Empty));
        assert!(maze.is_wall(1, 3));
        assert_eq!(maze.cell(3, 0), None);
        assert_eq!(maze.to_string(), "#S.#\n#..#\n#G.#\n");
        Ok(())
    }

    #[test]
    fn test_invalid_mazes() {
        assert!(invalid(""));
        assert!(invalid("\n"));
        assert!(invalid("S..\n..\n..G"));
        assert!(invalid("S.x\n..G"));
        assert!(invalid("...\n..G"));
        assert!(invalid("S.S\n..G"));
        assert!(invalid("S..\n..."));
    }

    #[test]
    fn test_open_maze() -> Result<()> {
        let maze = Maze::open(4, 4)?;
        assert_eq!(maze.start(), (0, 0));
        assert_eq!(maze.goals(), &[(3, 3)]);
        assert!(maze.rows().iter().all(|r| !r.contains('#')));
        assert!(Maze::open(1, 1).is_err());
        Ok(())
    }

    #[test]
    fn test_builtin_maze() -> Result<()> {
        let maze = Maze::builtin()?;
        assert_eq!((maze.n_rows(), maze.n_cols()), (13, 13));
        assert_eq!(maze.start(), (1, 1));
        assert_eq!(maze.goals(), &[(5, 1)]);
        Ok(())
    }

    #[test]
    fn test_serde_maze_as_rows() -> Result<()> {
        let maze: Maze = "S.\n#G".parse()?;
        let yaml = serde_yaml::to_string(&maze)?;
        let maze_: Maze = serde_yaml::from_str(&yaml)?;
        assert_eq!(maze, maze_);

        let rows: Vec<String> = serde_yaml::from_str(&yaml)?;
        assert_eq!(rows, vec!["S.".to_string(), "#G".to_string()]);

        assert!(serde_yaml::from_str::<Maze>("- S.\n- ..\n").is_err());
        Ok(())
    }

    #[test]
    fn test_draw_path() -> Result<()> {
        let maze: Maze = "S..\n##.\nG..".parse()?;
        let drawn = maze.draw_path(&[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2), (2, 1), (2, 0)]);
        assert_eq!(drawn, "S**\n##*\nG**\n");
        Ok(())
    }
}
