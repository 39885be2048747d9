//! Search-tree nodes and swap-and-clone expansion.

use crate::puzzle::board::{Board, Tile, BLANK};

/// Direction the blank moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Children are generated in this order; the last one pushed is expanded first.
    pub const EXPANSION_ORDER: [Direction; 4] = [
        Direction::Down,
        Direction::Up,
        Direction::Right,
        Direction::Left,
    ];

    /// The move that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            _ => Err(format!(
                "Unknown direction: '{}'. Valid options: up, down, left, right",
                s
            )),
        }
    }
}

/// One node of the search tree.
///
/// `heuristic` is the Manhattan distance of `grid` plus `depth`, fixed at
/// construction, so it can be compared directly against an IDA* bound.
/// Parent links live in the search arena, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleState {
    grid: Box<[Tile]>,
    blank: usize,
    depth: u32,
    heuristic: u32,
    last_move: Option<Direction>,
}

impl PuzzleState {
    /// The distinguished root: depth 0, no move.
    pub fn root(board: &Board, grid: &[Tile]) -> Self {
        Self::with_depth(board, grid.into(), 0, None)
    }

    /// Rebuild a state from its transmitted fields without recomputing the heuristic.
    pub fn restore(
        grid: Box<[Tile]>,
        depth: u32,
        heuristic: u32,
        last_move: Option<Direction>,
    ) -> Self {
        let blank = blank_index(&grid);
        Self {
            grid,
            blank,
            depth,
            heuristic,
            last_move,
        }
    }

    fn with_depth(
        board: &Board,
        grid: Box<[Tile]>,
        depth: u32,
        last_move: Option<Direction>,
    ) -> Self {
        let blank = blank_index(&grid);
        let heuristic = board.manhattan(&grid) + depth;
        Self {
            grid,
            blank,
            depth,
            heuristic,
            last_move,
        }
    }

    pub fn grid(&self) -> &[Tile] {
        &self.grid
    }

    pub fn blank(&self) -> usize {
        self.blank
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn heuristic(&self) -> u32 {
        self.heuristic
    }

    /// Heuristic without the depth term.
    pub fn distance(&self) -> u32 {
        self.heuristic - self.depth
    }

    pub fn last_move(&self) -> Option<Direction> {
        self.last_move
    }

    pub fn is_goal(&self, board: &Board) -> bool {
        board.is_goal(&self.grid)
    }

    /// Bound test: only states whose heuristic does not exceed `bound` are expanded.
    pub fn within_bound(&self, bound: u32) -> bool {
        self.heuristic <= bound
    }

    /// Moves available to the blank from its current cell.
    pub fn legal_moves<'a>(&self, board: &'a Board) -> impl Iterator<Item = Direction> + 'a {
        let blank = self.blank;
        Direction::EXPANSION_ORDER
            .into_iter()
            .filter(move |&dir| board.neighbor(blank, dir).is_some())
    }

    /// Clone the grid, swap the blank one step in `dir` and score the result.
    pub fn child(&self, board: &Board, dir: Direction) -> Option<Self> {
        let target = board.neighbor(self.blank, dir)?;
        let mut grid = self.grid.clone();
        grid.swap(self.blank, target);
        Some(Self::with_depth(board, grid, self.depth + 1, Some(dir)))
    }

    /// One child per legal blank move: 2 in a corner, 3 on an edge, 4 inside.
    pub fn expand(&self, board: &Board) -> Vec<PuzzleState> {
        self.legal_moves(board)
            .filter_map(|dir| self.child(board, dir))
            .collect()
    }
}

fn blank_index(grid: &[Tile]) -> usize {
    grid.iter().position(|&t| t == BLANK).unwrap_or(0)
}
