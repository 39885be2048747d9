//! Grid geometry and whole-grid checks for NxM sliding-tile puzzles.
//!
//! Cells are stored row-major: index `i` sits at column `i % cols` and row
//! `i / cols`. Tile `t` belongs at index `t - 1` and the blank (tile 0)
//! belongs in the last cell.

use crate::error::SolverError;
use crate::puzzle::state::Direction;

/// A tile value. `0` is the blank.
pub type Tile = u16;

/// The blank sentinel.
pub const BLANK: Tile = 0;

/// Dimensions of a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
}

impl Board {
    /// Create a board with `rows` rows and `cols` columns.
    pub fn new(rows: usize, cols: usize) -> Result<Self, SolverError> {
        let cells = rows.checked_mul(cols).unwrap_or(usize::MAX);
        if rows == 0 || cols == 0 || cells > Tile::MAX as usize + 1 {
            return Err(SolverError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// `(x, y)` of a cell index: column, then row.
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.cols, index / self.cols)
    }

    /// Cell index of column `x`, row `y`.
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }

    /// The cell reached by moving from `index` one step in `dir`, if it is on the board.
    pub fn neighbor(&self, index: usize, dir: Direction) -> Option<usize> {
        let (x, y) = self.coords(index);
        let (nx, ny) = match dir {
            Direction::Up => (x, y.checked_sub(1)?),
            Direction::Down => (x, y + 1),
            Direction::Left => (x.checked_sub(1)?, y),
            Direction::Right => (x + 1, y),
        };
        if nx < self.cols && ny < self.rows {
            Some(self.index(nx, ny))
        } else {
            None
        }
    }

    /// Manhattan distance of a single tile sitting at `index` from its home cell.
    pub fn tile_distance(&self, tile: Tile, index: usize) -> u32 {
        if tile == BLANK {
            return 0;
        }
        let (x, y) = self.coords(index);
        let (gx, gy) = self.coords(tile as usize - 1);
        (x.abs_diff(gx) + y.abs_diff(gy)) as u32
    }

    /// Sum of all tile distances, ignoring the blank.
    pub fn manhattan(&self, grid: &[Tile]) -> u32 {
        grid.iter()
            .enumerate()
            .map(|(index, &tile)| self.tile_distance(tile, index))
            .sum()
    }

    /// Every cell except the last holds `index + 1`.
    pub fn is_goal(&self, grid: &[Tile]) -> bool {
        grid.iter()
            .take(grid.len().saturating_sub(1))
            .enumerate()
            .all(|(i, &tile)| tile as usize == i + 1)
    }

    /// The canonical solved grid.
    pub fn goal(&self) -> Vec<Tile> {
        let n = self.len();
        (1..n).map(|t| t as Tile).chain(std::iter::once(BLANK)).collect()
    }

    pub fn check_length(&self, len: usize) -> Result<(), SolverError> {
        if len != self.len() {
            return Err(SolverError::LengthMismatch {
                len,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// The grid must be a permutation of `0..rows*cols`.
    pub fn check_tiles(&self, grid: &[Tile]) -> Result<(), SolverError> {
        let mut seen = vec![false; grid.len()];
        for &tile in grid {
            match seen.get_mut(tile as usize) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(SolverError::InvalidTiles {
                        max: grid.len().saturating_sub(1),
                    });
                }
            }
        }
        Ok(())
    }

    /// Number of tile pairs out of order, ignoring the blank.
    pub fn inversions(grid: &[Tile]) -> usize {
        let tiles: Vec<Tile> = grid.iter().copied().filter(|&t| t != BLANK).collect();
        let mut count = 0;
        for (i, &a) in tiles.iter().enumerate() {
            count += tiles[i + 1..].iter().filter(|&&b| b < a).count();
        }
        count
    }

    /// Permutation-parity solvability test.
    ///
    /// Odd width: solvable iff the inversion count is even. Even width: the
    /// blank's row, counted 1-based from the bottom, must have the opposite
    /// parity of the inversion count. For an even number of rows this is the
    /// same as requiring the row counted from the top to share the parity of
    /// the inversion count.
    pub fn is_solvable(&self, grid: &[Tile]) -> bool {
        let inversions = Self::inversions(grid);
        if self.cols % 2 == 1 {
            return inversions % 2 == 0;
        }
        let blank = grid.iter().position(|&t| t == BLANK).unwrap_or(0);
        let (_, y) = self.coords(blank);
        let row_from_bottom = self.rows - y;
        (inversions + row_from_bottom) % 2 == 1
    }

    /// Run every configuration check in order: length, tiles, solvability.
    pub fn validate(&self, grid: &[Tile]) -> Result<(), SolverError> {
        self.check_length(grid.len())?;
        self.check_tiles(grid)?;
        if !self.is_solvable(grid) {
            return Err(SolverError::Unsolvable);
        }
        Ok(())
    }

    /// Replay blank moves against `grid`. Returns `None` if a move leaves the board.
    pub fn apply_moves(&self, grid: &[Tile], moves: &[Direction]) -> Option<Vec<Tile>> {
        let mut grid = grid.to_vec();
        let mut blank = grid.iter().position(|&t| t == BLANK)?;
        for &dir in moves {
            let target = self.neighbor(blank, dir)?;
            grid.swap(blank, target);
            blank = target;
        }
        Some(grid)
    }
}
