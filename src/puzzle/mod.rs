//! Sliding-tile puzzle model: board geometry, states, and expansion.

pub mod board;
pub mod state;

pub use board::{Board, Tile, BLANK};
pub use state::{Direction, PuzzleState};
