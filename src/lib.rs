//! Distributed iterative-deepening A* solver for rectangular sliding-tile puzzles.

pub mod error;
pub mod puzzle;
pub mod search;

pub use error::SolverError;
pub use puzzle::{Board, Direction, PuzzleState, Tile, BLANK};
pub use search::{run_parallel_search, ParallelConfig, ParallelResult, SearchConfig, Solution};
