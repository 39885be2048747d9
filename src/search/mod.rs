//! Distributed IDA* over sliding-tile puzzles.
//!
//! - `arena` / `frontier`: per-peer node storage and the depth-first stack
//! - `ida`: the per-peer search loop, one depth layer at a time
//! - `parallel`: messaging, work sharing and termination across peers

pub mod arena;
pub mod config;
pub mod frontier;
pub mod ida;
pub mod parallel;
pub mod result;

pub use arena::{NodeArena, NodeId, StateSnapshot};
pub use config::SearchConfig;
pub use frontier::Frontier;
pub use ida::{LayerOutcome, PeerSearch};
pub use parallel::{run_parallel_search, ParallelConfig, ParallelResult};
pub use result::{SearchStatistics, Solution};
