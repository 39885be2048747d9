//! Cooperative search across a cluster of peers.
//!
//! # Architecture
//!
//! The cluster consists of:
//! - A **coordinator** that starts one thread per peer and joins the results
//! - A **channel** layer: tagged point-to-point messages plus a barrier
//! - **Work sharing**: idle peers ask a random peer for half of its frontier
//! - A **token ring** that detects when every frontier is empty
//! - **Broadcasts** for "goal found" and "layer exhausted"
//!
//! # Example
//!
//! ```ignore
//! use tilering::puzzle::Board;
//! use tilering::search::{ParallelConfig, SearchConfig, run_parallel_search};
//!
//! let board = Board::new(3, 3)?;
//! let config = ParallelConfig::default().with_peers(4).with_seed(7);
//! let result = run_parallel_search(board, &grid, &SearchConfig::default(), &config)?;
//! println!("{}", result.solution);
//! ```

pub mod broadcast;
pub mod channel;
pub mod config;
pub mod coordinator;
pub mod peer;
pub mod token;
pub mod work;

pub use channel::{create_mesh, AbortHandle, MeshEndpoint, Message, Source, Tag, Transport};
pub use config::ParallelConfig;
pub use coordinator::{run_parallel_search, ParallelResult};
pub use peer::Peer;
pub use token::{Color, Token};
