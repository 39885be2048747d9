//! Error types shared by the solver and its cluster runtime.

/// Errors that stop a solve before or during the search.
///
/// Everything except `Aborted` and `PeerPanicked` is a configuration error:
/// it is detected before any peer sends a message, and the detecting peer
/// shuts the whole runtime down.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolverError {
    #[error("invalid puzzle dimensions {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("puzzle length {len} does not match {rows}x{cols}")]
    LengthMismatch { len: usize, rows: usize, cols: usize },

    #[error("puzzle must contain every tile from 0 to {max} exactly once")]
    InvalidTiles { max: usize },

    #[error("puzzle is not solvable")]
    Unsolvable,

    #[error("messaging runtime was aborted")]
    Aborted,

    #[error("peer {0} panicked")]
    PeerPanicked(usize),
}

impl SolverError {
    /// True for errors caused by the supplied puzzle rather than the runtime.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SolverError::InvalidDimensions { .. }
                | SolverError::LengthMismatch { .. }
                | SolverError::InvalidTiles { .. }
                | SolverError::Unsolvable
        )
    }
}
