//! Cluster bootstrap: one thread per peer over an in-process mesh.

use crate::error::SolverError;
use crate::puzzle::{Board, Tile};
use crate::search::config::SearchConfig;
use crate::search::ida::PeerSearch;
use crate::search::parallel::channel::{create_mesh, AbortHandle, Transport};
use crate::search::parallel::config::ParallelConfig;
use crate::search::result::{SearchStatistics, Solution};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Result from parallel search execution.
#[derive(Debug)]
pub struct ParallelResult {
    /// The goal path, found by exactly one peer.
    pub solution: Solution,
    /// Rank of the peer that found it.
    pub finder: Option<usize>,
    /// Statistics aggregated from all peers.
    pub total_statistics: SearchStatistics,
    /// Per-peer statistics, by rank.
    pub peer_statistics: Vec<(usize, SearchStatistics)>,
}

/// Shuts the runtime down if the owning peer thread unwinds.
struct AbortOnPanic(AbortHandle);

impl Drop for AbortOnPanic {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.abort();
        }
    }
}

/// Keep the first error, but let a root cause replace the `Aborted` it triggered elsewhere.
fn record_error(slot: &mut Option<SolverError>, err: SolverError) {
    if matches!(slot, None | Some(SolverError::Aborted)) {
        *slot = Some(err);
    }
}

/// Solve `grid` with `parallel_config.num_peers` cooperating peers.
///
/// The puzzle is validated before any peer starts, so a configuration
/// error never reaches the cluster.
pub fn run_parallel_search(
    board: Board,
    grid: &[Tile],
    search_config: &SearchConfig,
    parallel_config: &ParallelConfig,
) -> Result<ParallelResult, SolverError> {
    let start_time = Instant::now();
    board.validate(grid)?;

    let num_peers = parallel_config.num_peers.max(1);
    let grid: Arc<[Tile]> = grid.into();
    let search_config = search_config
        .clone()
        .with_seed_option(parallel_config.base_seed.or(search_config.seed));

    info!(peers = num_peers, rows = board.rows(), cols = board.cols(), "starting cluster");

    let mesh = create_mesh(num_peers);
    let abort = mesh[0].abort_handle();

    let handles: Vec<_> = mesh
        .into_iter()
        .map(|endpoint| {
            let rank = endpoint.rank();
            let grid = Arc::clone(&grid);
            let config = search_config.clone();
            let handle = std::thread::Builder::new()
                .name(format!("peer-{}", rank))
                .spawn(move || {
                    let _guard = AbortOnPanic(endpoint.abort_handle());
                    let mut search = PeerSearch::new(endpoint, board, config);
                    let result = search.solve(&grid);
                    (result, search.into_statistics())
                });
            (rank, handle)
        })
        .collect();

    // A missing peer would leave the others waiting at the first barrier.
    let spawn_failed = handles
        .iter()
        .find_map(|(rank, handle)| handle.as_ref().err().map(|err| (*rank, err.to_string())));
    if let Some((rank, err)) = &spawn_failed {
        warn!(rank, %err, "failed to spawn peer");
        abort.abort();
    }

    let outcomes: Vec<_> = handles
        .into_iter()
        .filter_map(|(rank, handle)| handle.ok().map(|handle| (rank, handle.join())))
        .collect();
    if let Some((rank, _)) = spawn_failed {
        return Err(SolverError::PeerPanicked(rank));
    }

    let mut solution = Solution::None;
    let mut finder = None;
    let mut first_error = None;
    let mut total_statistics = SearchStatistics::default();
    let mut peer_statistics = Vec::with_capacity(num_peers);

    for (rank, joined) in outcomes {
        let (result, stats) = match joined {
            Ok(outcome) => outcome,
            Err(_) => {
                record_error(&mut first_error, SolverError::PeerPanicked(rank));
                continue;
            }
        };
        total_statistics.merge(&stats);
        peer_statistics.push((rank, stats));

        match result {
            Ok(found @ Solution::Found { .. }) => {
                if finder.is_none() {
                    finder = Some(rank);
                    solution = found;
                } else {
                    warn!(rank, "goal also reached by another peer, keeping the first");
                }
            }
            Ok(Solution::None) => {}
            Err(err) => record_error(&mut first_error, err),
        }
    }

    if let Some(err) = first_error {
        return Err(err);
    }

    total_statistics.elapsed_time = start_time.elapsed();
    info!(
        finder = ?finder,
        moves = solution.len(),
        elapsed = ?total_statistics.elapsed_time,
        "cluster finished"
    );

    Ok(ParallelResult {
        solution,
        finder,
        total_statistics,
        peer_statistics,
    })
}
