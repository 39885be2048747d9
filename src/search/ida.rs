//! Distributed iterative-deepening A* on one peer.
//!
//! Every peer runs the same single-threaded loop. Each tick does, in order:
//! 1. pop one state, goal-test it, then expand it or prune it
//! 2. work sharing: answer a request, take incoming work, or ask for work
//! 3. check whether another peer announced the goal
//! 4. termination detection: rank 0 inspects the token, the others pass it
//! 5. check whether rank 0 declared the layer exhausted
//!
//! Nothing in the loop blocks; a message that is not there yet is simply
//! looked for again on the next tick.

use crate::error::SolverError;
use crate::puzzle::{Board, PuzzleState, Tile};
use crate::search::arena::{NodeArena, NodeId};
use crate::search::config::SearchConfig;
use crate::search::frontier::Frontier;
use crate::search::parallel::broadcast;
use crate::search::parallel::channel::Transport;
use crate::search::parallel::peer::Peer;
use crate::search::parallel::token::Color;
use crate::search::result::{SearchStatistics, Solution};
use std::time::Instant;
use tracing::{debug, error, info};

/// How one depth layer ended for this peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerOutcome {
    /// This peer popped the goal.
    Found(Solution),
    /// Another peer announced the goal.
    SolvedElsewhere,
    /// No peer has anything left under the current bound.
    Exhausted,
}

/// The search driver for one peer, bound to its transport.
pub struct PeerSearch<T: Transport> {
    transport: T,
    board: Board,
    config: SearchConfig,
    statistics: SearchStatistics,
}

impl<T: Transport> PeerSearch<T> {
    pub fn new(transport: T, board: Board, config: SearchConfig) -> Self {
        Self {
            transport,
            board,
            config,
            statistics: SearchStatistics::default(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    pub fn into_statistics(self) -> SearchStatistics {
        self.statistics
    }

    /// Solve `grid` together with the rest of the cluster.
    ///
    /// Exactly one peer returns `Solution::Found`; the others return
    /// `Solution::None` once they learn the goal was found. An invalid
    /// puzzle aborts the whole runtime, not just this peer.
    pub fn solve(&mut self, grid: &[Tile]) -> Result<Solution, SolverError> {
        let start_time = Instant::now();
        let rank = self.transport.rank();

        if let Err(err) = self.board.validate(grid) {
            error!(rank, %err, "invalid puzzle, shutting down the cluster");
            self.transport.abort();
            return Err(err);
        }

        let root = PuzzleState::root(&self.board, grid);
        let mut bound = root.heuristic();
        let mut peer = Peer::new(
            rank,
            self.transport.size(),
            self.config.share_threshold,
            self.config.seed,
        );

        let solution = loop {
            peer.begin_layer();
            self.statistics.layers += 1;
            self.statistics.final_bound = bound;

            match self.search_layer(&root, bound, &mut peer)? {
                LayerOutcome::Found(solution) => break solution,
                LayerOutcome::SolvedElsewhere => break Solution::None,
                LayerOutcome::Exhausted => {
                    bound += self.config.bound_step;
                    // Nobody starts the next layer before everyone has left this one.
                    self.transport.barrier()?;
                }
            }
        };

        self.statistics.elapsed_time = start_time.elapsed();
        self.transport.barrier()?;
        Ok(solution)
    }

    /// Run one depth layer with a fresh arena and frontier.
    pub fn search_layer(
        &mut self,
        root: &PuzzleState,
        bound: u32,
        peer: &mut Peer,
    ) -> Result<LayerOutcome, SolverError> {
        let mut arena = NodeArena::new();
        let mut frontier = Frontier::new();

        if peer.is_initiator() {
            frontier.push(arena.insert_root(root.clone()));
            peer.start_token(&self.transport, Color::Black);
        }
        debug!(rank = peer.rank(), bound, "layer started");

        loop {
            if self.transport.is_aborted() {
                return Err(SolverError::Aborted);
            }

            if let Some(id) = frontier.pop() {
                if arena.state(id).is_goal(&self.board) {
                    let solution = Solution::Found {
                        goal: arena.state(id).grid().into(),
                        moves: arena.path(id),
                    };
                    info!(
                        rank = peer.rank(),
                        bound,
                        moves = solution.len(),
                        "goal found"
                    );
                    broadcast::announce_solution(&self.transport);
                    return Ok(LayerOutcome::Found(solution));
                }
                self.expand_or_prune(&mut arena, &mut frontier, id, bound);
            }

            self.statistics.states_shared +=
                peer.share_work(&self.transport, &mut frontier, &mut arena) as u64;
            let received = peer.receive_work(&self.transport, &mut frontier, &mut arena);
            self.statistics.states_received += received as u64;
            if frontier.is_empty() && received == 0 {
                peer.request_work(&self.transport);
            }

            if broadcast::solution_announced(&self.transport) {
                debug!(rank = peer.rank(), "goal announced by another peer");
                return Ok(LayerOutcome::SolvedElsewhere);
            }

            if peer.is_initiator() {
                if peer.poll_token(&self.transport, frontier.len()) {
                    broadcast::broadcast_terminate(&self.transport);
                    info!(bound, "depth {} finished", bound);
                    return Ok(LayerOutcome::Exhausted);
                }
            } else {
                peer.pass_token(&self.transport, frontier.len());
            }

            if broadcast::terminate_received(&self.transport) {
                return Ok(LayerOutcome::Exhausted);
            }

            if frontier.is_empty() {
                std::thread::yield_now();
            }
        }
    }

    /// Bound test, then the reversal guard, then push every child.
    fn expand_or_prune(
        &mut self,
        arena: &mut NodeArena,
        frontier: &mut Frontier,
        id: NodeId,
        bound: u32,
    ) {
        let state = arena.state(id);
        if !state.within_bound(bound) {
            self.statistics.pruned_by_bound += 1;
        } else if arena.has_loop(id) {
            self.statistics.pruned_by_loop += 1;
        } else {
            let children = state.expand(&self.board);
            self.statistics.nodes_expanded += 1;
            for child in children {
                frontier.push(arena.insert_child(id, child));
            }
        }
        arena.release(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::parallel::channel::create_mesh;

    const SAMPLE: [Tile; 16] = [2, 12, 14, 7, 5, 1, 6, 3, 10, 13, 4, 9, 15, 8, 0, 11];

    fn single_peer(board: Board) -> PeerSearch<crate::search::parallel::channel::MeshEndpoint> {
        let endpoint = create_mesh(1).pop().unwrap();
        PeerSearch::new(endpoint, board, SearchConfig::default().with_seed(1))
    }

    #[test]
    fn test_single_peer_solves_sample() {
        let board = Board::new(4, 4).unwrap();
        let mut search = single_peer(board);
        let solution = search.solve(&SAMPLE).unwrap();

        assert!(solution.is_found());
        // Every move shifts the blank by one cell, so the move count shares the
        // parity of the blank's distance to its home cell (one step here).
        let root = PuzzleState::root(&board, &SAMPLE);
        let (bx, by) = board.coords(root.blank());
        let (gx, gy) = board.coords(board.len() - 1);
        let blank_distance = bx.abs_diff(gx) + by.abs_diff(gy);
        assert_eq!(blank_distance, 1);
        assert_eq!(solution.len() % 2, blank_distance % 2);
        assert!(solution.verify(&board, &SAMPLE));
        if let Solution::Found { goal, .. } = &solution {
            assert!(board.is_goal(goal));
        }

        let stats = search.statistics();
        assert!(stats.nodes_expanded > 0);
        assert!(stats.layers >= 2);
        assert_eq!(stats.states_shared, 0);
        assert_eq!(stats.final_bound, root.heuristic() + 2 * (stats.layers - 1));
        assert_eq!(solution.len() as u32, stats.final_bound);
    }

    #[test]
    fn test_already_solved_root() {
        let board = Board::new(3, 3).unwrap();
        let mut search = single_peer(board);
        let solution = search.solve(&board.goal()).unwrap();
        assert_eq!(solution.moves(), Some(&[][..]));
        assert_eq!(search.statistics().layers, 1);
    }

    #[test]
    fn test_small_puzzles_solve_optimally() {
        // (rows, cols, grid, optimal length)
        let cases: &[(usize, usize, &[Tile], usize)] = &[
            (3, 3, &[1, 2, 3, 4, 5, 6, 7, 0, 8], 1),
            (3, 3, &[1, 2, 3, 4, 0, 6, 7, 5, 8], 2),
            (2, 3, &[4, 1, 2, 0, 5, 3], 4),
            (3, 2, &[1, 2, 3, 0, 5, 4], 1),
            (2, 2, &[0, 1, 3, 2], 2),
            (3, 3, &[8, 1, 3, 4, 0, 2, 7, 6, 5], 14),
        ];
        for (rows, cols, grid, optimal) in cases {
            let board = Board::new(*rows, *cols).unwrap();
            let mut search = single_peer(board);
            let solution = search.solve(grid).unwrap();
            assert!(solution.verify(&board, grid), "{:?}", grid);
            assert_eq!(solution.len(), *optimal, "{:?}", grid);
        }
    }

    #[test]
    fn test_unsolvable_aborts_runtime() {
        let board = Board::new(3, 3).unwrap();
        let mut search = single_peer(board);
        let result = search.solve(&[1, 2, 3, 4, 5, 6, 8, 7, 0]);
        assert_eq!(result, Err(SolverError::Unsolvable));
        assert!(search.transport().is_aborted());
    }

    #[test]
    fn test_length_mismatch_aborts_runtime() {
        let board = Board::new(4, 4).unwrap();
        let mut search = single_peer(board);
        let result = search.solve(&[1, 2, 3, 0]);
        assert!(matches!(result, Err(SolverError::LengthMismatch { .. })));
        assert!(search.transport().is_aborted());
    }

    #[test]
    fn test_aborted_runtime_stops_layer() {
        let board = Board::new(4, 4).unwrap();
        let mesh = create_mesh(2);
        mesh[1].abort();
        let mut endpoints = mesh.into_iter();
        let first = endpoints.next().unwrap();
        let mut search = PeerSearch::new(first, board, SearchConfig::default());
        assert_eq!(search.solve(&SAMPLE), Err(SolverError::Aborted));
    }
}
