//! Search result types and statistics

use crate::puzzle::{Board, Direction, Tile};
use std::time::Duration;

/// Outcome of a solve on one peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    /// This peer found the goal.
    Found {
        /// The goal grid as reached.
        goal: Box<[Tile]>,
        /// Blank moves from the root to the goal, oldest first.
        moves: Vec<Direction>,
    },
    /// This peer finished without a goal of its own, either because another
    /// peer found it or because the search ended empty-handed.
    None,
}

impl Solution {
    pub fn is_found(&self) -> bool {
        matches!(self, Solution::Found { .. })
    }

    pub fn moves(&self) -> Option<&[Direction]> {
        match self {
            Solution::Found { moves, .. } => Some(moves),
            Solution::None => None,
        }
    }

    /// Number of moves, 0 for `None`.
    pub fn len(&self) -> usize {
        self.moves().map_or(0, |moves| moves.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replay the moves on `root` and check that they end in the solved grid.
    pub fn verify(&self, board: &Board, root: &[Tile]) -> bool {
        match self {
            Solution::Found { goal, moves } => board
                .apply_moves(root, moves)
                .is_some_and(|end| board.is_goal(&end) && *end == **goal),
            Solution::None => false,
        }
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solution::Found { moves, .. } => {
                writeln!(f, "-------------Solution-----------------")?;
                for (step, dir) in moves.iter().enumerate() {
                    writeln!(f, "{}. {}", step + 1, dir)?;
                }
                writeln!(f, "--------------------------------------")
            }
            Solution::None => writeln!(f, "No solution."),
        }
    }
}

/// Counters from one peer's search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Total time spent searching
    pub elapsed_time: Duration,
    /// States popped and expanded
    pub nodes_expanded: u64,
    /// States discarded because their heuristic exceeded the bound
    pub pruned_by_bound: u64,
    /// States discarded by the reversal guard
    pub pruned_by_loop: u64,
    /// States sent to other peers
    pub states_shared: u64,
    /// States received from other peers
    pub states_received: u64,
    /// Depth layers started
    pub layers: u32,
    /// Bound of the last layer searched
    pub final_bound: u32,
}

impl SearchStatistics {
    /// Fold another peer's counters into these. Time and bound take the maximum.
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.elapsed_time = self.elapsed_time.max(other.elapsed_time);
        self.nodes_expanded += other.nodes_expanded;
        self.pruned_by_bound += other.pruned_by_bound;
        self.pruned_by_loop += other.pruned_by_loop;
        self.states_shared += other.states_shared;
        self.states_received += other.states_received;
        self.layers = self.layers.max(other.layers);
        self.final_bound = self.final_bound.max(other.final_bound);
    }

    /// Expanded nodes per second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.nodes_expanded as f64 / secs
        }
    }

    /// Format statistics as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed_time));
        s.push_str(&format!("Nodes expanded: {}\n", self.nodes_expanded));
        s.push_str(&format!("Throughput: {:.0} nodes/sec\n", self.throughput()));
        s.push_str(&format!(
            "Pruned: {} by bound, {} by reversal\n",
            self.pruned_by_bound, self.pruned_by_loop
        ));
        if self.states_shared > 0 || self.states_received > 0 {
            s.push_str(&format!(
                "Shared: {} sent, {} received\n",
                self.states_shared, self.states_received
            ));
        }
        s.push_str(&format!(
            "Layers: {} (final bound {})\n",
            self.layers, self.final_bound
        ));
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found() -> Solution {
        Solution::Found {
            goal: vec![1, 2, 3, 0].into(),
            moves: vec![Direction::Right, Direction::Down],
        }
    }

    #[test]
    fn test_solution_accessors() {
        let solution = found();
        assert!(solution.is_found());
        assert_eq!(solution.len(), 2);
        assert!(!Solution::None.is_found());
        assert_eq!(Solution::None.moves(), None);
        assert!(Solution::None.is_empty());
    }

    #[test]
    fn test_solution_verify() {
        let board = Board::new(2, 2).unwrap();
        assert!(found().verify(&board, &[0, 1, 3, 2]));
        assert!(!found().verify(&board, &[1, 0, 3, 2]));
        assert!(!Solution::None.verify(&board, &[1, 2, 3, 0]));
    }

    #[test]
    fn test_solution_display() {
        let text = found().to_string();
        assert!(text.contains("1. right\n"));
        assert!(text.contains("2. down\n"));
        assert_eq!(Solution::None.to_string(), "No solution.\n");
    }

    #[test]
    fn test_statistics_merge() {
        let mut total = SearchStatistics {
            nodes_expanded: 10,
            layers: 2,
            final_bound: 30,
            elapsed_time: Duration::from_millis(5),
            ..Default::default()
        };
        let other = SearchStatistics {
            nodes_expanded: 5,
            states_shared: 3,
            layers: 3,
            final_bound: 32,
            elapsed_time: Duration::from_millis(2),
            ..Default::default()
        };
        total.merge(&other);
        assert_eq!(total.nodes_expanded, 15);
        assert_eq!(total.states_shared, 3);
        assert_eq!(total.layers, 3);
        assert_eq!(total.final_bound, 32);
        assert_eq!(total.elapsed_time, Duration::from_millis(5));
    }

    #[test]
    fn test_statistics_throughput() {
        let mut stats = SearchStatistics::default();
        assert_eq!(stats.throughput(), 0.0);
        stats.nodes_expanded = 10000;
        stats.elapsed_time = Duration::from_secs(10);
        assert!((stats.throughput() - 1000.0).abs() < 1e-10);
        assert!(stats.format_summary().contains("Nodes expanded: 10000"));
    }
}
