//! Local protocol state of one peer.
//!
//! The work-sharing and token-ring protocols are implemented as further
//! `impl Peer` blocks in `work.rs` and `token.rs`; both read and write the
//! color flag kept here.

use crate::search::parallel::token::Color;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Rank, color and request bookkeeping for one peer. Never shared.
#[derive(Debug)]
pub struct Peer {
    rank: usize,
    size: usize,
    /// Black once this peer has sent work to a lower rank since the token last passed.
    pub(crate) color: Color,
    /// True while this peer may send a new work request.
    pub(crate) outstanding_request: bool,
    /// Work batches sent minus work batches received during the current layer.
    pub(crate) work_balance: i64,
    /// Frontier size above which work requests are answered.
    pub(crate) share_threshold: usize,
    rng: ChaCha8Rng,
}

impl Peer {
    /// `seed` is the cluster's base seed; each rank offsets it by its own rank.
    pub fn new(rank: usize, size: usize, share_threshold: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(rank as u64)),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self {
            rank,
            size: size.max(1),
            color: Color::White,
            outstanding_request: true,
            work_balance: 0,
            share_threshold,
            rng,
        }
    }

    /// Reset the per-layer flags before a new depth layer starts.
    pub fn begin_layer(&mut self) {
        self.color = Color::White;
        self.outstanding_request = true;
        self.work_balance = 0;
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn outstanding_request(&self) -> bool {
        self.outstanding_request
    }

    pub fn work_balance(&self) -> i64 {
        self.work_balance
    }

    /// Rank 0 starts every token circulation and seeds the root.
    pub fn is_initiator(&self) -> bool {
        self.rank == 0
    }

    pub fn successor(&self) -> usize {
        (self.rank + 1) % self.size
    }

    pub fn predecessor(&self) -> usize {
        (self.rank + self.size - 1) % self.size
    }

    /// Uniformly random rank other than our own, or `None` when alone.
    pub fn random_peer(&mut self) -> Option<usize> {
        if self.size < 2 {
            return None;
        }
        let pick = self.rng.random_range(0..self.size - 1);
        Some(if pick >= self.rank { pick + 1 } else { pick })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_neighbours() {
        let peer = Peer::new(0, 4, 10, Some(1));
        assert_eq!(peer.successor(), 1);
        assert_eq!(peer.predecessor(), 3);
        assert!(peer.is_initiator());

        let peer = Peer::new(3, 4, 10, Some(1));
        assert_eq!(peer.successor(), 0);
        assert_eq!(peer.predecessor(), 2);
        assert!(!peer.is_initiator());

        let alone = Peer::new(0, 1, 10, Some(1));
        assert_eq!(alone.successor(), 0);
        assert_eq!(alone.predecessor(), 0);
    }

    #[test]
    fn test_random_peer_never_self() {
        let mut peer = Peer::new(2, 5, 10, Some(42));
        let mut hits = [0usize; 5];
        for _ in 0..1000 {
            let target = peer.random_peer().unwrap();
            assert_ne!(target, 2);
            hits[target] += 1;
        }
        for (rank, count) in hits.iter().enumerate() {
            if rank != 2 {
                assert!(*count > 0, "rank {} was never picked", rank);
            }
        }
    }

    #[test]
    fn test_random_peer_alone() {
        let mut peer = Peer::new(0, 1, 10, None);
        assert_eq!(peer.random_peer(), None);
    }

    #[test]
    fn test_seeded_peers_repeat() {
        let mut a = Peer::new(1, 8, 10, Some(9));
        let mut b = Peer::new(1, 8, 10, Some(9));
        for _ in 0..20 {
            assert_eq!(a.random_peer(), b.random_peer());
        }
    }

    #[test]
    fn test_begin_layer_resets_flags() {
        let mut peer = Peer::new(1, 3, 10, Some(0));
        peer.color = Color::Black;
        peer.outstanding_request = false;
        peer.work_balance = 3;
        peer.begin_layer();
        assert_eq!(peer.color(), Color::White);
        assert!(peer.outstanding_request());
        assert_eq!(peer.work_balance(), 0);
    }
}
