//! Configuration for running a cluster of search peers.

/// Configuration for parallel search execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Number of peers (threads) in the cluster.
    pub num_peers: usize,
    /// Base random seed (peers get seed + rank).
    pub base_seed: Option<u64>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_peers: num_cpus::get(),
            base_seed: None,
        }
    }
}

impl ParallelConfig {
    /// Set the number of peers. At least one peer always runs.
    pub fn with_peers(mut self, num_peers: usize) -> Self {
        self.num_peers = num_peers.max(1);
        self
    }

    /// Set the base random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.base_seed = Some(seed);
        self
    }

    /// Set the base random seed from an Option.
    pub fn with_seed_option(mut self, seed: Option<u64>) -> Self {
        self.base_seed = seed;
        self
    }

    /// Set the number of peers from an Option, keeping the default for `None`.
    pub fn with_peers_option(self, num_peers: Option<usize>) -> Self {
        match num_peers {
            Some(n) => self.with_peers(n),
            None => self,
        }
    }
}
