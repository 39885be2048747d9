//! Configuration types for the distributed IDA* search

/// Frontier size above which a peer answers work requests.
pub const DEFAULT_SHARE_THRESHOLD: usize = 10;

/// Bound increase between depth layers. Every move changes the Manhattan
/// distance by one, so reachable heuristics share the root's parity.
pub const DEFAULT_BOUND_STEP: u32 = 2;

/// Per-peer search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// A peer splits its frontier only while it holds more than this many states.
    pub share_threshold: usize,
    /// Amount added to the bound after an exhausted layer.
    pub bound_step: u32,
    /// Seed for choosing work-request targets (None = random seed)
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            share_threshold: DEFAULT_SHARE_THRESHOLD,
            bound_step: DEFAULT_BOUND_STEP,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn with_share_threshold(mut self, threshold: usize) -> Self {
        self.share_threshold = threshold;
        self
    }

    /// Set the bound step. Zero would never advance the search and is raised to 1.
    pub fn with_bound_step(mut self, step: u32) -> Self {
        self.bound_step = step.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_seed_option(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}
