//! The per-peer LIFO of states waiting to be expanded.

use crate::search::arena::NodeId;

/// A peer's stack of unexpanded nodes. Only the owning peer touches it.
#[derive(Debug, Default, Clone)]
pub struct Frontier {
    stack: Vec<NodeId>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: NodeId) {
        self.stack.push(id);
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        self.stack.pop()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.stack.iter()
    }

    /// Split off roughly half of the frontier for another peer.
    ///
    /// Nodes are popped alternately into a keep pile and a share pile,
    /// starting with keep, so the keeper gets the extra node when the size is
    /// odd. Both piles keep their original relative order. Returns the share
    /// pile, bottom first.
    pub fn split(&mut self) -> Vec<NodeId> {
        let mut keep = Vec::with_capacity(self.stack.len() - self.stack.len() / 2);
        let mut share = Vec::with_capacity(self.stack.len() / 2);
        let mut to_keep = true;
        while let Some(id) = self.stack.pop() {
            if to_keep {
                keep.push(id);
            } else {
                share.push(id);
            }
            to_keep = !to_keep;
        }
        keep.reverse();
        share.reverse();
        self.stack = keep;
        share
    }
}

impl Extend<NodeId> for Frontier {
    fn extend<I: IntoIterator<Item = NodeId>>(&mut self, iter: I) {
        self.stack.extend(iter);
    }
}
