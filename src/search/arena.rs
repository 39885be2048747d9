//! Per-layer storage for search-tree nodes.
//!
//! States refer to their parents through `NodeId` handles into a `NodeArena`.
//! One arena lives for one depth layer and is dropped wholesale when the layer
//! ends. While the layer runs, a node is freed as soon as it has been released
//! by the search loop and none of its children are still alive, so memory stays
//! proportional to the live part of the tree.

use crate::puzzle::{Direction, PuzzleState, Tile};

/// Handle to a node in a `NodeArena`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A state as it travels between peers.
///
/// `path` lists every move from the true root to this state, oldest first, so
/// the receiving peer can still report a full solution path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub grid: Box<[Tile]>,
    pub depth: u32,
    pub heuristic: u32,
    pub path: Vec<Direction>,
}

impl StateSnapshot {
    pub fn last_move(&self) -> Option<Direction> {
        self.path.last().copied()
    }
}

#[derive(Debug)]
enum Origin {
    /// The puzzle as supplied.
    Root,
    /// Expanded locally from another node of this arena.
    Parent(NodeId),
    /// Received from another peer. Holds the moves from the true root to this
    /// node's parent.
    Imported(Vec<Direction>),
}

#[derive(Debug)]
struct Entry {
    state: PuzzleState,
    origin: Origin,
    live_children: u32,
    released: bool,
}

/// Slot storage with a free list.
#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<Option<Entry>>,
    free: Vec<usize>,
    live: usize,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn alloc(&mut self, entry: Entry) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(entry);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(entry));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    fn entry(&self, id: NodeId) -> &Entry {
        match self.slots.get(id.0) {
            Some(Some(entry)) => entry,
            _ => panic!("stale node handle {:?}", id),
        }
    }

    fn entry_mut(&mut self, id: NodeId) -> &mut Entry {
        match self.slots.get_mut(id.0) {
            Some(Some(entry)) => entry,
            _ => panic!("stale node handle {:?}", id),
        }
    }

    pub fn insert_root(&mut self, state: PuzzleState) -> NodeId {
        self.alloc(Entry {
            state,
            origin: Origin::Root,
            live_children: 0,
            released: false,
        })
    }

    pub fn insert_child(&mut self, parent: NodeId, state: PuzzleState) -> NodeId {
        self.entry_mut(parent).live_children += 1;
        self.alloc(Entry {
            state,
            origin: Origin::Parent(parent),
            live_children: 0,
            released: false,
        })
    }

    /// Adopt a state sent by another peer as a detached subtree root.
    pub fn import(&mut self, snapshot: StateSnapshot) -> NodeId {
        let StateSnapshot {
            grid,
            depth,
            heuristic,
            mut path,
        } = snapshot;
        let last_move = if depth > 0 { path.pop() } else { None };
        let state = PuzzleState::restore(grid, depth, heuristic, last_move);
        self.alloc(Entry {
            state,
            origin: Origin::Imported(path),
            live_children: 0,
            released: false,
        })
    }

    /// Export a state for transfer to another peer.
    pub fn snapshot(&self, id: NodeId) -> StateSnapshot {
        let state = self.state(id);
        StateSnapshot {
            grid: state.grid().into(),
            depth: state.depth(),
            heuristic: state.heuristic(),
            path: self.path(id),
        }
    }

    /// # Panics
    ///
    /// Panics if `id` has already been freed.
    pub fn state(&self, id: NodeId) -> &PuzzleState {
        &self.entry(id).state
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        match self.entry(id).origin {
            Origin::Parent(parent) => Some(parent),
            _ => None,
        }
    }

    /// The move that produced this node's parent, if known.
    pub fn parent_move(&self, id: NodeId) -> Option<Direction> {
        match &self.entry(id).origin {
            Origin::Root => None,
            Origin::Parent(parent) => self.state(*parent).last_move(),
            Origin::Imported(prefix) => prefix.last().copied(),
        }
    }

    /// Immediate-reversal guard.
    ///
    /// A node whose move undoes its parent's move has the same grid as its
    /// grandparent and is not expanded. The root and its children never loop.
    pub fn has_loop(&self, id: NodeId) -> bool {
        match (self.state(id).last_move(), self.parent_move(id)) {
            (Some(current), Some(previous)) => current == previous.inverse(),
            _ => false,
        }
    }

    /// Moves from the true root to `id`, oldest first.
    pub fn path(&self, id: NodeId) -> Vec<Direction> {
        let mut reversed = Vec::with_capacity(self.state(id).depth() as usize);
        let mut current = id;
        loop {
            let entry = self.entry(current);
            match &entry.origin {
                Origin::Root => break,
                Origin::Parent(parent) => {
                    reversed.extend(entry.state.last_move());
                    current = *parent;
                }
                Origin::Imported(prefix) => {
                    reversed.extend(entry.state.last_move());
                    let mut path = prefix.clone();
                    path.extend(reversed.into_iter().rev());
                    return path;
                }
            }
        }
        reversed.reverse();
        reversed
    }

    /// Mark `id` as done with. The node is freed once it also has no live
    /// children, and freeing cascades up through released ancestors.
    pub fn release(&mut self, id: NodeId) {
        let entry = self.entry_mut(id);
        entry.released = true;
        if entry.live_children > 0 {
            return;
        }

        let mut current = id;
        loop {
            let Some(entry) = self.slots[current.0].take() else {
                return;
            };
            self.free.push(current.0);
            self.live -= 1;

            let Origin::Parent(parent) = entry.origin else {
                return;
            };
            let parent_entry = self.entry_mut(parent);
            parent_entry.live_children -= 1;
            if parent_entry.live_children > 0 || !parent_entry.released {
                return;
            }
            current = parent;
        }
    }
}
