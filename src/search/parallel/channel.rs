//! Message passing between search peers.
//!
//! Peers never share memory; everything crosses a `Transport`. Sends are
//! fire-and-forget, `probe` looks without consuming, and `receive` consumes
//! one message that a probe has already seen. Messages keep their order per
//! (sender, tag) pair and have no ordering across senders or tags.

use crate::error::SolverError;
use crate::search::arena::StateSnapshot;
use crate::search::parallel::token::Token;
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};

/// Message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Work,
    Solution,
    Token,
    Terminate,
    Idle,
}

impl Tag {
    pub const ALL: [Tag; 5] = [Tag::Work, Tag::Solution, Tag::Token, Tag::Terminate, Tag::Idle];

    fn slot(self) -> usize {
        match self {
            Tag::Work => 0,
            Tag::Solution => 1,
            Tag::Token => 2,
            Tag::Terminate => 3,
            Tag::Idle => 4,
        }
    }
}

/// A message with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Ownership transfer of part of a frontier.
    Work(Vec<StateSnapshot>),
    /// The goal was found somewhere in the cluster.
    Solution,
    /// Termination-detection token.
    Token(Token),
    /// The current depth layer is exhausted everywhere.
    Terminate,
    /// The sender asks the receiver for work.
    Idle,
}

impl Message {
    pub fn tag(&self) -> Tag {
        match self {
            Message::Work(_) => Tag::Work,
            Message::Solution => Tag::Solution,
            Message::Token(_) => Tag::Token,
            Message::Terminate => Tag::Terminate,
            Message::Idle => Tag::Idle,
        }
    }
}

/// Which senders a probe accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Any,
    Rank(usize),
}

/// Peer-to-peer transport seen by one peer.
pub trait Transport {
    /// This peer's rank, fixed for its lifetime.
    fn rank(&self) -> usize;

    /// Number of peers in the cluster.
    fn size(&self) -> usize;

    /// Queue `message` for peer `to`. Never blocks, never reports delivery.
    fn send(&self, to: usize, message: Message);

    /// Rank of a sender with a pending `tag` message, without consuming it.
    fn probe(&self, tag: Tag, source: Source) -> Option<usize>;

    /// Take the oldest pending `tag` message from `source`. Never blocks.
    fn receive(&self, tag: Tag, source: usize) -> Option<Message>;

    /// Wait until every peer has reached the barrier.
    fn barrier(&self) -> Result<(), SolverError>;

    /// Shut the whole runtime down. Every peer sees `is_aborted` afterwards.
    fn abort(&self);

    fn is_aborted(&self) -> bool;
}

/// Reusable barrier that releases its waiters with an error on abort.
#[derive(Debug)]
struct AbortableBarrier {
    parties: usize,
    state: Mutex<BarrierState>,
    cvar: Condvar,
}

#[derive(Debug, Default)]
struct BarrierState {
    arrived: usize,
    generation: u64,
    aborted: bool,
}

impl AbortableBarrier {
    fn new(parties: usize) -> Self {
        Self {
            parties,
            state: Mutex::new(BarrierState::default()),
            cvar: Condvar::new(),
        }
    }

    fn wait(&self) -> Result<(), SolverError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.aborted {
            return Err(SolverError::Aborted);
        }
        let generation = state.generation;
        state.arrived += 1;
        if state.arrived == self.parties {
            state.arrived = 0;
            state.generation += 1;
            self.cvar.notify_all();
            return Ok(());
        }
        while state.generation == generation {
            if state.aborted {
                return Err(SolverError::Aborted);
            }
            state = self.cvar.wait(state).unwrap_or_else(|e| e.into_inner());
        }
        Ok(())
    }

    fn abort(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.aborted = true;
        self.cvar.notify_all();
    }
}

/// Runtime state shared by all endpoints of a mesh.
#[derive(Debug)]
struct MeshShared {
    barrier: AbortableBarrier,
    aborted: AtomicBool,
}

impl MeshShared {
    fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
        self.barrier.abort();
    }
}

/// Aborts a mesh from outside any peer's search loop.
#[derive(Debug, Clone)]
pub struct AbortHandle(Arc<MeshShared>);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.abort();
    }
}

/// One peer's view of an in-process mesh.
///
/// Every (destination, source, tag) triple has its own unbounded FIFO, which
/// gives exactly the per-(sender, tag) ordering the protocols rely on.
pub struct MeshEndpoint {
    rank: usize,
    size: usize,
    /// `outboxes[destination][tag]`
    outboxes: Vec<Vec<Sender<Message>>>,
    /// `inboxes[source][tag]`
    inboxes: Vec<Vec<Receiver<Message>>>,
    shared: Arc<MeshShared>,
}

/// Create a fully connected mesh of `size` endpoints, indexed by rank.
pub fn create_mesh(size: usize) -> Vec<MeshEndpoint> {
    let size = size.max(1);
    let shared = Arc::new(MeshShared {
        barrier: AbortableBarrier::new(size),
        aborted: AtomicBool::new(false),
    });

    let mut outboxes: Vec<Vec<Vec<Sender<Message>>>> = (0..size)
        .map(|_| (0..size).map(|_| Vec::with_capacity(Tag::ALL.len())).collect())
        .collect();
    let mut inboxes: Vec<Vec<Vec<Receiver<Message>>>> = (0..size)
        .map(|_| (0..size).map(|_| Vec::with_capacity(Tag::ALL.len())).collect())
        .collect();

    for destination in 0..size {
        for source in 0..size {
            for _ in Tag::ALL {
                let (tx, rx) = unbounded();
                outboxes[source][destination].push(tx);
                inboxes[destination][source].push(rx);
            }
        }
    }

    outboxes
        .into_iter()
        .zip(inboxes)
        .enumerate()
        .map(|(rank, (outboxes, inboxes))| MeshEndpoint {
            rank,
            size,
            outboxes,
            inboxes,
            shared: Arc::clone(&shared),
        })
        .collect()
}

impl MeshEndpoint {
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle(Arc::clone(&self.shared))
    }
}

impl Transport for MeshEndpoint {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send(&self, to: usize, message: Message) {
        let slot = message.tag().slot();
        if let Some(outbox) = self.outboxes.get(to) {
            // The receiver may already have left the cluster.
            let _ = outbox[slot].send(message);
        }
    }

    fn probe(&self, tag: Tag, source: Source) -> Option<usize> {
        let slot = tag.slot();
        match source {
            Source::Rank(rank) => self
                .inboxes
                .get(rank)
                .filter(|inbox| !inbox[slot].is_empty())
                .map(|_| rank),
            Source::Any => self
                .inboxes
                .iter()
                .position(|inbox| !inbox[slot].is_empty()),
        }
    }

    fn receive(&self, tag: Tag, source: usize) -> Option<Message> {
        let inbox = self.inboxes.get(source)?;
        match inbox[tag.slot()].try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    fn barrier(&self) -> Result<(), SolverError> {
        self.shared.barrier.wait()
    }

    fn abort(&self) {
        self.shared.abort();
    }

    fn is_aborted(&self) -> bool {
        self.shared.aborted.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::parallel::token::Color;

    #[test]
    fn test_create_mesh() {
        let mesh = create_mesh(4);
        assert_eq!(mesh.len(), 4);
        for (rank, endpoint) in mesh.iter().enumerate() {
            assert_eq!(endpoint.rank(), rank);
            assert_eq!(endpoint.size(), 4);
        }
        assert_eq!(create_mesh(0).len(), 1);
    }

    #[test]
    fn test_probe_does_not_consume() {
        let mesh = create_mesh(2);
        mesh[0].send(1, Message::Idle);

        assert_eq!(mesh[1].probe(Tag::Idle, Source::Any), Some(0));
        assert_eq!(mesh[1].probe(Tag::Idle, Source::Rank(0)), Some(0));
        assert_eq!(mesh[1].probe(Tag::Work, Source::Any), None);
        assert_eq!(mesh[1].probe(Tag::Idle, Source::Rank(1)), None);

        assert_eq!(mesh[1].receive(Tag::Idle, 0), Some(Message::Idle));
        assert_eq!(mesh[1].probe(Tag::Idle, Source::Any), None);
        assert_eq!(mesh[1].receive(Tag::Idle, 0), None);
    }

    #[test]
    fn test_per_sender_tag_order() {
        let mesh = create_mesh(3);
        let white = Message::Token(Token::new(Color::White));
        let black = Message::Token(Token::new(Color::Black));
        mesh[0].send(2, white.clone());
        mesh[0].send(2, black.clone());
        mesh[1].send(2, Message::Solution);

        assert_eq!(mesh[2].receive(Tag::Token, 0), Some(white));
        assert_eq!(mesh[2].receive(Tag::Token, 0), Some(black));
        assert_eq!(mesh[2].receive(Tag::Token, 1), None);
        assert_eq!(mesh[2].probe(Tag::Solution, Source::Any), Some(1));
    }

    #[test]
    fn test_self_send() {
        let mesh = create_mesh(1);
        mesh[0].send(0, Message::Terminate);
        assert_eq!(mesh[0].probe(Tag::Terminate, Source::Rank(0)), Some(0));
        assert_eq!(mesh[0].receive(Tag::Terminate, 0), Some(Message::Terminate));
    }

    #[test]
    fn test_send_to_departed_peer() {
        let mut mesh = create_mesh(2);
        let departed = mesh.pop().unwrap();
        drop(departed);
        mesh[0].send(1, Message::Idle);
        mesh[0].send(7, Message::Idle);
    }

    #[test]
    fn test_barrier_and_abort() {
        let mesh = create_mesh(3);
        let handles: Vec<_> = mesh
            .into_iter()
            .map(|endpoint| {
                std::thread::spawn(move || {
                    endpoint.barrier()?;
                    if endpoint.rank() == 0 {
                        endpoint.abort();
                        return Ok(true);
                    }
                    endpoint.barrier().map(|_| false)
                })
            })
            .collect();

        let results: Vec<Result<bool, SolverError>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results[0], Ok(true));
        assert_eq!(results[1], Err(SolverError::Aborted));
        assert_eq!(results[2], Err(SolverError::Aborted));
    }

    #[test]
    fn test_abort_handle_reaches_every_endpoint() {
        let mesh = create_mesh(3);
        let handle = mesh[1].abort_handle();
        assert!(mesh.iter().all(|endpoint| !endpoint.is_aborted()));

        handle.abort();
        assert!(mesh.iter().all(|endpoint| endpoint.is_aborted()));
        assert_eq!(mesh[0].barrier(), Err(SolverError::Aborted));
    }
}
