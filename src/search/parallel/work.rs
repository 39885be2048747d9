//! Work sharing between peers.
//!
//! An idle peer sends one `Idle` request to a random other peer and waits
//! until work arrives before asking again. A peer holding more than the share
//! threshold answers a pending request by splitting its frontier in half.

use crate::search::arena::NodeArena;
use crate::search::frontier::Frontier;
use crate::search::parallel::channel::{Message, Source, Tag, Transport};
use crate::search::parallel::peer::Peer;
use crate::search::parallel::token::Color;
use tracing::{debug, trace};

impl Peer {
    /// Ask a random peer for work unless a request is already outstanding.
    ///
    /// Returns the rank asked, if any.
    pub fn request_work<T: Transport>(&mut self, transport: &T) -> Option<usize> {
        if !self.outstanding_request {
            return None;
        }
        let target = self.random_peer()?;
        transport.send(target, Message::Idle);
        self.outstanding_request = false;
        trace!(rank = self.rank(), target, "requested work");
        Some(target)
    }

    /// Answer one pending work request if the frontier is large enough.
    ///
    /// The shared half leaves this peer entirely: its nodes are exported and
    /// released from the local arena. Returns the number of states sent.
    pub fn share_work<T: Transport>(
        &mut self,
        transport: &T,
        frontier: &mut Frontier,
        arena: &mut NodeArena,
    ) -> usize {
        if frontier.len() <= self.share_threshold {
            return 0;
        }
        let Some(requester) = transport.probe(Tag::Idle, Source::Any) else {
            return 0;
        };
        if transport.receive(Tag::Idle, requester).is_none() {
            return 0;
        }

        let shared = frontier.split();
        let batch: Vec<_> = shared
            .into_iter()
            .map(|id| {
                let snapshot = arena.snapshot(id);
                arena.release(id);
                snapshot
            })
            .collect();
        let count = batch.len();

        transport.send(requester, Message::Work(batch));
        self.work_balance += 1;
        if requester < self.rank() {
            self.color = Color::Black;
        }

        debug!(
            rank = self.rank(),
            requester,
            shared = count,
            kept = frontier.len(),
            "shared work"
        );
        count
    }

    /// Take one incoming work batch onto the frontier.
    ///
    /// Returns the number of states received; a received batch also re-arms
    /// the work request for when this peer runs dry again.
    pub fn receive_work<T: Transport>(
        &mut self,
        transport: &T,
        frontier: &mut Frontier,
        arena: &mut NodeArena,
    ) -> usize {
        let Some(sender) = transport.probe(Tag::Work, Source::Any) else {
            return 0;
        };
        let Some(Message::Work(batch)) = transport.receive(Tag::Work, sender) else {
            return 0;
        };

        let count = batch.len();
        frontier.extend(batch.into_iter().map(|snapshot| arena.import(snapshot)));
        self.work_balance -= 1;
        self.outstanding_request = true;

        debug!(rank = self.rank(), sender, received = count, "received work");
        count
    }
}
