//! Cluster-wide markers: goal found and layer exhausted.
//!
//! Both are point-to-point fan-outs to every other rank and carry no payload.

use crate::search::parallel::channel::{Message, Source, Tag, Transport};

fn fan_out<T: Transport>(transport: &T, message: Message) {
    let me = transport.rank();
    for rank in (0..transport.size()).filter(|&rank| rank != me) {
        transport.send(rank, message.clone());
    }
}

fn take_marker<T: Transport>(transport: &T, tag: Tag) -> bool {
    match transport.probe(tag, Source::Any) {
        Some(source) => transport.receive(tag, source).is_some(),
        None => false,
    }
}

/// Tell every other peer that this peer holds the goal.
pub fn announce_solution<T: Transport>(transport: &T) {
    fan_out(transport, Message::Solution);
}

/// Consume a goal announcement from any peer.
pub fn solution_announced<T: Transport>(transport: &T) -> bool {
    take_marker(transport, Tag::Solution)
}

/// Tell every other peer that the current depth layer is exhausted.
pub fn broadcast_terminate<T: Transport>(transport: &T) {
    fan_out(transport, Message::Terminate);
}

/// Consume a layer-exhausted notice.
pub fn terminate_received<T: Transport>(transport: &T) -> bool {
    take_marker(transport, Tag::Terminate)
}
