//! Token-ring termination detection.
//!
//! The token travels rank 0 -> 1 -> ... -> N-1 -> 0. A peer that still holds
//! work, or that has sent work to a lower rank since the token last passed
//! it, blackens the token. Rank 0 declares the current depth layer exhausted
//! only when a token it started White comes back White.
//!
//! The token also sums each peer's work balance (batches sent minus batches
//! received). A nonzero sum means a work batch is still in transit, so the
//! lap does not count even if it came back White.

use crate::search::parallel::channel::{Message, Source, Tag, Transport};
use crate::search::parallel::peer::Peer;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub color: Color,
    /// Sum of the work balances of the peers visited this lap.
    pub in_flight: i64,
}

impl Token {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            in_flight: 0,
        }
    }

    pub fn is_white(&self) -> bool {
        self.color == Color::White
    }

    pub fn blacken(&mut self) {
        self.color = Color::Black;
    }
}

impl Peer {
    /// Send a fresh token of `color` to our successor.
    pub fn start_token<T: Transport>(&mut self, transport: &T, color: Color) {
        self.color = Color::White;
        trace!(rank = self.rank(), ?color, "starting token");
        transport.send(self.successor(), Message::Token(Token::new(color)));
    }

    /// Initiator side: look for the token coming back from the last rank.
    ///
    /// Returns true when the layer is exhausted everywhere. Otherwise a
    /// returned token starts another lap, White if our own frontier is empty.
    pub fn poll_token<T: Transport>(&mut self, transport: &T, frontier_len: usize) -> bool {
        let last = self.size() - 1;
        if transport.probe(Tag::Token, Source::Rank(last)).is_none() {
            return false;
        }
        let Some(Message::Token(token)) = transport.receive(Tag::Token, last) else {
            return false;
        };

        let settled = token.in_flight + self.work_balance == 0;
        if token.is_white() && self.color == Color::White && settled && frontier_len == 0 {
            return true;
        }

        debug!(
            rank = self.rank(),
            color = ?token.color,
            in_flight = token.in_flight + self.work_balance,
            "token returned, restarting"
        );
        let color = if frontier_len == 0 {
            Color::White
        } else {
            Color::Black
        };
        self.start_token(transport, color);
        false
    }

    /// Non-initiator side: forward the token if our predecessor sent it.
    ///
    /// Returns true if a token was forwarded.
    pub fn pass_token<T: Transport>(&mut self, transport: &T, frontier_len: usize) -> bool {
        let previous = self.predecessor();
        if transport.probe(Tag::Token, Source::Rank(previous)).is_none() {
            return false;
        }
        let Some(Message::Token(mut token)) = transport.receive(Tag::Token, previous) else {
            return false;
        };

        if frontier_len != 0 {
            token.blacken();
        }
        if self.color == Color::Black {
            token.blacken();
            self.color = Color::White;
        }
        token.in_flight += self.work_balance;

        trace!(rank = self.rank(), color = ?token.color, "passing token");
        transport.send(self.successor(), Message::Token(token));
        true
    }
}
