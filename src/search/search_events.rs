//! Progress events emitted while searching.
//!
//! Delivery is fire-and-forget: the search never waits on, or learns about,
//! what a handler does with an event.

use std::sync::mpsc::Sender;

use crate::game_state::chess_types::Move;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The recursion reached a new deepest ply.
    DepthReached(u8),
    /// Approximate nodes per second over the last sampling window.
    NodesPerSecond(u64),
    BestLine {
        score: f64,
        depth: u8,
        nodes: u64,
        moves: Vec<Move>,
    },
}

pub trait EngineEventHandler: Send {
    fn handle(&mut self, event: EngineEvent);
}

impl EngineEventHandler for Sender<EngineEvent> {
    fn handle(&mut self, event: EngineEvent) {
        // A hung-up receiver just means nobody is listening anymore.
        let _ = self.send(event);
    }
}

impl EngineEventHandler for Vec<EngineEvent> {
    fn handle(&mut self, event: EngineEvent) {
        self.push(event);
    }
}
