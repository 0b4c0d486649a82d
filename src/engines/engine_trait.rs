//! Engine abstraction driven by the protocol layer.
//!
//! The protocol adapter only talks to this trait, so alternate engines can be
//! dropped in without touching command parsing or output formatting.

use crate::errors::ChessResult;
use crate::game_state::chess_types::{Color, Move, Piece, Square};
use crate::search::iterative_deepening::StopFlag;
use crate::search::search_events::EngineEventHandler;

pub trait Engine: Send {
    fn name(&self) -> &str;
    fn author(&self) -> &str;

    /// One-time initialization before the first game.
    fn setup_engine(&mut self) -> ChessResult<()> {
        Ok(())
    }

    fn new_game(&mut self) {
        self.setup_board();
    }

    /// Starting position, White to move; clears history and node totals.
    fn setup_board(&mut self);
    fn setup_board_with(&mut self, pieces: &[Piece], color_to_move: Color);
    fn setup_from_fen(&mut self, fen: &str) -> ChessResult<()>;

    fn is_move_valid(&self, from: Square, to: Square) -> ChessResult<bool>;
    /// Plays a legal move for the side to move and records it in the history.
    fn apply_move(&mut self, from: Square, to: Square) -> ChessResult<()>;
    fn legal_moves(&self) -> ChessResult<Vec<Move>>;

    fn set_option(&mut self, _name: &str, _value: &str) -> ChessResult<()> {
        Ok(())
    }

    /// Resets per-search state; call before `best_move`.
    fn start_search(&mut self);
    fn stop_search(&self) {
        self.stop_flag().request_stop();
    }
    /// Handle that stops the running search at its next depth boundary, usable
    /// from another thread.
    fn stop_flag(&self) -> StopFlag;

    fn best_move(&mut self) -> ChessResult<Option<Move>> {
        self.best_move_at_depth(None)
    }
    /// Like `best_move`, with an optional one-off depth ceiling.
    fn best_move_at_depth(&mut self, depth: Option<u8>) -> ChessResult<Option<Move>>;

    fn set_event_handler(&mut self, handler: Box<dyn EngineEventHandler>);

    fn side_to_move(&self) -> Color;
    fn to_fen(&self) -> String;
    fn history(&self) -> &[Move];
    /// Text diagram of the current position.
    fn render(&self) -> String;
}
