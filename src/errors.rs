//! Error taxonomy for the engine core and its notation/protocol glue.
//!
//! Board-corruption faults (missing king, moving from an empty square,
//! undecodable cell codes) share this enum with the notation boundary errors
//! so every layer propagates them with `?` instead of panicking.

use thiserror::Error;

use crate::game_state::chess_types::{Color, Square};

/// Represents all error types that can occur in the engine.
#[derive(Debug, Error)]
pub enum ChessError {
    /// A side has no king on the board.
    #[error("each color must have a king, none found for {color:?}")]
    MissingKing { color: Color },

    /// A move was applied from a square that holds no piece.
    #[error("no piece at square {square}")]
    EmptySquare { square: Square },

    /// A board cell holds a code that is neither empty nor a valid piece.
    #[error("invalid piece code {code:#010b}")]
    InvalidPieceCode { code: u8 },

    /// A square lies outside the 8x8 board when rendered as text.
    #[error("square out of range: file {file}, rank {rank}")]
    SquareOutOfRange { file: i8, rank: i8 },

    /// Algebraic or long algebraic notation could not be parsed.
    #[error("invalid algebraic notation: {0}")]
    InvalidAlgebraic(String),

    /// A position string could not be parsed.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// The requested move is not legal for the side to move.
    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: Square, to: Square },

    /// An opening table row failed to parse or replay.
    #[error("invalid opening table: {0}")]
    InvalidOpening(String),

    /// Engine configuration is out of range.
    #[error("invalid engine configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for engine operations.
pub type ChessResult<T> = Result<T, ChessError>;
