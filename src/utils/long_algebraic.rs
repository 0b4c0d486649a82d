//! Long algebraic move strings (`e2e4`, `e7e8q`).
//!
//! Promotion is always to a queen, so a trailing promotion letter is accepted
//! and ignored on input and never written on output.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{Move, Square};
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

/// Parse a long algebraic move into its from/to squares.
pub fn parse_long_algebraic(text: &str) -> ChessResult<(Square, Square)> {
    let text = text.trim();
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(ChessError::InvalidAlgebraic(format!(
            "expected a move such as e2e4, got {text:?}"
        )));
    }
    if let Some(promotion) = text.chars().nth(4) {
        if !matches!(promotion.to_ascii_lowercase(), 'q' | 'r' | 'b' | 'n') {
            return Err(ChessError::InvalidAlgebraic(format!(
                "invalid promotion piece {promotion:?} in {text:?}"
            )));
        }
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    Ok((from, to))
}

pub fn move_to_long_algebraic(mv: &Move) -> ChessResult<String> {
    squares_to_long_algebraic(mv.from, mv.to)
}

pub fn squares_to_long_algebraic(from: Square, to: Square) -> ChessResult<String> {
    Ok(format!(
        "{}{}",
        square_to_algebraic(from)?,
        square_to_algebraic(to)?
    ))
}

/// Space-separated long algebraic rendering of a move sequence.
pub fn moves_to_long_algebraic(moves: &[Move]) -> ChessResult<String> {
    let parts = moves
        .iter()
        .map(move_to_long_algebraic)
        .collect::<ChessResult<Vec<_>>>()?;
    Ok(parts.join(" "))
}
