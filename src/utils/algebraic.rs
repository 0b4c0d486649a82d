//! Square conversions for algebraic coordinates such as `e4`.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::Square;

/// Convert algebraic notation (for example: "e4") to a square.
#[inline]
pub fn algebraic_to_square(square: &str) -> ChessResult<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidAlgebraic(format!(
            "expected two characters, got {square:?}"
        )));
    }

    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) {
        return Err(ChessError::InvalidAlgebraic(format!(
            "invalid file {:?} in {square:?}",
            char::from(bytes[0])
        )));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::InvalidAlgebraic(format!(
            "invalid rank {:?} in {square:?}",
            char::from(rank)
        )));
    }

    Ok(Square::new((file - b'a') as i8, (rank - b'1') as i8))
}

/// Convert a square to algebraic notation (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> ChessResult<String> {
    if !square.is_on_board() {
        return Err(ChessError::SquareOutOfRange {
            file: square.file,
            rank: square.rank,
        });
    }

    let file_char = char::from(b'a' + square.file as u8);
    let rank_char = char::from(b'1' + square.rank as u8);
    Ok(format!("{file_char}{rank_char}"))
}
