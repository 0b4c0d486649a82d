//! Legal move generation by speculative application.
//!
//! Pseudo-legal candidates are ordered captures-first, moves that would take
//! the enemy king are dropped, and every remaining candidate is applied to a
//! board copy; it is legal only if the mover's king is not in check
//! afterwards.

use crate::errors::ChessResult;
use crate::game_state::chess_types::{Color, Move, PieceKind};
use crate::game_state::x88_board::X88Board;
use crate::move_generation::move_generator::pseudo_legal_moves;
use crate::search::board_scoring::PositionalScorer;

#[derive(Debug, Clone)]
pub struct GeneratedMove {
    pub mv: Move,
    pub board_after: X88Board,
}

/// Value used to order candidates: the captured piece's material value, or 0.
#[inline]
pub fn capture_value(mv: &Move) -> f64 {
    mv.captured
        .map_or(0.0, |captured| PositionalScorer::piece_value(captured.kind))
}

/// Pseudo-legal candidates for `color`, most valuable capture first. The sort
/// is stable so quiet moves keep generation order.
pub fn ordered_candidate_moves(board: &X88Board, color: Color) -> Vec<Move> {
    let mut moves: Vec<Move> = pseudo_legal_moves(board, color, false)
        .filter(|mv| mv.captured.map(|c| c.kind) != Some(PieceKind::King))
        .collect();
    moves.sort_by(|a, b| capture_value(b).total_cmp(&capture_value(a)));
    moves
}

/// Applies `mv` and returns the successor when it leaves the mover's king
/// out of check.
pub fn apply_if_legal(board: &X88Board, mv: &Move) -> ChessResult<Option<X88Board>> {
    let next = board.copy_with_move(mv.from, mv.to)?;
    if next.is_king_in_check(mv.piece.color)? {
        Ok(None)
    } else {
        Ok(Some(next))
    }
}

/// Lazy iterator over legal moves; each item carries its successor board.
pub struct LegalMoves<'a> {
    board: &'a X88Board,
    candidates: std::vec::IntoIter<Move>,
}

impl Iterator for LegalMoves<'_> {
    type Item = ChessResult<GeneratedMove>;

    fn next(&mut self) -> Option<Self::Item> {
        for mv in self.candidates.by_ref() {
            match apply_if_legal(self.board, &mv) {
                Ok(Some(board_after)) => return Some(Ok(GeneratedMove { mv, board_after })),
                Ok(None) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }
}

pub fn legal_moves(board: &X88Board, color: Color) -> LegalMoves<'_> {
    LegalMoves {
        board,
        candidates: ordered_candidate_moves(board, color).into_iter(),
    }
}

pub fn collect_legal_moves(board: &X88Board, color: Color) -> ChessResult<Vec<GeneratedMove>> {
    legal_moves(board, color).collect()
}
