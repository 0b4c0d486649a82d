//! Pseudo-legal move generation and attack queries.
//!
//! Dispatches by piece kind to the stepping or sliding families. Moves are
//! geometrically valid and land on an empty or enemy square; whether they
//! leave the mover's own king safe is decided later by speculative
//! application (see `legal_move_generator`).

use crate::game_state::chess_types::{Color, Move, Piece, PieceKind, Square};
use crate::game_state::x88_board::X88Board;
use crate::move_generation::sliding_moves::{
    generate_bishop_moves, generate_queen_moves, generate_rook_moves,
};
use crate::move_generation::stepping_moves::{
    generate_king_moves, generate_knight_moves, generate_pawn_moves, pawn_attacks,
};

/// Lazily yields every pseudo-legal move of `color`, piece by piece in
/// board scan order. `exclude_king_moves` skips that side's king entirely.
pub fn pseudo_legal_moves(
    board: &X88Board,
    color: Color,
    exclude_king_moves: bool,
) -> impl Iterator<Item = Move> + '_ {
    board
        .pieces_of(color)
        .into_iter()
        .filter(move |piece| !exclude_king_moves || piece.kind != PieceKind::King)
        .flat_map(move |piece| piece_moves(board, &piece))
}

/// Pseudo-legal moves for an explicit set of pieces.
pub fn pseudo_legal_moves_for<'a>(
    board: &'a X88Board,
    pieces: &'a [Piece],
) -> impl Iterator<Item = Move> + 'a {
    pieces.iter().flat_map(move |piece| piece_moves(board, piece))
}

/// All pseudo-legal moves of a single piece, castling included.
pub fn piece_moves(board: &X88Board, piece: &Piece) -> Vec<Move> {
    let mut out = Vec::with_capacity(16);
    generate_piece_moves(board, piece, true, &mut out);
    out
}

fn generate_piece_moves(board: &X88Board, piece: &Piece, with_castling: bool, out: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(board, piece, out),
        PieceKind::Knight => generate_knight_moves(board, piece, out),
        PieceKind::Bishop => generate_bishop_moves(board, piece, out),
        PieceKind::Rook => generate_rook_moves(board, piece, out),
        PieceKind::Queen => generate_queen_moves(board, piece, out),
        PieceKind::King => generate_king_moves(board, piece, with_castling, out),
    }
}

/// Whether `piece` attacks `target`.
///
/// Pawns attack their two forward diagonals whether or not anything stands
/// there; every other piece attacks the squares its pseudo-legal moves reach.
/// Castling never captures, so it is left out.
pub fn piece_attacks(board: &X88Board, piece: &Piece, target: Square) -> bool {
    if piece.kind == PieceKind::Pawn {
        return pawn_attacks(piece, target);
    }
    let mut out = Vec::with_capacity(16);
    generate_piece_moves(board, piece, false, &mut out);
    out.iter().any(|mv| mv.to == target)
}

pub fn any_piece_attacks(board: &X88Board, pieces: &[Piece], target: Square) -> bool {
    pieces.iter().any(|piece| piece_attacks(board, piece, target))
}

/// Whether any piece of `by` attacks `target`, optionally ignoring `by`'s king.
pub fn is_square_attacked(
    board: &X88Board,
    target: Square,
    by: Color,
    exclude_king_attacks: bool,
) -> bool {
    board
        .pieces_of(by)
        .iter()
        .filter(|piece| !exclude_king_attacks || piece.kind != PieceKind::King)
        .any(|piece| piece_attacks(board, piece, target))
}
