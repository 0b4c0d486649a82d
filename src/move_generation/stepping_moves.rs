//! Pseudo-legal moves for pieces that step to fixed targets: knight, king
//! (including castling) and pawn.

use crate::game_state::chess_rules::{KINGSIDE_ROOK_FILE, KING_FILE, QUEENSIDE_ROOK_FILE};
use crate::game_state::chess_types::{Move, Piece, PieceKind, Square};
use crate::game_state::x88_board::X88Board;
use crate::move_generation::move_generator::is_square_attacked;

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub fn generate_knight_moves(board: &X88Board, knight: &Piece, out: &mut Vec<Move>) {
    generate_stepping_moves(board, knight, &KNIGHT_OFFSETS, out);
}

/// One-square king steps, plus the two castling jumps when `with_castling`.
pub fn generate_king_moves(
    board: &X88Board,
    king: &Piece,
    with_castling: bool,
    out: &mut Vec<Move>,
) {
    generate_stepping_moves(board, king, &KING_OFFSETS, out);
    if with_castling {
        generate_castling_moves(board, king, out);
    }
}

fn generate_stepping_moves(
    board: &X88Board,
    piece: &Piece,
    offsets: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(file_increment, rank_increment) in offsets {
        let to = piece.square.offset(file_increment, rank_increment);
        if board.is_free_or_opponent_piece(piece, to) {
            out.push(Move::new(*piece, to, board.piece_at(to)));
        }
    }
}

/// Castling is offered as a plain two-file king move; the rook relocation
/// happens in [`X88Board::copy_with_move`].
fn generate_castling_moves(board: &X88Board, king: &Piece, out: &mut Vec<Move>) {
    let color = king.color;
    let home = color.home_rank();
    let enemy = color.opposite();

    if !board.can_castle(color) || king.square != Square::new(KING_FILE, home) {
        return;
    }

    // No castling out of check.
    if is_square_attacked(board, king.square, enemy, true) {
        return;
    }

    let own_rook_on = |file: i8| {
        board
            .piece_at(Square::new(file, home))
            .is_some_and(|p| p.color == color && p.kind == PieceKind::Rook)
    };
    let safe = |file: i8| board.is_free_and_not_attacked(Square::new(file, home), enemy, true);

    if own_rook_on(KINGSIDE_ROOK_FILE) && safe(KING_FILE + 1) && safe(KING_FILE + 2) {
        out.push(Move::new(*king, Square::new(KING_FILE + 2, home), None));
    }

    if own_rook_on(QUEENSIDE_ROOK_FILE)
        && board.is_free(Square::new(QUEENSIDE_ROOK_FILE + 1, home))
        && safe(KING_FILE - 1)
        && safe(KING_FILE - 2)
    {
        out.push(Move::new(*king, Square::new(KING_FILE - 2, home), None));
    }
}

// TODO: en passant captures; the board keeps no en-passant target square yet.
pub fn generate_pawn_moves(board: &X88Board, pawn: &Piece, out: &mut Vec<Move>) {
    let direction = pawn.color.pawn_direction();
    let single = pawn.square.offset(0, direction);
    let single_free = board.is_free(single);

    if single_free {
        out.push(Move::new(*pawn, single, None));
    }

    let double = pawn.square.offset(0, 2 * direction);
    if pawn.square.rank == pawn.color.pawn_rank() && single_free && board.is_free(double) {
        out.push(Move::new(*pawn, double, None));
    }

    for file_increment in [1, -1] {
        let to = pawn.square.offset(file_increment, direction);
        if board.is_opponent_piece(pawn, to) {
            out.push(Move::new(*pawn, to, board.piece_at(to)));
        }
    }
}

/// Squares a pawn attacks regardless of what stands on them.
#[inline]
pub fn pawn_attacks(pawn: &Piece, target: Square) -> bool {
    target.rank == pawn.square.rank + pawn.color.pawn_direction()
        && (target.file - pawn.square.file).abs() == 1
}
