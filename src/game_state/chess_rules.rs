//! Canonical chess-rule constants.
//!
//! This module stores static rule-related literals such as the standard
//! starting position and the files castling pieces start on.

use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub const KING_FILE: i8 = 4;
pub const KINGSIDE_ROOK_FILE: i8 = 7;
pub const QUEENSIDE_ROOK_FILE: i8 = 0;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The 32 pieces of the standard starting position, white first.
pub fn starting_pieces() -> Vec<Piece> {
    let mut pieces = Vec::with_capacity(32);
    for color in [Color::White, Color::Black] {
        for (file, kind) in (0i8..).zip(BACK_RANK) {
            pieces.push(Piece::new(Square::new(file, color.home_rank()), color, kind));
        }
        for file in 0..8 {
            pieces.push(Piece::new(
                Square::new(file, color.pawn_rank()),
                color,
                PieceKind::Pawn,
            ));
        }
    }
    pieces
}
