//! Position-to-FEN export.

use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};
use crate::game_state::x88_board::X88Board;

/// Export `board` with `side_to_move`. The castling field is always `KQkq`,
/// en passant `-` and the half-move clock `0`; the full-move number is derived
/// from how many plies have been played.
pub fn generate_fen(board: &X88Board, side_to_move: Color, plies_played: usize) -> String {
    let mut fen = String::with_capacity(90);

    for rank in (0..8).rev() {
        let mut empty = 0u8;
        for file in 0..8 {
            match board.piece_at(Square::new(file, rank)) {
                Some(piece) => {
                    if empty > 0 {
                        fen.push(char::from(b'0' + empty));
                        empty = 0;
                    }
                    fen.push(piece_to_fen_char(&piece));
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            fen.push(char::from(b'0' + empty));
        }
        if rank > 0 {
            fen.push('/');
        }
    }

    let side = match side_to_move {
        Color::White => 'w',
        Color::Black => 'b',
    };
    fen.push_str(&format!(" {side} KQkq - 0 {}", plies_played / 2 + 1));
    fen
}

pub(crate) fn piece_to_fen_char(piece: &Piece) -> char {
    let ch = match piece.kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };
    match piece.color {
        Color::White => ch.to_ascii_uppercase(),
        Color::Black => ch,
    }
}
