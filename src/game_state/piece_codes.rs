//! 0x88 cell codes.
//!
//! A cell is `0` when empty, otherwise `color bits | kind bits`. The low two
//! bits carry the color, the six bits above carry exactly one kind flag.

use crate::game_state::chess_types::{Color, PieceKind};

pub type Code = u8;

pub const EMPTY: Code = 0;

pub const COLOR_MASK: Code = 0b0000_0011;
pub const KIND_MASK: Code = 0b1111_1100;

pub const WHITE_CODE: Code = 0b0000_0001;
pub const BLACK_CODE: Code = 0b0000_0010;

pub const PAWN_CODE: Code = 0b0000_0100;
pub const KNIGHT_CODE: Code = 0b0000_1000;
pub const BISHOP_CODE: Code = 0b0001_0000;
pub const ROOK_CODE: Code = 0b0010_0000;
pub const QUEEN_CODE: Code = 0b0100_0000;
pub const KING_CODE: Code = 0b1000_0000;

#[inline]
pub const fn color_code(color: Color) -> Code {
    match color {
        Color::White => WHITE_CODE,
        Color::Black => BLACK_CODE,
    }
}

#[inline]
pub const fn kind_code(kind: PieceKind) -> Code {
    match kind {
        PieceKind::Pawn => PAWN_CODE,
        PieceKind::Knight => KNIGHT_CODE,
        PieceKind::Bishop => BISHOP_CODE,
        PieceKind::Rook => ROOK_CODE,
        PieceKind::Queen => QUEEN_CODE,
        PieceKind::King => KING_CODE,
    }
}

#[inline]
pub const fn encode(color: Color, kind: PieceKind) -> Code {
    color_code(color) | kind_code(kind)
}

/// Decodes a non-empty cell. Returns `None` for [`EMPTY`] and for codes that
/// do not name exactly one color and one kind.
#[inline]
pub const fn decode(code: Code) -> Option<(Color, PieceKind)> {
    let color = match code & COLOR_MASK {
        WHITE_CODE => Color::White,
        BLACK_CODE => Color::Black,
        _ => return None,
    };
    let kind = match code & KIND_MASK {
        PAWN_CODE => PieceKind::Pawn,
        KNIGHT_CODE => PieceKind::Knight,
        BISHOP_CODE => PieceKind::Bishop,
        ROOK_CODE => PieceKind::Rook,
        QUEEN_CODE => PieceKind::Queen,
        KING_CODE => PieceKind::King,
        _ => return None,
    };
    Some((color, kind))
}
