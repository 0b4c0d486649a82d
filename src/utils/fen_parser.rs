//! FEN-to-position parser.
//!
//! Piece placement and side to move are required. The castling field maps to
//! the board's per-side castling flags (a side keeps its flag if either of its
//! letters is present); en-passant and clock fields are accepted but unused.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};
use crate::game_state::x88_board::X88Board;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenPosition {
    pub pieces: Vec<Piece>,
    pub side_to_move: Color,
    pub white_can_castle: bool,
    pub black_can_castle: bool,
}

impl FenPosition {
    pub fn board(&self) -> X88Board {
        X88Board::from_pieces(&self.pieces)
            .with_castling_rights(self.white_can_castle, self.black_can_castle)
    }
}

pub fn parse_fen(fen: &str) -> ChessResult<FenPosition> {
    let mut parts = fen.split_whitespace();

    let board_part = parts
        .next()
        .ok_or_else(|| ChessError::InvalidFen("missing board layout".to_owned()))?;
    let side_part = parts
        .next()
        .ok_or_else(|| ChessError::InvalidFen("missing side to move".to_owned()))?;
    let (white_can_castle, black_can_castle) = match parts.next() {
        Some(castling) => parse_castling_rights(castling)?,
        None => (true, true),
    };

    Ok(FenPosition {
        pieces: parse_board(board_part)?,
        side_to_move: parse_side_to_move(side_part)?,
        white_can_castle,
        black_can_castle,
    })
}

fn parse_board(board_part: &str) -> ChessResult<Vec<Piece>> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessError::InvalidFen(format!(
            "board layout must contain 8 ranks, got {}",
            ranks.len()
        )));
    }

    let mut pieces = Vec::with_capacity(32);
    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - fen_rank_idx as i8;
        let mut file = 0i8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid empty-square count '{ch}'"
                    )));
                }
                file += empty_count as i8;
                continue;
            }

            let (color, kind) = piece_from_fen_char(ch).ok_or_else(|| {
                ChessError::InvalidFen(format!("invalid piece character '{ch}'"))
            })?;
            if file >= 8 {
                return Err(ChessError::InvalidFen(format!(
                    "rank {} has too many files",
                    rank + 1
                )));
            }
            pieces.push(Piece::new(Square::new(file, rank), color, kind));
            file += 1;
        }

        if file != 8 {
            return Err(ChessError::InvalidFen(format!(
                "rank {} does not sum to 8 files",
                rank + 1
            )));
        }
    }

    Ok(pieces)
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        other => Err(ChessError::InvalidFen(format!("invalid side to move '{other}'"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<(bool, bool)> {
    if castling_part == "-" {
        return Ok((false, false));
    }

    let mut white = false;
    let mut black = false;
    for ch in castling_part.chars() {
        match ch {
            'K' | 'Q' => white = true,
            'k' | 'q' => black = true,
            _ => {
                return Err(ChessError::InvalidFen(format!(
                    "invalid castling rights '{castling_part}'"
                )))
            }
        }
    }
    Ok((white, black))
}

pub(crate) fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };
    Some((color, kind))
}
