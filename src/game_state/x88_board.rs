//! 0x88 board representation.
//!
//! Ranks are stored 16 cells apart, so file or rank overflow sets one of the
//! `0x88` bits of the index and off-board squares are caught with a single
//! mask test. The board is copy-on-write: [`X88Board::copy_with_move`] builds a
//! successor and leaves the receiver untouched, which is what lets the search
//! explore many hypothetical positions without undo bookkeeping.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::{
    starting_pieces, KINGSIDE_ROOK_FILE, KING_FILE, QUEENSIDE_ROOK_FILE,
};
use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};
use crate::game_state::piece_codes::{self, Code, COLOR_MASK, EMPTY};
use crate::move_generation::move_generator::{any_piece_attacks, is_square_attacked};

pub const BOARD_CELLS: usize = 16 * 8;
const OFF_BOARD_MASK: i32 = 0x88;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct X88Board {
    cells: [Code; BOARD_CELLS],
    white_can_castle: bool,
    black_can_castle: bool,
}

impl Default for X88Board {
    fn default() -> Self {
        Self {
            cells: [EMPTY; BOARD_CELLS],
            white_can_castle: true,
            black_can_castle: true,
        }
    }
}

impl X88Board {
    /// Empty board with castling rights intact for both sides.
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn starting_position() -> Self {
        Self::from_pieces(&starting_pieces())
    }

    /// Populates a fresh board. Pieces placed off the board are ignored.
    pub fn from_pieces(pieces: &[Piece]) -> Self {
        let mut board = Self::new_empty();
        for piece in pieces {
            board.set_piece(*piece);
        }
        board
    }

    pub fn with_castling_rights(mut self, white_can_castle: bool, black_can_castle: bool) -> Self {
        self.white_can_castle = white_can_castle;
        self.black_can_castle = black_can_castle;
        self
    }

    /// Writes an encoded piece into its square. Used during setup only.
    pub fn set_piece(&mut self, piece: Piece) {
        if let Some(index) = index_of(piece.square) {
            self.cells[index] = piece_codes::encode(piece.color, piece.kind);
        }
    }

    /// Off-board squares and empty cells both yield `None`.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let index = index_of(square)?;
        decode_piece(square, self.cells[index])
    }

    /// All pieces in rank-major scan order.
    pub fn pieces(&self) -> Vec<Piece> {
        self.collect_pieces(|_| true)
    }

    pub fn pieces_of(&self, color: Color) -> Vec<Piece> {
        let expected = piece_codes::color_code(color);
        self.collect_pieces(|code| code & COLOR_MASK == expected)
    }

    pub fn pieces_of_kind(&self, color: Color, kind: PieceKind) -> Vec<Piece> {
        let expected = piece_codes::encode(color, kind);
        self.collect_pieces(|code| code == expected)
    }

    fn collect_pieces(&self, keep: impl Fn(Code) -> bool) -> Vec<Piece> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, code)| **code != EMPTY && keep(**code))
            .filter_map(|(index, code)| decode_piece(square_of(index), *code))
            .collect()
    }

    pub fn king_square(&self, color: Color) -> ChessResult<Square> {
        let king = piece_codes::encode(color, PieceKind::King);
        self.cells
            .iter()
            .position(|code| *code == king)
            .map(square_of)
            .ok_or(ChessError::MissingKing { color })
    }

    /// Off-board squares are never free.
    #[inline]
    pub fn is_free(&self, square: Square) -> bool {
        index_of(square).is_some_and(|index| self.cells[index] == EMPTY)
    }

    #[inline]
    pub fn is_opponent_piece(&self, piece: &Piece, square: Square) -> bool {
        self.color_on(square) == Some(piece.color.opposite())
    }

    #[inline]
    pub fn is_free_or_opponent_piece(&self, piece: &Piece, square: Square) -> bool {
        self.is_free(square) || self.is_opponent_piece(piece, square)
    }

    /// True when `square` is empty and no piece of `by` attacks it.
    /// `exclude_king_attacks` drops `by`'s king from the attackers so the two
    /// kings' castling checks cannot recurse into each other.
    pub fn is_free_and_not_attacked(
        &self,
        square: Square,
        by: Color,
        exclude_king_attacks: bool,
    ) -> bool {
        self.is_free(square) && !is_square_attacked(self, square, by, exclude_king_attacks)
    }

    /// Locates `color`'s king and asks whether any opposing piece that could
    /// geometrically reach it actually attacks it.
    pub fn is_king_in_check(&self, color: Color) -> ChessResult<bool> {
        let king_square = self.king_square(color)?;
        let eligible: Vec<Piece> = self
            .pieces_of(color.opposite())
            .into_iter()
            .filter(|piece| could_reach(piece, king_square))
            .collect();
        Ok(any_piece_attacks(self, &eligible, king_square))
    }

    #[inline]
    pub fn can_castle(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_can_castle,
            Color::Black => self.black_can_castle,
        }
    }

    /// Builds the successor position for a move between two squares: the
    /// piece relocates, whatever stood on `to` is removed, pawns reaching the
    /// last rank become queens, a two-file king move from its home square
    /// also relocates the rook, and moving a king or rook forfeits that
    /// side's castling rights. The receiver is never modified.
    pub fn copy_with_move(&self, from: Square, to: Square) -> ChessResult<X88Board> {
        let origin = index_of(from).ok_or(ChessError::EmptySquare { square: from })?;
        let code = self.cells[origin];
        if code == EMPTY {
            return Err(ChessError::EmptySquare { square: from });
        }
        let piece = decode_piece(from, code).ok_or(ChessError::InvalidPieceCode { code })?;
        let destination = index_of(to).ok_or(ChessError::SquareOutOfRange {
            file: to.file,
            rank: to.rank,
        })?;

        let mut next = *self;
        let color = piece.color;

        if matches!(piece.kind, PieceKind::King | PieceKind::Rook) {
            next.forfeit_castling(color);
        }

        if piece.kind == PieceKind::King && self.is_castling_move(&piece, to) {
            let (rook_from_file, rook_to_file) = if to.file > from.file {
                (KINGSIDE_ROOK_FILE, to.file - 1)
            } else {
                (QUEENSIDE_ROOK_FILE, to.file + 1)
            };
            let rook_from = Square::new(rook_from_file, from.rank);
            let rook_to = Square::new(rook_to_file, from.rank);
            if let (Some(rook_from_index), Some(rook_to_index)) =
                (index_of(rook_from), index_of(rook_to))
            {
                if self.cells[rook_from_index] == piece_codes::encode(color, PieceKind::Rook) {
                    next.cells[rook_from_index] = EMPTY;
                    next.cells[rook_to_index] = piece_codes::encode(color, PieceKind::Rook);
                }
            }
        }

        let landing_kind = if piece.kind == PieceKind::Pawn && to.rank == color.promotion_rank() {
            PieceKind::Queen
        } else {
            piece.kind
        };

        next.cells[origin] = EMPTY;
        next.cells[destination] = piece_codes::encode(color, landing_kind);
        Ok(next)
    }

    fn is_castling_move(&self, king: &Piece, to: Square) -> bool {
        let home = king.color.home_rank();
        self.can_castle(king.color)
            && king.square == Square::new(KING_FILE, home)
            && to.rank == home
            && (to.file - king.square.file).abs() == 2
    }

    fn forfeit_castling(&mut self, color: Color) {
        match color {
            Color::White => self.white_can_castle = false,
            Color::Black => self.black_can_castle = false,
        }
    }

    fn color_on(&self, square: Square) -> Option<Color> {
        let index = index_of(square)?;
        piece_codes::decode(self.cells[index]).map(|(color, _)| color)
    }
}

/// 0x88 index of a square, or `None` when it lies off the board.
#[inline]
pub fn index_of(square: Square) -> Option<usize> {
    let index = i32::from(square.rank) * 16 + i32::from(square.file);
    is_inside_the_board(index).then_some(index as usize)
}

#[inline]
fn is_inside_the_board(index: i32) -> bool {
    (0..BOARD_CELLS as i32).contains(&index) && index & OFF_BOARD_MASK == 0
}

#[inline]
fn square_of(index: usize) -> Square {
    Square::new((index & 7) as i8, (index >> 4) as i8)
}

#[inline]
fn decode_piece(square: Square, code: Code) -> Option<Piece> {
    piece_codes::decode(code).map(|(color, kind)| Piece::new(square, color, kind))
}

/// Coarse geometric pre-filter for check detection. It may over-include
/// (bishops and queens always pass) but must never exclude a real attacker.
fn could_reach(piece: &Piece, target: Square) -> bool {
    let file_distance = (piece.square.file - target.file).abs();
    let rank_distance = (piece.square.rank - target.rank).abs();
    match piece.kind {
        PieceKind::Pawn => {
            piece.square.rank + piece.color.pawn_direction() == target.rank && file_distance == 1
        }
        PieceKind::Knight => file_distance <= 2 && rank_distance <= 2,
        PieceKind::Rook => file_distance == 0 || rank_distance == 0,
        PieceKind::King => file_distance <= 1 && rank_distance <= 1,
        PieceKind::Bishop | PieceKind::Queen => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::piece_codes::{BLACK_CODE, WHITE_CODE};
    use crate::utils::fen_parser::parse_fen;

    fn sq(file: i8, rank: i8) -> Square {
        Square::new(file, rank)
    }

    #[test]
    fn off_board_squares_are_rejected_by_the_mask() {
        assert_eq!(index_of(sq(0, 0)), Some(0));
        assert_eq!(index_of(sq(7, 7)), Some(0x77));
        assert_eq!(index_of(sq(8, 0)), None);
        assert_eq!(index_of(sq(-1, 1)), None);
        assert_eq!(index_of(sq(0, 8)), None);
        assert_eq!(index_of(sq(0, -1)), None);
    }

    #[test]
    fn piece_lookup_returns_none_off_board_and_on_empty_cells() {
        let board = X88Board::starting_position();
        assert_eq!(board.piece_at(sq(4, 4)), None);
        assert_eq!(board.piece_at(sq(9, 0)), None);
        let king = board.piece_at(sq(4, 0)).expect("white king should be on e1");
        assert_eq!(king.kind, PieceKind::King);
        assert_eq!(king.color, Color::White);
    }

    #[test]
    fn piece_counts_agree_across_queries() {
        let positions = [
            (STARTING_POSITION_FEN, 16, 16),
            (
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
                16,
                16,
            ),
            ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 5, 5),
            ("4k3/8/8/8/8/8/4q3/4KQ2 w - - 0 1", 2, 2),
        ];
        for (fen, white, black) in positions {
            let board = parse_fen(fen).expect("FEN should parse").board();
            let mut by_kind = 0;
            for color in [Color::White, Color::Black] {
                for kind in PieceKind::ALL {
                    by_kind += board.pieces_of_kind(color, kind).len();
                }
            }
            let by_color =
                board.pieces_of(Color::White).len() + board.pieces_of(Color::Black).len();
            assert_eq!(board.pieces().len(), by_kind, "{fen}");
            assert_eq!(board.pieces().len(), by_color, "{fen}");
            assert_eq!(board.pieces_of(Color::White).len(), white, "{fen}");
            assert_eq!(board.pieces_of(Color::Black).len(), black, "{fen}");
        }
    }

    #[test]
    fn pieces_come_back_in_rank_major_order() {
        let board = X88Board::starting_position();
        let squares: Vec<Square> = board.pieces_of(Color::White).iter().map(|p| p.square).collect();
        assert_eq!(squares[0], sq(0, 0));
        assert_eq!(squares[7], sq(7, 0));
        assert_eq!(squares[8], sq(0, 1));
    }

    #[test]
    fn occupancy_queries_never_treat_off_board_as_free() {
        let board = X88Board::starting_position();
        let white_pawn = board.piece_at(sq(0, 1)).expect("a2 pawn");
        assert!(board.is_free(sq(0, 3)));
        assert!(!board.is_free(sq(-1, 3)));
        assert!(!board.is_free_or_opponent_piece(&white_pawn, sq(-1, 2)));
        assert!(board.is_opponent_piece(&white_pawn, sq(0, 6)));
        assert!(!board.is_opponent_piece(&white_pawn, sq(1, 1)));
        assert!(!board.is_opponent_piece(&white_pawn, sq(0, 3)));
    }

    #[test]
    fn copy_with_move_leaves_receiver_untouched() {
        let board = X88Board::starting_position();
        let next = board
            .copy_with_move(sq(4, 1), sq(4, 3))
            .expect("e2e4 should apply");
        assert!(board.piece_at(sq(4, 3)).is_none());
        assert!(board.piece_at(sq(4, 1)).is_some());
        assert!(next.piece_at(sq(4, 1)).is_none());
        assert_eq!(
            next.piece_at(sq(4, 3)).map(|p| p.kind),
            Some(PieceKind::Pawn)
        );
    }

    #[test]
    fn copy_with_move_from_empty_square_fails() {
        let board = X88Board::starting_position();
        let err = board
            .copy_with_move(sq(4, 4), sq(4, 5))
            .expect_err("moving from an empty square must fail");
        assert!(matches!(err, ChessError::EmptySquare { .. }));
    }

    #[test]
    fn capture_removes_the_target() {
        let board = X88Board::from_pieces(&[
            Piece::new(sq(4, 0), Color::White, PieceKind::King),
            Piece::new(sq(4, 7), Color::Black, PieceKind::King),
            Piece::new(sq(0, 0), Color::White, PieceKind::Rook),
            Piece::new(sq(0, 6), Color::Black, PieceKind::Knight),
        ]);
        let next = board
            .copy_with_move(sq(0, 0), sq(0, 6))
            .expect("rook capture should apply");
        assert_eq!(next.pieces().len(), 3);
        assert_eq!(next.piece_at(sq(0, 6)).map(|p| p.color), Some(Color::White));
    }

    #[test]
    fn pawn_reaching_last_rank_becomes_queen() {
        let board = X88Board::from_pieces(&[
            Piece::new(sq(4, 0), Color::White, PieceKind::King),
            Piece::new(sq(0, 7), Color::Black, PieceKind::King),
            Piece::new(sq(6, 6), Color::White, PieceKind::Pawn),
            Piece::new(sq(3, 1), Color::Black, PieceKind::Pawn),
        ]);
        let white = board
            .copy_with_move(sq(6, 6), sq(6, 7))
            .expect("white promotion should apply");
        assert_eq!(white.piece_at(sq(6, 7)).map(|p| p.kind), Some(PieceKind::Queen));

        let black = board
            .copy_with_move(sq(3, 1), sq(3, 0))
            .expect("black promotion should apply");
        let queen = black.piece_at(sq(3, 0)).expect("black queen on d1");
        assert_eq!((queen.color, queen.kind), (Color::Black, PieceKind::Queen));
    }

    #[test]
    fn kingside_castle_relocates_rook_and_forfeits_rights() {
        let board = X88Board::from_pieces(&[
            Piece::new(sq(4, 0), Color::White, PieceKind::King),
            Piece::new(sq(7, 0), Color::White, PieceKind::Rook),
            Piece::new(sq(4, 7), Color::Black, PieceKind::King),
        ]);
        let next = board
            .copy_with_move(sq(4, 0), sq(6, 0))
            .expect("castle should apply");
        assert_eq!(next.piece_at(sq(6, 0)).map(|p| p.kind), Some(PieceKind::King));
        assert_eq!(next.piece_at(sq(5, 0)).map(|p| p.kind), Some(PieceKind::Rook));
        assert!(next.is_free(sq(7, 0)));
        assert!(next.is_free(sq(4, 0)));
        assert!(!next.can_castle(Color::White));
        assert!(next.can_castle(Color::Black));
        assert!(board.can_castle(Color::White));
    }

    #[test]
    fn queenside_castle_relocates_rook() {
        let board = X88Board::from_pieces(&[
            Piece::new(sq(4, 7), Color::Black, PieceKind::King),
            Piece::new(sq(0, 7), Color::Black, PieceKind::Rook),
            Piece::new(sq(4, 0), Color::White, PieceKind::King),
        ]);
        let next = board
            .copy_with_move(sq(4, 7), sq(2, 7))
            .expect("castle should apply");
        assert_eq!(next.piece_at(sq(2, 7)).map(|p| p.kind), Some(PieceKind::King));
        assert_eq!(next.piece_at(sq(3, 7)).map(|p| p.kind), Some(PieceKind::Rook));
        assert!(next.is_free(sq(0, 7)));
        assert!(next.is_free(sq(1, 7)));
        assert!(!next.can_castle(Color::Black));
    }

    #[test]
    fn two_file_king_move_without_rights_moves_only_the_king() {
        let board = X88Board::from_pieces(&[
            Piece::new(sq(4, 0), Color::White, PieceKind::King),
            Piece::new(sq(7, 0), Color::White, PieceKind::Rook),
            Piece::new(sq(4, 7), Color::Black, PieceKind::King),
        ])
        .with_castling_rights(false, true);
        let next = board
            .copy_with_move(sq(4, 0), sq(6, 0))
            .expect("king move should apply");
        assert_eq!(next.piece_at(sq(7, 0)).map(|p| p.kind), Some(PieceKind::Rook));
        assert!(next.is_free(sq(5, 0)));
    }

    #[test]
    fn rook_move_forfeits_castling() {
        let board = X88Board::starting_position();
        let opened = board
            .copy_with_move(sq(7, 1), sq(7, 3))
            .expect("h2h4 should apply");
        assert!(opened.can_castle(Color::White));
        let rook_moved = opened
            .copy_with_move(sq(7, 0), sq(7, 2))
            .expect("h1h3 should apply");
        assert!(!rook_moved.can_castle(Color::White));
    }

    #[test]
    fn king_in_check_detects_each_attacker_kind() {
        let cases = [
            (Piece::new(sq(3, 1), Color::Black, PieceKind::Pawn), true),
            (Piece::new(sq(3, 0), Color::Black, PieceKind::Pawn), false),
            (Piece::new(sq(5, 2), Color::Black, PieceKind::Knight), true),
            (Piece::new(sq(0, 4), Color::Black, PieceKind::Bishop), true),
            (Piece::new(sq(4, 6), Color::Black, PieceKind::Rook), true),
            (Piece::new(sq(7, 3), Color::Black, PieceKind::Queen), true),
            (Piece::new(sq(6, 6), Color::Black, PieceKind::Queen), false),
        ];
        for (attacker, expected) in cases {
            let board = X88Board::from_pieces(&[
                Piece::new(sq(4, 0), Color::White, PieceKind::King),
                Piece::new(sq(0, 7), Color::Black, PieceKind::King),
                attacker,
            ]);
            let in_check = board
                .is_king_in_check(Color::White)
                .expect("both kings present");
            assert_eq!(in_check, expected, "attacker {attacker:?}");
        }
    }

    #[test]
    fn black_pawn_attacks_downward() {
        let board = X88Board::from_pieces(&[
            Piece::new(sq(4, 3), Color::White, PieceKind::King),
            Piece::new(sq(0, 7), Color::Black, PieceKind::King),
            Piece::new(sq(5, 4), Color::Black, PieceKind::Pawn),
        ]);
        assert!(board.is_king_in_check(Color::White).expect("kings present"));
    }

    #[test]
    fn blocked_slider_does_not_give_check() {
        let board = X88Board::from_pieces(&[
            Piece::new(sq(4, 0), Color::White, PieceKind::King),
            Piece::new(sq(4, 1), Color::White, PieceKind::Pawn),
            Piece::new(sq(4, 7), Color::Black, PieceKind::Rook),
            Piece::new(sq(0, 7), Color::Black, PieceKind::King),
        ]);
        assert!(!board.is_king_in_check(Color::White).expect("kings present"));
    }

    #[test]
    fn missing_king_is_reported() {
        let board = X88Board::from_pieces(&[Piece::new(sq(4, 0), Color::White, PieceKind::King)]);
        let err = board
            .is_king_in_check(Color::Black)
            .expect_err("black has no king");
        assert!(matches!(err, ChessError::MissingKing { color: Color::Black }));
    }

    #[test]
    fn moving_a_corrupt_cell_reports_its_code() {
        let mut board = X88Board::starting_position();
        let corrupt = WHITE_CODE | BLACK_CODE;
        board.cells[0x44] = corrupt;
        let err = board
            .copy_with_move(sq(4, 4), sq(4, 5))
            .expect_err("an undecodable cell cannot move");
        assert!(matches!(err, ChessError::InvalidPieceCode { code } if code == corrupt));
        assert_eq!(board.piece_at(sq(4, 4)), None);
    }
}
