//! Legal move-tree node counting for move generator regression tests.

use crate::errors::ChessResult;
use crate::game_state::chess_types::{Color, PieceKind};
use crate::game_state::x88_board::X88Board;
use crate::move_generation::legal_move_generator::{legal_moves, GeneratedMove};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
    }
}

/// Counts leaf nodes `depth` plies below `board` with `color` to move.
/// Move-type tallies describe the moves made on the last ply.
pub fn perft(board: &X88Board, color: Color, depth: u8) -> ChessResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut total = PerftCounts::default();
    for generated in legal_moves(board, color) {
        let generated = generated?;
        if depth == 1 {
            total.merge(classify_leaf(&generated)?);
        } else {
            total.merge(perft(&generated.board_after, color.opposite(), depth - 1)?);
        }
    }
    Ok(total)
}

fn classify_leaf(generated: &GeneratedMove) -> ChessResult<PerftCounts> {
    let mv = &generated.mv;
    let is_castle =
        mv.piece.kind == PieceKind::King && (mv.to.file - mv.from.file).abs() == 2;
    let is_promotion =
        mv.piece.kind == PieceKind::Pawn && mv.to.rank == mv.piece.color.promotion_rank();
    let gives_check = generated
        .board_after
        .is_king_in_check(mv.piece.color.opposite())?;

    Ok(PerftCounts {
        nodes: 1,
        captures: u64::from(mv.captured.is_some()),
        castles: u64::from(is_castle),
        promotions: u64::from(is_promotion),
        checks: u64::from(gives_check),
    })
}
