//! Static position evaluation.
//!
//! Search only depends on the `BoardScorer` trait, so alternate heuristics can
//! be swapped in without touching the alpha-beta driver. The default
//! `PositionalScorer` sums material balance, minor-piece development and
//! center occupation, all signed relative to the requested perspective.

use serde::{Deserialize, Serialize};

use crate::game_state::chess_types::{Color, Piece, PieceKind};
use crate::game_state::x88_board::X88Board;

pub trait BoardScorer: Send + Sync {
    /// Score of `board` from `perspective`'s point of view; positive is good
    /// for `perspective`.
    fn score(&self, board: &X88Board, perspective: Color) -> f64;
}

/// Tunable evaluation terms. Defaults reproduce the hand-tuned values the
/// engine has always played with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationWeights {
    pub pawn: f64,
    pub knight: f64,
    pub bishop: f64,
    pub rook: f64,
    pub queen: f64,
    pub king: f64,
    pub development_bonus: f64,
    pub undeveloped_penalty: f64,
    pub inner_center_bonus: f64,
    pub outer_center_bonus: f64,
}

impl Default for EvaluationWeights {
    fn default() -> Self {
        Self {
            pawn: PositionalScorer::piece_value(PieceKind::Pawn),
            knight: PositionalScorer::piece_value(PieceKind::Knight),
            bishop: PositionalScorer::piece_value(PieceKind::Bishop),
            rook: PositionalScorer::piece_value(PieceKind::Rook),
            queen: PositionalScorer::piece_value(PieceKind::Queen),
            king: PositionalScorer::piece_value(PieceKind::King),
            development_bonus: 0.3,
            undeveloped_penalty: 0.1,
            inner_center_bonus: 0.2,
            outer_center_bonus: 0.1,
        }
    }
}

impl EvaluationWeights {
    #[inline]
    pub const fn material(&self, kind: PieceKind) -> f64 {
        match kind {
            PieceKind::Pawn => self.pawn,
            PieceKind::Knight => self.knight,
            PieceKind::Bishop => self.bishop,
            PieceKind::Rook => self.rook,
            PieceKind::Queen => self.queen,
            PieceKind::King => self.king,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalScorer {
    weights: EvaluationWeights,
}

impl PositionalScorer {
    pub const fn new(weights: EvaluationWeights) -> Self {
        Self { weights }
    }

    /// Fixed material values, also used for capture ordering.
    #[inline]
    pub const fn piece_value(kind: PieceKind) -> f64 {
        match kind {
            PieceKind::Pawn => 1.0,
            PieceKind::Knight => 3.0,
            PieceKind::Bishop => 3.2,
            PieceKind::Rook => 5.0,
            PieceKind::Queen => 9.0,
            PieceKind::King => 200.0,
        }
    }

    /// Sum over kinds of (own count - enemy count) * value.
    pub fn material_score(&self, board: &X88Board, perspective: Color) -> f64 {
        let mut counts = [[0i32; 6]; 2];
        for piece in board.pieces() {
            counts[piece.color.index()][piece.kind.index()] += 1;
        }

        let own = perspective.index();
        let enemy = perspective.opposite().index();
        PieceKind::ALL
            .iter()
            .map(|&kind| {
                let diff = counts[own][kind.index()] - counts[enemy][kind.index()];
                f64::from(diff) * self.weights.material(kind)
            })
            .sum()
    }

    /// Every piece earns the development bonus except knights and bishops still
    /// on their starting squares, which earn the penalty instead.
    pub fn development_score(&self, board: &X88Board, perspective: Color) -> f64 {
        board
            .pieces()
            .iter()
            .map(|piece| {
                let term = if is_undeveloped_minor(piece) {
                    -self.weights.undeveloped_penalty
                } else {
                    self.weights.development_bonus
                };
                sign(piece.color, perspective) * term
            })
            .sum()
    }

    pub fn center_score(&self, board: &X88Board, perspective: Color) -> f64 {
        board
            .pieces()
            .iter()
            .map(|piece| {
                let (file, rank) = (piece.square.file, piece.square.rank);
                let term = if (3..=4).contains(&file) && (3..=4).contains(&rank) {
                    self.weights.inner_center_bonus
                } else if (2..=5).contains(&file) && (2..=5).contains(&rank) {
                    self.weights.outer_center_bonus
                } else {
                    0.0
                };
                sign(piece.color, perspective) * term
            })
            .sum()
    }
}

impl BoardScorer for PositionalScorer {
    fn score(&self, board: &X88Board, perspective: Color) -> f64 {
        self.material_score(board, perspective)
            + self.development_score(board, perspective)
            + self.center_score(board, perspective)
    }
}

#[inline]
fn sign(color: Color, perspective: Color) -> f64 {
    if color == perspective {
        1.0
    } else {
        -1.0
    }
}

fn is_undeveloped_minor(piece: &Piece) -> bool {
    let home = piece.square.rank == piece.color.home_rank();
    match piece.kind {
        PieceKind::Knight => home && matches!(piece.square.file, 1 | 6),
        PieceKind::Bishop => home && matches!(piece.square.file, 2 | 5),
        _ => false,
    }
}
