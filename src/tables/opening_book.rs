//! Opening table loaded from tab-separated data.
//!
//! Each row names an opening and lists its moves in long algebraic notation.
//! Rows are replayed from the starting position when the table is loaded, so
//! every stored move is a legal, fully described `Move`.

use rand::Rng;
use tracing::debug;

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{Color, Move};
use crate::game_state::x88_board::X88Board;
use crate::move_generation::legal_move_generator::collect_legal_moves;
use crate::utils::long_algebraic::parse_long_algebraic;

const DEFAULT_OPENINGS_TSV: &str = include_str!("data/openings.tsv");

#[derive(Debug, Clone, PartialEq)]
pub struct Opening {
    pub code: String,
    pub name: String,
    pub variation: String,
    pub moves: Vec<Move>,
}

impl Opening {
    /// True when this line starts with `history` and has at least one more move.
    pub fn continues(&self, history: &[Move]) -> bool {
        self.moves.len() > history.len()
            && self
                .moves
                .iter()
                .zip(history)
                .all(|(book, played)| book.same_squares(played))
    }
}

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    openings: Vec<Opening>,
}

impl OpeningBook {
    /// The table compiled into the binary.
    pub fn load_default() -> ChessResult<Self> {
        Self::from_tsv_str(DEFAULT_OPENINGS_TSV)
    }

    /// Parses a table with a header row. The move column is `uci` or `moves`;
    /// `eco`/`code`, `name` and `variation` are optional.
    pub fn from_tsv_str(tsv: &str) -> ChessResult<Self> {
        let mut lines = tsv.lines().filter(|line| !line.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| ChessError::InvalidOpening("opening table is empty".to_owned()))?;

        let mut code_idx = None;
        let mut name_idx = None;
        let mut variation_idx = None;
        let mut moves_idx = None;
        for (i, column) in header.split('\t').enumerate() {
            match column.trim().to_ascii_lowercase().as_str() {
                "eco" | "code" => code_idx = Some(i),
                "name" => name_idx = Some(i),
                "variation" => variation_idx = Some(i),
                "uci" | "moves" => moves_idx = Some(i),
                _ => {}
            }
        }
        let moves_idx = moves_idx.ok_or_else(|| {
            ChessError::InvalidOpening("table needs a 'uci' or 'moves' column".to_owned())
        })?;

        let mut openings = Vec::new();
        for line in lines {
            let fields: Vec<&str> = line.split('\t').collect();
            let field = |idx: Option<usize>| {
                idx.and_then(|i| fields.get(i))
                    .map(|s| s.trim().to_owned())
                    .unwrap_or_default()
            };
            let sequence = field(Some(moves_idx));
            if sequence.is_empty() {
                return Err(ChessError::InvalidOpening(format!(
                    "missing move sequence in row {line:?}"
                )));
            }

            openings.push(Opening {
                code: field(code_idx),
                name: field(name_idx),
                variation: field(variation_idx),
                moves: replay(&sequence)?,
            });
        }

        debug!(openings = openings.len(), "loaded opening table");
        Ok(Self { openings })
    }

    pub fn openings(&self) -> &[Opening] {
        &self.openings
    }

    pub fn len(&self) -> usize {
        self.openings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.openings.is_empty()
    }

    /// Every line that extends the moves played so far.
    pub fn continuations(&self, history: &[Move]) -> Vec<&Opening> {
        self.openings
            .iter()
            .filter(|opening| opening.continues(history))
            .collect()
    }

    /// Picks one continuing line uniformly at random and returns it with its
    /// next move.
    pub fn choose_continuation<R: Rng + ?Sized>(
        &self,
        history: &[Move],
        rng: &mut R,
    ) -> Option<(&Opening, Move)> {
        let candidates = self.continuations(history);
        if candidates.is_empty() {
            return None;
        }
        let opening = candidates[rng.random_range(0..candidates.len())];
        Some((opening, opening.moves[history.len()]))
    }
}

fn replay(sequence: &str) -> ChessResult<Vec<Move>> {
    let mut board = X88Board::starting_position();
    let mut color = Color::White;
    let mut moves = Vec::new();

    for token in sequence.split_whitespace() {
        let (from, to) = parse_long_algebraic(token).map_err(|err| {
            ChessError::InvalidOpening(format!("move {token:?} in {sequence:?}: {err}"))
        })?;
        let generated = collect_legal_moves(&board, color)?
            .into_iter()
            .find(|g| g.mv.from == from && g.mv.to == to)
            .ok_or_else(|| {
                ChessError::InvalidOpening(format!("illegal move {token:?} in {sequence:?}"))
            })?;
        moves.push(generated.mv);
        board = generated.board_after;
        color = color.opposite();
    }

    Ok(moves)
}
