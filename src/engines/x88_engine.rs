//! The default engine: 0x88 board, opening table, iterative deepening.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::engines::engine_config::EngineConfig;
use crate::engines::engine_trait::Engine;
use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::starting_pieces;
use crate::game_state::chess_types::{Color, Move, Piece, Square};
use crate::game_state::x88_board::X88Board;
use crate::move_generation::legal_move_generator::collect_legal_moves;
use crate::search::board_scoring::PositionalScorer;
use crate::search::iterative_deepening::{SearchSession, StopFlag};
use crate::search::search_events::{EngineEvent, EngineEventHandler};
use crate::tables::opening_book::OpeningBook;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;
use crate::utils::render_board::render_board;

pub struct X88Engine {
    config: EngineConfig,
    scorer: PositionalScorer,
    book: OpeningBook,
    rng: StdRng,
    board: X88Board,
    color_to_move: Color,
    /// The opening table only applies to games that began at the standard
    /// starting position.
    from_start_position: bool,
    history: Vec<Move>,
    total_nodes: u64,
    stop: StopFlag,
    events: Option<Box<dyn EngineEventHandler>>,
}

impl X88Engine {
    pub fn new(config: EngineConfig) -> ChessResult<Self> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic opening choices for tests and reproducible matches.
    pub fn with_seed(config: EngineConfig, seed: u64) -> ChessResult<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: EngineConfig, rng: StdRng) -> ChessResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            scorer: PositionalScorer::new(config.weights),
            book: OpeningBook::load_default()?,
            rng,
            board: X88Board::starting_position(),
            color_to_move: Color::White,
            from_start_position: true,
            history: Vec::new(),
            total_nodes: 0,
            stop: StopFlag::default(),
            events: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &X88Board {
        &self.board
    }

    pub fn total_nodes(&self) -> u64 {
        self.total_nodes
    }

    fn emit(&mut self, event: EngineEvent) {
        if let Some(events) = self.events.as_deref_mut() {
            events.handle(event);
        }
    }

    fn find_legal(&self, from: Square, to: Square) -> ChessResult<Option<(Move, X88Board)>> {
        Ok(collect_legal_moves(&self.board, self.color_to_move)?
            .into_iter()
            .find(|g| g.mv.from == from && g.mv.to == to)
            .map(|g| (g.mv, g.board_after)))
    }

    fn book_move(&mut self) -> Option<Move> {
        if !self.config.use_opening_book || !self.from_start_position {
            return None;
        }
        let (opening, next) = self.book.choose_continuation(&self.history, &mut self.rng)?;
        info!(
            code = %opening.code,
            name = %opening.name,
            variation = %opening.variation,
            next = %next,
            "opening table hit"
        );
        let event = EngineEvent::BestLine {
            score: 0.0,
            depth: u8::try_from(opening.moves.len()).unwrap_or(u8::MAX),
            nodes: 0,
            moves: opening.moves.clone(),
        };
        self.emit(event);
        Some(next)
    }

    fn reset_position(&mut self, board: X88Board, color_to_move: Color, from_start: bool) {
        self.board = board;
        self.color_to_move = color_to_move;
        self.from_start_position = from_start;
        self.history.clear();
        self.total_nodes = 0;
    }
}

impl Engine for X88Engine {
    fn name(&self) -> &str {
        "x88_chess"
    }

    fn author(&self) -> &str {
        "x88_chess developers"
    }

    fn setup_engine(&mut self) -> ChessResult<()> {
        debug!(config = ?self.config, openings = self.book.len(), "engine ready");
        Ok(())
    }

    fn setup_board(&mut self) {
        self.setup_board_with(&starting_pieces(), Color::White);
        self.from_start_position = true;
    }

    fn setup_board_with(&mut self, pieces: &[Piece], color_to_move: Color) {
        debug!(pieces = pieces.len(), ?color_to_move, "setting up board");
        self.reset_position(X88Board::from_pieces(pieces), color_to_move, false);
    }

    fn setup_from_fen(&mut self, fen: &str) -> ChessResult<()> {
        let position = parse_fen(fen)?;
        let board = position.board();
        let from_start = board == X88Board::starting_position()
            && position.side_to_move == Color::White;
        debug!(fen, "setting up board from FEN");
        self.reset_position(board, position.side_to_move, from_start);
        Ok(())
    }

    fn is_move_valid(&self, from: Square, to: Square) -> ChessResult<bool> {
        Ok(self.find_legal(from, to)?.is_some())
    }

    fn apply_move(&mut self, from: Square, to: Square) -> ChessResult<()> {
        let (mv, board_after) = self
            .find_legal(from, to)?
            .ok_or(ChessError::IllegalMove { from, to })?;
        self.history.push(mv);
        self.board = board_after;
        self.color_to_move = self.color_to_move.opposite();
        Ok(())
    }

    fn legal_moves(&self) -> ChessResult<Vec<Move>> {
        Ok(collect_legal_moves(&self.board, self.color_to_move)?
            .into_iter()
            .map(|g| g.mv)
            .collect())
    }

    fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        match name.trim().to_ascii_lowercase().as_str() {
            "depth" => {
                let depth = value
                    .trim()
                    .parse::<u8>()
                    .ok()
                    .filter(|d| *d >= 1)
                    .ok_or_else(|| ChessError::Config(format!("invalid depth {value:?}")))?;
                self.config.max_depth = depth;
            }
            "ownbook" => {
                self.config.use_opening_book = value
                    .trim()
                    .parse::<bool>()
                    .map_err(|_| ChessError::Config(format!("invalid OwnBook {value:?}")))?;
            }
            other => debug!(option = other, "ignoring unknown option"),
        }
        Ok(())
    }

    fn start_search(&mut self) {
        self.stop.clear();
    }

    fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    fn best_move_at_depth(&mut self, depth: Option<u8>) -> ChessResult<Option<Move>> {
        if let Some(mv) = self.book_move() {
            return Ok(Some(mv));
        }

        let mut limits = self.config.search_limits();
        if let Some(depth) = depth {
            limits.max_depth = depth.max(1);
        }
        let mut session = SearchSession::new(&self.scorer, limits)
            .with_stop_flag(self.stop.clone())
            .with_event_handler(self.events.as_deref_mut())
            .with_total_nodes(self.total_nodes);
        let outcome = session.search(&self.board, self.color_to_move)?;
        self.total_nodes = session.total_nodes();
        Ok(outcome.best_move)
    }

    fn set_event_handler(&mut self, handler: Box<dyn EngineEventHandler>) {
        self.events = Some(handler);
    }

    fn side_to_move(&self) -> Color {
        self.color_to_move
    }

    fn to_fen(&self) -> String {
        generate_fen(&self.board, self.color_to_move, self.history.len())
    }

    fn history(&self) -> &[Move] {
        &self.history
    }

    fn render(&self) -> String {
        render_board(&self.board)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::game_state::chess_types::PieceKind;

    fn sq(file: i8, rank: i8) -> Square {
        Square::new(file, rank)
    }

    fn engine_without_book() -> X88Engine {
        let config = EngineConfig {
            use_opening_book: false,
            max_depth: 2,
            ..EngineConfig::default()
        };
        X88Engine::with_seed(config, 1).expect("engine should build")
    }

    #[test]
    fn king_pawn_opening_is_valid_and_keeps_material_even() {
        let mut engine = engine_without_book();
        engine.setup_board();
        engine.apply_move(sq(4, 1), sq(4, 3)).expect("e2e4");
        assert_eq!(engine.side_to_move(), Color::Black);
        assert!(engine.is_move_valid(sq(4, 6), sq(4, 4)).expect("query"));
        engine.apply_move(sq(4, 6), sq(4, 4)).expect("e7e5");

        let scorer = PositionalScorer::default();
        assert_eq!(scorer.material_score(engine.board(), Color::White), 0.0);
        assert_eq!(scorer.material_score(engine.board(), Color::Black), 0.0);
        assert_eq!(engine.history().len(), 2);
        assert_eq!(
            engine.to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2"
        );
    }

    #[test]
    fn illegal_and_empty_square_moves_are_rejected() {
        let mut engine = engine_without_book();
        assert!(!engine.is_move_valid(sq(4, 1), sq(4, 4)).expect("query"));
        assert!(matches!(
            engine.apply_move(sq(4, 3), sq(4, 4)),
            Err(ChessError::IllegalMove { .. })
        ));
        assert!(matches!(
            engine.apply_move(sq(4, 6), sq(4, 4)),
            Err(ChessError::IllegalMove { .. })
        ));
        assert!(engine.history().is_empty());
    }

    #[test]
    fn kingside_castling_relocates_rook_and_forfeits_rights() {
        let mut engine = engine_without_book();
        for (from, to) in [
            (sq(4, 1), sq(4, 3)),
            (sq(4, 6), sq(4, 4)),
            (sq(6, 0), sq(5, 2)),
            (sq(1, 7), sq(2, 5)),
            (sq(5, 0), sq(2, 3)),
            (sq(6, 7), sq(5, 5)),
        ] {
            engine.apply_move(from, to).expect("preparatory move");
        }

        engine.apply_move(sq(4, 0), sq(6, 0)).expect("e1g1");
        let board = engine.board();
        assert_eq!(board.piece_at(sq(6, 0)).map(|p| p.kind), Some(PieceKind::King));
        assert_eq!(board.piece_at(sq(5, 0)).map(|p| p.kind), Some(PieceKind::Rook));
        assert!(board.piece_at(sq(7, 0)).is_none());
        assert!(!board.can_castle(Color::White));
        assert!(board.can_castle(Color::Black));
    }

    #[test]
    fn opening_table_answers_from_the_start_position() {
        let mut engine =
            X88Engine::with_seed(EngineConfig::default(), 3).expect("engine should build");
        let (tx, rx) = mpsc::channel();
        engine.set_event_handler(Box::new(tx));
        engine.start_search();
        let mv = engine.best_move().expect("search").expect("book move");
        assert!(engine.is_move_valid(mv.from, mv.to).expect("query"));
        assert_eq!(engine.total_nodes(), 0);
        match rx.try_recv().expect("book event") {
            EngineEvent::BestLine { score, nodes, moves, .. } => {
                assert_eq!(score, 0.0);
                assert_eq!(nodes, 0);
                assert!(moves[0].same_squares(&mv));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn fen_positions_skip_the_opening_table_and_search() {
        let config = EngineConfig {
            max_depth: 2,
            ..EngineConfig::default()
        };
        let mut engine = X88Engine::with_seed(config, 3).expect("engine should build");
        engine
            .setup_from_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1")
            .expect("FEN should parse");
        engine.start_search();
        let mv = engine.best_move().expect("search").expect("a move");
        assert_eq!((mv.from, mv.to), (sq(3, 0), sq(3, 4)));
        assert!(engine.total_nodes() > 0);
    }

    #[test]
    fn options_update_depth_and_book_usage() {
        let mut engine = engine_without_book();
        engine.set_option("Depth", "3").expect("depth option");
        engine.set_option("OwnBook", "true").expect("book option");
        assert_eq!(engine.config().max_depth, 3);
        assert!(engine.config().use_opening_book);
        assert!(engine.set_option("Depth", "0").is_err());
        assert!(engine.set_option("Hash", "16").is_ok());
    }

    #[test]
    fn checkmated_side_has_no_best_move() {
        let mut engine = engine_without_book();
        engine
            .setup_from_fen("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1")
            .expect("FEN should parse");
        engine.start_search();
        assert_eq!(engine.best_move().expect("search"), None);
        assert!(engine.legal_moves().expect("generation").is_empty());
    }
}
