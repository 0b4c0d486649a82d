//! Crate root module declarations for the x88_chess engine.
//!
//! Exposes the board representation, move generation, search, engine facade,
//! UCI protocol handling and notation helpers under stable module paths for
//! the binary, benchmarks and external tooling.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod piece_codes;
    pub mod x88_board;
}

pub mod move_generation {
    pub mod legal_move_generator;
    pub mod move_generator;
    pub mod perft;
    pub mod sliding_moves;
    pub mod stepping_moves;
}

pub mod search {
    pub mod board_scoring;
    pub mod iterative_deepening;
    pub mod search_events;
    pub mod search_tree;
}
pub mod tables {
    pub mod opening_book;
}
pub mod uci {
    pub mod uci_top;
}
pub mod engines {
    pub mod engine_config;
    pub mod engine_trait;
    pub mod x88_engine;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_board;
}
