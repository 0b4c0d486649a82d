use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use x88_chess::game_state::chess_types::Color;
use x88_chess::game_state::x88_board::X88Board;
use x88_chess::search::board_scoring::{BoardScorer, PositionalScorer};
use x88_chess::search::iterative_deepening::{SearchLimits, SearchSession};
use x88_chess::utils::fen_parser::parse_fen;

const MIDDLEGAME_FEN: &str = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";

fn bench_evaluation(c: &mut Criterion) {
    let scorer = PositionalScorer::default();
    let board = X88Board::starting_position();
    c.bench_function("evaluate_start_position", |b| {
        b.iter(|| black_box(scorer.score(black_box(&board), Color::White)))
    });
}

fn bench_search(c: &mut Criterion) {
    let scorer = PositionalScorer::default();
    let position = parse_fen(MIDDLEGAME_FEN).expect("benchmark FEN should parse");
    let board = position.board();

    let mut group = c.benchmark_group("iterative_deepening");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);

    for depth in 1..=3u8 {
        let limits = SearchLimits {
            max_depth: depth,
            ..SearchLimits::default()
        };

        // Correctness guard before benchmarking.
        let outcome = SearchSession::new(&scorer, limits)
            .search(&board, position.side_to_move)
            .expect("search should run");
        assert!(outcome.best_move.is_some(), "no move found at depth {depth}");

        group.bench_with_input(BenchmarkId::from_parameter(depth), &limits, |b, limits| {
            b.iter(|| {
                let outcome = SearchSession::new(&scorer, *limits)
                    .search(black_box(&board), position.side_to_move)
                    .expect("search benchmark run should succeed");
                black_box(outcome.best_move)
            });
        });
    }

    group.finish();
}

criterion_group!(search_benches, bench_evaluation, bench_search);
criterion_main!(search_benches);
