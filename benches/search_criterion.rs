use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use mailbox_chess::game_state::board::Board;
use mailbox_chess::search::iterative_deepening::{SearchConfig, SearchEngine};

struct SearchCase {
    name: &'static str,
    fen: &'static str,
    depth: u8,
}

const CASES: &[SearchCase] = &[
    SearchCase {
        name: "opening",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        depth: 3,
    },
    SearchCase {
        name: "italian",
        fen: "r1bqk1nr/pppp1ppp/2n5/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
        depth: 3,
    },
    SearchCase {
        name: "rook_endgame",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        depth: 4,
    },
];

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_best_move");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(6));
    group.sample_size(10);

    for case in CASES {
        let board = Board::from_fen(case.fen).expect("benchmark FEN should parse");

        for (label, config) in [
            ("full", SearchConfig::default()),
            (
                "no_tt_no_lmr",
                SearchConfig {
                    use_transposition_table: false,
                    late_move_reductions: false,
                    ..SearchConfig::default()
                },
            ),
        ] {
            // Correctness guard before benchmarking.
            let mut guard = SearchEngine::new(config);
            let reference = guard
                .find_best_move(&board, case.depth)
                .expect("benchmark position has legal moves");
            let mut replay = board.clone();
            replay
                .make_move(&reference.best_move)
                .expect("search must return a legal move");

            group.bench_with_input(
                BenchmarkId::new(label, format!("{}_d{}", case.name, case.depth)),
                &case.depth,
                |b, &depth| {
                    b.iter(|| {
                        let mut engine = SearchEngine::new(config);
                        let result = engine
                            .find_best_move(black_box(&board), depth)
                            .expect("search benchmark run should succeed");
                        black_box(result.score)
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(search_benches, bench_search);
criterion_main!(search_benches);
