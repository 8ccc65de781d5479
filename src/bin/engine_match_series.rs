//! Standalone engine-vs-engine series runner.
//!
//! Run with:
//! `cargo run --release --bin engine_match_series`
//! `cargo run --release --bin engine_match_series -- --verbose`

use mailbox_chess::engines::engine_minimax::{DepthSchedule, MinimaxEngine};
use mailbox_chess::engines::engine_random::RandomEngine;
use mailbox_chess::engines::engine_trait::Engine;
use mailbox_chess::search::iterative_deepening::SearchConfig;
use mailbox_chess::utils::engine_match_harness::{
    play_engine_match_series, MatchConfig, MatchSeriesConfig,
};

fn main() -> Result<(), String> {
    let verbose = std::env::args().any(|a| a == "--verbose" || a == "-v");
    let level = if verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    simple_logger::init_with_level(level).map_err(|e| format!("failed to install logger: {e}"))?;

    // Customize these two lines to experiment with different engines and depths.
    let player1 = || {
        Box::new(MinimaxEngine::new(
            SearchConfig::default(),
            DepthSchedule::fixed(3),
        )) as Box<dyn Engine>
    };
    let player2 = || Box::new(RandomEngine::new()) as Box<dyn Engine>;

    let stats = play_engine_match_series(
        player1,
        player2,
        MatchSeriesConfig {
            games: 4,
            base_seed: 1234,
            per_game: MatchConfig {
                max_plies: 160,
                opening_min_plies: 2,
                opening_max_plies: 6,
                ..MatchConfig::default()
            },
        },
    )?;

    println!("{}", stats.report());
    println!("outcomes: {:?}", stats.outcomes);
    Ok(())
}
