//! Head-to-head engine match harness for local testing.
//!
//! Runs two `Engine` implementations against each other on a [`Board`], with
//! an optional seeded random opening prefix, and adjudicates every finished
//! game from the board's own terminal-state queries.

use std::time::Instant;

use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::engines::engine_trait::{Engine, GoParams};
use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, GameResult};
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::utils::algebraic::move_to_coordinate_text;
use crate::utils::render_game_state::render_game_state;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    WhiteWinCheckmate,
    BlackWinCheckmate,
    DrawStalemate,
    DrawRepetition,
    DrawFiftyMoveRule,
    DrawInsufficientMaterial,
    DrawMaxPlies,
}

impl MatchOutcome {
    #[inline]
    pub fn is_draw(self) -> bool {
        !matches!(
            self,
            MatchOutcome::WhiteWinCheckmate | MatchOutcome::BlackWinCheckmate
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerId {
    Player1,
    Player2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesOutcome {
    PlayerWinCheckmate { player: PlayerId, color: Color },
    Draw(MatchOutcome),
}

#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub max_plies: u16,
    pub opening_min_plies: u8,
    pub opening_max_plies: u8,
    pub go_params: GoParams,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_plies: 300,
            opening_min_plies: 2,
            opening_max_plies: 8,
            go_params: GoParams::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub outcome: MatchOutcome,
    pub final_board: Board,
    pub opening_moves: Vec<String>,
    pub played_moves: Vec<String>,
    pub white_move_count: u32,
    pub black_move_count: u32,
    pub white_total_time_ns: u128,
    pub black_total_time_ns: u128,
}

#[derive(Debug, Clone)]
pub struct MatchSeriesConfig {
    pub games: u16,
    pub base_seed: u64,
    pub per_game: MatchConfig,
}

impl Default for MatchSeriesConfig {
    fn default() -> Self {
        Self {
            games: 9,
            base_seed: 0,
            per_game: MatchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchSeriesStats {
    pub games: u16,
    pub player1_wins: u16,
    pub player2_wins: u16,
    pub draws: u16,
    pub outcomes: Vec<SeriesOutcome>,
    pub player1_moves: u32,
    pub player2_moves: u32,
    pub player1_total_time_ns: u128,
    pub player2_total_time_ns: u128,
    pub player1_avg_move_time_ms: f64,
    pub player2_avg_move_time_ms: f64,
    pub overall_avg_move_time_ms: f64,
}

impl MatchSeriesStats {
    pub fn report(&self) -> String {
        format!(
            "games={} player1_wins={} player2_wins={} draws={} p1_avg_ms={:.3} p2_avg_ms={:.3} overall_avg_ms={:.3}",
            self.games,
            self.player1_wins,
            self.player2_wins,
            self.draws,
            self.player1_avg_move_time_ms,
            self.player2_avg_move_time_ms,
            self.overall_avg_move_time_ms
        )
    }
}

/// Play a single seeded engine-vs-engine match from the opening position.
///
/// `engine_white` is White, `engine_black` is Black.
pub fn play_engine_match(
    mut engine_white: Box<dyn Engine>,
    mut engine_black: Box<dyn Engine>,
    seed: u64,
    config: MatchConfig,
) -> Result<MatchResult, String> {
    play_match_internal(
        Board::new_game(),
        engine_white.as_mut(),
        engine_black.as_mut(),
        Some(seed),
        config,
    )
}

/// Play a single match from a caller-provided board, without opening plies.
pub fn play_engine_match_from_board(
    mut engine_white: Box<dyn Engine>,
    mut engine_black: Box<dyn Engine>,
    start: Board,
    config: MatchConfig,
) -> Result<MatchResult, String> {
    play_match_internal(
        start,
        engine_white.as_mut(),
        engine_black.as_mut(),
        None,
        config,
    )
}

/// Terminal classification used by the harness, including the material draw.
pub fn adjudicate(board: &Board) -> Option<MatchOutcome> {
    match board.game_result() {
        GameResult::Checkmate => Some(match board.current_turn() {
            Color::White => MatchOutcome::BlackWinCheckmate,
            Color::Black => MatchOutcome::WhiteWinCheckmate,
        }),
        GameResult::Stalemate => Some(MatchOutcome::DrawStalemate),
        GameResult::FiftyMoveRule => Some(MatchOutcome::DrawFiftyMoveRule),
        GameResult::ThreefoldRepetition => Some(MatchOutcome::DrawRepetition),
        GameResult::Ongoing if board.has_insufficient_material() => {
            Some(MatchOutcome::DrawInsufficientMaterial)
        }
        GameResult::Ongoing => None,
    }
}

fn play_match_internal(
    mut board: Board,
    engine_white: &mut dyn Engine,
    engine_black: &mut dyn Engine,
    opening_seed: Option<u64>,
    config: MatchConfig,
) -> Result<MatchResult, String> {
    engine_white.new_game();
    engine_black.new_game();
    board.set_computer_controlled(Color::White, true);
    board.set_computer_controlled(Color::Black, true);

    let opening_moves = match opening_seed {
        Some(seed) => apply_seeded_random_opening(
            &mut board,
            seed,
            config.opening_min_plies,
            config.opening_max_plies,
        )?,
        None => Vec::new(),
    };

    let mut result = MatchResult {
        outcome: MatchOutcome::DrawMaxPlies,
        final_board: board.clone(),
        opening_moves,
        played_moves: Vec::new(),
        white_move_count: 0,
        black_move_count: 0,
        white_total_time_ns: 0,
        black_total_time_ns: 0,
    };

    for _ in 0..config.max_plies {
        if let Some(outcome) = adjudicate(&board) {
            debug!("{outcome:?} after {} plies\n{}", result.played_moves.len(), render_game_state(&board));
            result.outcome = outcome;
            result.final_board = board;
            return Ok(result);
        }

        let mover = board.current_turn();
        let engine: &mut dyn Engine = match mover {
            Color::White => &mut *engine_white,
            Color::Black => &mut *engine_black,
        };

        let started = Instant::now();
        let out = engine.choose_move(&board, &config.go_params)?;
        let elapsed_ns = started.elapsed().as_nanos();
        for line in &out.info_lines {
            debug!("{}: {line}", engine.name());
        }

        match mover {
            Color::White => {
                result.white_move_count = result.white_move_count.saturating_add(1);
                result.white_total_time_ns = result.white_total_time_ns.saturating_add(elapsed_ns);
            }
            Color::Black => {
                result.black_move_count = result.black_move_count.saturating_add(1);
                result.black_total_time_ns = result.black_total_time_ns.saturating_add(elapsed_ns);
            }
        }

        // Adjudication already ruled out mate and stalemate.
        let chosen = out
            .best_move
            .ok_or_else(|| format!("{} returned no move", engine.name()))?;

        board.make_move(&chosen).map_err(|e| {
            format!(
                "{} returned illegal move {}: {e}",
                engine.name(),
                move_to_coordinate_text(&chosen)
            )
        })?;
        result.played_moves.push(move_to_coordinate_text(&chosen));
    }

    result.outcome = adjudicate(&board).unwrap_or(MatchOutcome::DrawMaxPlies);
    result.final_board = board;
    Ok(result)
}

/// Play a series of matches and aggregate win/loss/draw statistics.
///
/// Player colors are randomized each game (deterministic from `base_seed`).
pub fn play_engine_match_series<F1, F2>(
    player1_factory: F1,
    player2_factory: F2,
    config: MatchSeriesConfig,
) -> Result<MatchSeriesStats, String>
where
    F1: Fn() -> Box<dyn Engine>,
    F2: Fn() -> Box<dyn Engine>,
{
    let mut stats = MatchSeriesStats {
        games: config.games,
        ..MatchSeriesStats::default()
    };
    let mut color_rng = StdRng::seed_from_u64(config.base_seed ^ 0xA5A5_5A5A_0123_4567);

    for i in 0..config.games {
        let player1_is_white = color_rng.random_bool(0.5);
        let seed = config.base_seed.wrapping_add(u64::from(i));
        info!(
            "game {}/{} seed={} white={} black={}",
            i + 1,
            config.games,
            seed,
            if player1_is_white { "Player1" } else { "Player2" },
            if player1_is_white { "Player2" } else { "Player1" },
        );

        let result = if player1_is_white {
            play_engine_match(player1_factory(), player2_factory(), seed, config.per_game.clone())?
        } else {
            play_engine_match(player2_factory(), player1_factory(), seed, config.per_game.clone())?
        };

        let (p1_moves, p2_moves, p1_ns, p2_ns) = if player1_is_white {
            (
                result.white_move_count,
                result.black_move_count,
                result.white_total_time_ns,
                result.black_total_time_ns,
            )
        } else {
            (
                result.black_move_count,
                result.white_move_count,
                result.black_total_time_ns,
                result.white_total_time_ns,
            )
        };
        stats.player1_moves = stats.player1_moves.saturating_add(p1_moves);
        stats.player2_moves = stats.player2_moves.saturating_add(p2_moves);
        stats.player1_total_time_ns = stats.player1_total_time_ns.saturating_add(p1_ns);
        stats.player2_total_time_ns = stats.player2_total_time_ns.saturating_add(p2_ns);

        let mapped = match result.outcome {
            MatchOutcome::WhiteWinCheckmate | MatchOutcome::BlackWinCheckmate => {
                let color = if result.outcome == MatchOutcome::WhiteWinCheckmate {
                    Color::White
                } else {
                    Color::Black
                };
                let player = if (color == Color::White) == player1_is_white {
                    stats.player1_wins += 1;
                    PlayerId::Player1
                } else {
                    stats.player2_wins += 1;
                    PlayerId::Player2
                };
                SeriesOutcome::PlayerWinCheckmate { player, color }
            }
            draw => {
                stats.draws += 1;
                SeriesOutcome::Draw(draw)
            }
        };
        stats.outcomes.push(mapped);

        info!(
            "game {}/{} result={:?} p1_wins={} p2_wins={} draws={}",
            i + 1,
            config.games,
            mapped,
            stats.player1_wins,
            stats.player2_wins,
            stats.draws
        );
    }

    stats.player1_avg_move_time_ms =
        avg_ns_per_move_ms(stats.player1_total_time_ns, stats.player1_moves);
    stats.player2_avg_move_time_ms =
        avg_ns_per_move_ms(stats.player2_total_time_ns, stats.player2_moves);

    let total_ns = stats
        .player1_total_time_ns
        .saturating_add(stats.player2_total_time_ns);
    let total_moves = stats.player1_moves.saturating_add(stats.player2_moves);
    stats.overall_avg_move_time_ms = avg_ns_per_move_ms(total_ns, total_moves);

    Ok(stats)
}

#[inline]
fn avg_ns_per_move_ms(total_ns: u128, moves: u32) -> f64 {
    if moves == 0 {
        0.0
    } else {
        (total_ns as f64) / (moves as f64) / 1_000_000.0
    }
}

/// Play a seeded number of uniformly random legal plies on `board`.
fn apply_seeded_random_opening(
    board: &mut Board,
    seed: u64,
    min_plies: u8,
    max_plies: u8,
) -> Result<Vec<String>, String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut opening_moves = Vec::<String>::new();

    let low = min_plies.min(max_plies);
    let high = max_plies.max(min_plies);
    let target_plies = if low == high {
        low
    } else {
        rng.random_range(low..=high)
    };

    for _ in 0..target_plies {
        let legal_moves = generate_legal_moves(board, board.current_turn());
        if legal_moves.is_empty() {
            break;
        }

        let chosen = legal_moves[rng.random_range(0..legal_moves.len())];
        board
            .make_move(&chosen)
            .map_err(|e| format!("opening move rejected: {e}"))?;
        opening_moves.push(move_to_coordinate_text(&chosen));
    }

    // The engines start counting repetitions from here.
    board.reset_position_history();
    Ok(opening_moves)
}
