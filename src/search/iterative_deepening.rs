//! Iterative deepening minimax search with alpha-beta pruning.
//!
//! Interior nodes are plain minimax over White-relative scores: White
//! maximizes, Black minimizes. Horizon nodes hand over to a capture-only
//! negamax quiescence search. A [`SearchEngine`] owns its transposition table
//! across calls until [`SearchEngine::reset_between_games`] is called.

use std::error::Error;
use std::fmt;

use log::debug;

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Move};
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenerator};
use crate::search::board_scoring::{color_sign, BoardScorer, PositionalScorer, MATE_SCORE};
use crate::search::move_ordering::{order_captures, order_moves, promote_move};
use crate::search::position_hash::position_hash;
use crate::search::transposition_table::{TTEntry, TTStats, TranspositionTable};
use crate::utils::algebraic::move_to_coordinate_text;

pub const INFINITY: i32 = MATE_SCORE + 1_000;

/// Moves at or past this index in a node's ordered list are candidates for reduction.
const LMR_MIN_INDEX: usize = 4;
/// Reductions only apply when more than this much depth remains.
const LMR_MIN_DEPTH: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub use_transposition_table: bool,
    pub late_move_reductions: bool,
    pub quiescence_max_ply: u8,
    pub tt_entries: usize,
    /// Wipe the table every N top-level calls. `None` leaves invalidation to
    /// [`SearchEngine::reset_between_games`].
    pub clear_table_every: Option<u32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            use_transposition_table: true,
            late_move_reductions: true,
            quiescence_max_ply: 8,
            tt_entries: 65_536,
            clear_table_every: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Move,
    /// White-relative score of the deepest completed iteration.
    pub score: i32,
    pub reached_depth: u8,
    pub nodes: u64,
    pub tt_hits: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    NoLegalMoves,
    InvalidDepth,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::NoLegalMoves => write!(f, "no legal moves available at the search root"),
            SearchError::InvalidDepth => write!(f, "search depth must be at least 1"),
        }
    }
}

impl Error for SearchError {}

pub struct SearchEngine<G: MoveGenerator, S: BoardScorer> {
    generator: G,
    scorer: S,
    config: SearchConfig,
    table: TranspositionTable,
    nodes: u64,
    tt_hits: u64,
    calls: u32,
}

impl SearchEngine<LegalMoveGenerator, PositionalScorer> {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_components(LegalMoveGenerator, PositionalScorer, config)
    }
}

impl Default for SearchEngine<LegalMoveGenerator, PositionalScorer> {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl<G: MoveGenerator, S: BoardScorer> SearchEngine<G, S> {
    pub fn with_components(generator: G, scorer: S, config: SearchConfig) -> Self {
        Self {
            generator,
            scorer,
            table: TranspositionTable::new(config.tt_entries),
            config,
            nodes: 0,
            tt_hits: 0,
            calls: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> SearchConfig {
        self.config
    }

    #[inline]
    pub fn table_stats(&self) -> TTStats {
        self.table.stats()
    }

    /// Drop every cached result. Call once per game.
    pub fn reset_between_games(&mut self) {
        self.table.clear();
        self.calls = 0;
        debug!("transposition table cleared between games");
    }

    /// Best move for the side to move, searching depths `1..=max_depth`.
    pub fn find_best_move(&mut self, board: &Board, max_depth: u8) -> Result<SearchResult, SearchError> {
        if max_depth == 0 {
            return Err(SearchError::InvalidDepth);
        }

        self.calls = self.calls.wrapping_add(1);
        if let Some(every) = self.config.clear_table_every.filter(|&n| n > 0) {
            if self.calls % every == 0 {
                self.table.clear();
                debug!("transposition table cleared after {} searches", self.calls);
            }
        }
        self.nodes = 0;
        self.tt_hits = 0;

        let mut root = self.generator.generate_legal_moves(board);
        if root.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }
        order_moves(&self.scorer, board, &mut root);

        let maximizing = board.current_turn() == Color::White;
        let mut scored: Vec<(GeneratedMove, i32)> = root.into_iter().map(|m| (m, 0)).collect();
        let mut result = None;

        for depth in 1..=max_depth {
            let (best_move, best_score) = self.search_root(&mut scored, depth, maximizing);

            debug!(
                "depth {depth} score {best_score} best {} nodes {} tt_hits {}",
                move_to_coordinate_text(&best_move),
                self.nodes,
                self.tt_hits
            );

            result = Some(SearchResult {
                best_move,
                score: best_score,
                reached_depth: depth,
                nodes: self.nodes,
                tt_hits: self.tt_hits,
            });

            // Seed the next iteration with this one's ranking.
            if maximizing {
                scored.sort_by_key(|&(_, score)| std::cmp::Reverse(score));
            } else {
                scored.sort_by_key(|&(_, score)| score);
            }
        }

        result.ok_or(SearchError::InvalidDepth)
    }

    fn search_root(
        &mut self,
        scored: &mut [(GeneratedMove, i32)],
        depth: u8,
        maximizing: bool,
    ) -> (Move, i32) {
        let mut alpha = -INFINITY;
        let mut beta = INFINITY;
        let mut best_score = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move = scored[0].0.mv;

        for (index, (child, slot)) in scored.iter_mut().enumerate() {
            let next_depth = self.child_depth(index, child, depth);
            let score = self.minimax(&child.board_after_move, next_depth, 1, alpha, beta);
            *slot = score;

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = child.mv;
                }
                alpha = alpha.max(score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = child.mv;
                }
                beta = beta.min(score);
            }
        }

        (best_move, best_score)
    }

    #[inline]
    fn child_depth(&self, index: usize, child: &GeneratedMove, depth: u8) -> u8 {
        let reduce = self.config.late_move_reductions
            && index >= LMR_MIN_INDEX
            && !child.is_capture()
            && depth > LMR_MIN_DEPTH;
        if reduce {
            depth - 2
        } else {
            depth - 1
        }
    }

    fn minimax(&mut self, board: &Board, depth: u8, ply: u8, mut alpha: i32, mut beta: i32) -> i32 {
        self.nodes += 1;

        if depth == 0 {
            return self.horizon_score(board, ply, alpha, beta);
        }

        let key = self.config.use_transposition_table.then(|| position_hash(board));
        if let Some(key) = key {
            if let Some(score) = self.table.probe(key, depth, alpha, beta) {
                self.tt_hits += 1;
                return score;
            }
        }

        let mut moves = self.generator.generate_legal_moves(board);
        if moves.is_empty() {
            return terminal_score(board, ply);
        }
        order_moves(&self.scorer, board, &mut moves);
        // Last best move stored for this position goes first.
        if let Some(previous) = key.and_then(|key| self.table.entry(key)).and_then(|e| e.best_move) {
            promote_move(&mut moves, &previous);
        }

        let maximizing = board.current_turn() == Color::White;
        let mut best = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move = None;

        for (index, child) in moves.iter().enumerate() {
            let next_depth = self.child_depth(index, child, depth);
            let score = self.minimax(&child.board_after_move, next_depth, ply + 1, alpha, beta);

            if maximizing {
                if score > best {
                    best = score;
                    best_move = Some(child.mv);
                }
                alpha = alpha.max(score);
            } else {
                if score < best {
                    best = score;
                    best_move = Some(child.mv);
                }
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }

        if let Some(key) = key {
            self.table.store(TTEntry {
                key,
                depth,
                score: best,
                best_move,
            });
        }

        best
    }

    /// White-relative leaf value: mate and stalemate are still recognised,
    /// otherwise quiescence decides.
    pub(crate) fn horizon_score(&mut self, board: &Board, ply: u8, alpha: i32, beta: i32) -> i32 {
        if !board.has_legal_moves(board.current_turn()) {
            return terminal_score(board, ply);
        }

        let sign = color_sign(board.current_turn());
        let (q_alpha, q_beta) = if sign > 0 { (alpha, beta) } else { (-beta, -alpha) };
        sign * self.quiescence(board, q_alpha, q_beta, 0)
    }

    /// Capture-only negamax from the side to move's point of view, fail-hard.
    fn quiescence(&mut self, board: &Board, mut alpha: i32, beta: i32, qply: u8) -> i32 {
        self.nodes += 1;

        let stand_pat = color_sign(board.current_turn()) * self.scorer.score(board);
        if qply >= self.config.quiescence_max_ply {
            return stand_pat;
        }
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut captures = self.generator.generate_legal_captures(board);
        order_captures(&mut captures);

        for capture in &captures {
            let score = -self.quiescence(&capture.board_after_move, -beta, -alpha, qply + 1);
            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }
}

/// Score of a node with no legal moves: mate (sooner is larger) or 0.
pub fn terminal_score(board: &Board, ply: u8) -> i32 {
    let to_move = board.current_turn();
    if board.is_in_check(to_move) {
        -color_sign(to_move) * (MATE_SCORE - i32::from(ply))
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::{PieceKind, Square};

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).expect("FEN should parse")
    }

    fn exhaustive_config() -> SearchConfig {
        SearchConfig {
            use_transposition_table: false,
            late_move_reductions: false,
            ..SearchConfig::default()
        }
    }

    /// Unpruned minimax sharing the engine's leaf evaluation.
    fn full_minimax(
        engine: &mut SearchEngine<LegalMoveGenerator, PositionalScorer>,
        board: &Board,
        depth: u8,
        ply: u8,
    ) -> i32 {
        if depth == 0 {
            return engine.horizon_score(board, ply, -INFINITY, INFINITY);
        }
        let moves = LegalMoveGenerator.generate_legal_moves(board);
        if moves.is_empty() {
            return terminal_score(board, ply);
        }
        let scores = moves
            .iter()
            .map(|m| full_minimax(engine, &m.board_after_move, depth - 1, ply + 1));
        if board.current_turn() == Color::White {
            scores.max().expect("moves is non-empty")
        } else {
            scores.min().expect("moves is non-empty")
        }
    }

    #[test]
    fn finds_mate_in_one_for_white() {
        let b = board("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let mut engine = SearchEngine::default();
        let result = engine.find_best_move(&b, 2).expect("search should succeed");
        assert_eq!(result.best_move.from, Square::new(7, 0));
        assert_eq!(result.best_move.to, Square::new(0, 0));
        assert_eq!(result.score, MATE_SCORE - 1);
    }

    #[test]
    fn finds_mate_in_one_for_black() {
        let b = board("r5k1/8/8/8/8/8/5PPP/6K1 b - - 0 1");
        let mut engine = SearchEngine::default();
        let result = engine.find_best_move(&b, 1).expect("search should succeed");
        assert_eq!(result.best_move.to, Square::new(7, 0));
        assert_eq!(result.score, -(MATE_SCORE - 1));
    }

    #[test]
    fn wins_hanging_queen() {
        let b = board("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1");
        let mut engine = SearchEngine::default();
        let result = engine.find_best_move(&b, 2).expect("search should succeed");
        assert_eq!(result.best_move.from, Square::new(4, 4));
        assert_eq!(result.best_move.to, Square::new(3, 3));
    }

    #[test]
    fn no_legal_moves_is_an_error() {
        let mut engine = SearchEngine::default();
        let mated = board("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(engine.find_best_move(&mated, 3), Err(SearchError::NoLegalMoves));
        let stalemated = board("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(engine.find_best_move(&stalemated, 3), Err(SearchError::NoLegalMoves));
    }

    #[test]
    fn zero_depth_is_rejected() {
        let mut engine = SearchEngine::default();
        assert_eq!(
            engine.find_best_move(&Board::new_game(), 0),
            Err(SearchError::InvalidDepth)
        );
    }

    #[test]
    fn search_is_deterministic_from_empty_table() {
        let b = board("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
        let mut first = SearchEngine::default();
        let a = first.find_best_move(&b, 3).expect("search should succeed");

        first.reset_between_games();
        let again = first.find_best_move(&b, 3).expect("search should succeed");

        let mut fresh = SearchEngine::default();
        let c = fresh.find_best_move(&b, 3).expect("search should succeed");

        assert_eq!(a.best_move, again.best_move);
        assert_eq!(a.best_move, c.best_move);
        assert_eq!(a.score, c.score);
    }

    #[test]
    fn alpha_beta_matches_full_minimax() {
        for (fen, depth) in [
            ("4k3/8/8/3q4/4P3/2N5/8/4K3 w - - 0 1", 3),
            ("4k3/8/8/3q4/4P3/2N5/8/4K3 b - - 0 1", 3),
            ("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1", 2),
            ("8/8/4k3/3p4/2P1P3/4K3/8/8 w - - 0 1", 3),
        ] {
            let b = board(fen);
            let mut engine = SearchEngine::new(exhaustive_config());
            let pruned = engine.find_best_move(&b, depth).expect("search should succeed");

            let mut reference = SearchEngine::new(exhaustive_config());
            let expected = full_minimax(&mut reference, &b, depth, 0);
            assert_eq!(pruned.score, expected, "{fen} at depth {depth}");
        }
    }

    #[test]
    fn table_is_reused_within_and_cleared_between_games() {
        let b = Board::new_game();
        let mut engine = SearchEngine::default();
        engine.find_best_move(&b, 3).expect("search should succeed");
        assert!(engine.table_stats().stores > 0);

        engine.reset_between_games();
        assert_eq!(engine.table_stats().stores, 0);
    }

    #[test]
    fn periodic_invalidation_clears_table() {
        let b = Board::new_game();
        let mut engine = SearchEngine::new(SearchConfig {
            clear_table_every: Some(2),
            ..SearchConfig::default()
        });
        engine.find_best_move(&b, 2).expect("first search");
        let after_first = engine.table_stats().stores;
        engine.find_best_move(&b, 2).expect("second search");
        // The second call wiped the table before searching again.
        assert!(engine.table_stats().stores <= after_first);
    }

    #[test]
    fn promotes_when_it_wins() {
        let b = board("8/4P3/8/8/8/8/k7/4K3 w - - 0 1");
        let mut engine = SearchEngine::default();
        let result = engine.find_best_move(&b, 2).expect("search should succeed");
        assert_eq!(result.best_move.promotion, Some(PieceKind::Queen));
    }

    const ITALIAN: &str = "r1bqk1nr/pppp1ppp/2n5/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

    #[test]
    fn quiescence_sees_the_recapture_behind_a_pawn_grab() {
        // d5 is defended by c6: taking it at depth 1 loses the queen.
        let b = board("4k3/8/2p5/3p4/8/8/8/3QK3 w - - 0 1");
        let mut engine = SearchEngine::default();
        let result = engine.find_best_move(&b, 1).expect("search should succeed");
        assert_ne!(result.best_move.to, Square::new(3, 3));
        assert!(result.score > 0, "still a queen up, got {}", result.score);
    }

    #[test]
    fn late_move_reductions_shrink_the_tree() {
        let b = board(ITALIAN);
        let mut reduced = SearchEngine::default();
        let with_lmr = reduced.find_best_move(&b, 4).expect("search should succeed");

        let mut full_width = SearchEngine::new(SearchConfig {
            late_move_reductions: false,
            ..SearchConfig::default()
        });
        let without_lmr = full_width.find_best_move(&b, 4).expect("search should succeed");

        assert!(
            with_lmr.nodes < without_lmr.nodes,
            "lmr {} vs full {}",
            with_lmr.nodes,
            without_lmr.nodes
        );
    }

    #[test]
    fn table_short_circuits_transpositions() {
        let b = board(ITALIAN);
        let mut engine = SearchEngine::default();
        let result = engine.find_best_move(&b, 4).expect("search should succeed");
        assert!(result.tt_hits > 0);
        assert!(engine.table_stats().hits > 0);

        let mut uncached = SearchEngine::new(SearchConfig {
            use_transposition_table: false,
            ..SearchConfig::default()
        });
        let plain = uncached.find_best_move(&b, 4).expect("search should succeed");
        assert_eq!(plain.tt_hits, 0);
        assert_eq!(uncached.table_stats().probes, 0);
    }
}
