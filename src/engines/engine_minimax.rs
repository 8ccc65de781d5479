//! Alpha-beta minimax engine.
//!
//! Wraps a [`SearchEngine`] and picks a search depth from how much material is
//! left: shallow while the board is crowded, deeper as it thins out.

use log::info;

use crate::engines::engine_trait::{Engine, EngineOutput, GoParams};
use crate::game_state::board::Board;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::search::board_scoring::PositionalScorer;
use crate::search::iterative_deepening::{SearchConfig, SearchEngine, SearchError};
use crate::utils::algebraic::move_to_coordinate_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthSchedule {
    /// Pieces on the board above which the position counts as crowded.
    pub crowded_above: usize,
    /// Pieces on the board at or below which the position counts as sparse.
    pub sparse_at_or_below: usize,
    pub crowded_depth: u8,
    pub middlegame_depth: u8,
    pub sparse_depth: u8,
}

impl Default for DepthSchedule {
    fn default() -> Self {
        Self {
            crowded_above: 28,
            sparse_at_or_below: 16,
            crowded_depth: 3,
            middlegame_depth: 4,
            sparse_depth: 5,
        }
    }
}

impl DepthSchedule {
    /// Same depth regardless of material.
    pub const fn fixed(depth: u8) -> Self {
        Self {
            crowded_above: 28,
            sparse_at_or_below: 16,
            crowded_depth: depth,
            middlegame_depth: depth,
            sparse_depth: depth,
        }
    }

    pub fn depth_for(&self, board: &Board) -> u8 {
        let pieces = board.piece_count();
        if pieces > self.crowded_above {
            self.crowded_depth
        } else if pieces > self.sparse_at_or_below {
            self.middlegame_depth
        } else {
            self.sparse_depth
        }
    }
}

pub struct MinimaxEngine {
    search: SearchEngine<LegalMoveGenerator, PositionalScorer>,
    schedule: DepthSchedule,
}

impl MinimaxEngine {
    pub fn new(config: SearchConfig, schedule: DepthSchedule) -> Self {
        Self {
            search: SearchEngine::new(config),
            schedule,
        }
    }

    pub fn with_fixed_depth(depth: u8) -> Self {
        Self::new(SearchConfig::default(), DepthSchedule::fixed(depth))
    }
}

impl Default for MinimaxEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default(), DepthSchedule::default())
    }
}

impl Engine for MinimaxEngine {
    fn name(&self) -> &str {
        "Mailbox Minimax"
    }

    fn new_game(&mut self) {
        self.search.reset_between_games();
    }

    fn choose_move(&mut self, board: &Board, params: &GoParams) -> Result<EngineOutput, String> {
        let depth = params.depth.unwrap_or_else(|| self.schedule.depth_for(board));
        let mut out = EngineOutput::default();

        let result = match self.search.find_best_move(board, depth) {
            Ok(result) => result,
            Err(SearchError::NoLegalMoves) => {
                out.info_lines
                    .push("info string minimax_engine no_legal_moves".to_owned());
                return Ok(out);
            }
            Err(err) => return Err(err.to_string()),
        };

        let stats = self.search.table_stats();
        out.info_lines.push(format!(
            "info depth {} score cp {} nodes {}",
            result.reached_depth, result.score, result.nodes
        ));
        out.info_lines.push(format!(
            "info string minimax_engine tt_hits {} tt_probes {} tt_stores {}",
            result.tt_hits, stats.probes, stats.stores
        ));
        info!(
            "{} plays {} at depth {} (score {}, {} nodes)",
            board.current_turn().name(),
            move_to_coordinate_text(&result.best_move),
            result.reached_depth,
            result.score,
            result.nodes
        );

        out.best_move = Some(result.best_move);
        Ok(out)
    }
}
