//! Engine abstraction layer used by the match harness and binaries.
//!
//! Defines common input parameters and output payloads so different engine
//! strategies can be selected at runtime behind a single trait interface.

use crate::game_state::board::Board;
use crate::game_state::chess_types::Move;

#[derive(Debug, Clone, Default)]
pub struct GoParams {
    /// Fixed search depth; engines pick their own when `None`.
    pub depth: Option<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub best_move: Option<Move>,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    fn choose_move(&mut self, board: &Board, params: &GoParams) -> Result<EngineOutput, String>;
}
