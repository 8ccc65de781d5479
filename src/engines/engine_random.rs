//! Random-move engine.
//!
//! Selects uniformly from legal moves and is primarily used for diagnostics,
//! integration testing, and as a sparring partner in engine matches.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engines::engine_trait::{Engine, EngineOutput, GoParams};
use crate::game_state::board::Board;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::MoveGenerator;

pub struct RandomEngine {
    move_generator: LegalMoveGenerator,
    seeded: Option<StdRng>,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self {
            move_generator: LegalMoveGenerator,
            seeded: None,
        }
    }

    /// Reproducible move choices.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            move_generator: LegalMoveGenerator,
            seeded: Some(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        "Mailbox Random"
    }

    fn choose_move(&mut self, board: &Board, params: &GoParams) -> Result<EngineOutput, String> {
        let legal_moves = self.move_generator.generate_legal_moves(board);

        let mut out = EngineOutput::default();
        out.info_lines.push(format!(
            "info string random_engine legal_moves {}",
            legal_moves.len()
        ));

        if let Some(depth) = params.depth {
            out.info_lines
                .push(format!("info string random_engine requested_depth {depth}"));
        }

        if legal_moves.is_empty() {
            return Ok(out);
        }

        let picked = match self.seeded.as_mut() {
            Some(rng) => legal_moves.as_slice().choose(rng),
            None => legal_moves.as_slice().choose(&mut rand::rng()),
        }
        .ok_or("failed to choose a random move")?;

        out.best_move = Some(picked.mv);
        Ok(out)
    }
}
