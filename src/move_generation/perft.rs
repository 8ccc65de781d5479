//! Perft node counting over a [`MoveGenerator`], with per-leaf move-kind tallies.

use std::sync::Arc;
use std::thread;

use crate::game_state::board::Board;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenerator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

pub fn perft<G: MoveGenerator>(generator: &G, board: &Board, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let mut total = PerftCounts::default();
    for mv in generator.generate_legal_moves(board) {
        perft_recurse(generator, &mv, depth, 1, &mut total);
    }
    total
}

/// One worker thread per root move.
pub fn perft_multi_threaded(
    generator: Arc<dyn MoveGenerator>,
    board: &Board,
    depth: u8,
) -> Result<PerftCounts, String> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let root_moves = generator.generate_legal_moves(board);
    let mut handles = Vec::with_capacity(root_moves.len());

    for mv in root_moves {
        let generator_ref = Arc::clone(&generator);
        handles.push(thread::spawn(move || {
            let mut local = PerftCounts::default();
            perft_recurse(generator_ref.as_ref(), &mv, depth, 1, &mut local);
            local
        }));
    }

    let mut total = PerftCounts::default();
    for handle in handles {
        let local = handle
            .join()
            .map_err(|_| "perft worker thread panicked".to_owned())?;
        total.merge(local);
    }

    Ok(total)
}

fn perft_recurse<G: MoveGenerator + ?Sized>(
    generator: &G,
    mv: &GeneratedMove,
    search_depth: u8,
    current_depth: u8,
    counts: &mut PerftCounts,
) {
    if current_depth == search_depth {
        counts.nodes += 1;

        if mv.is_capture() {
            counts.captures += 1;
        }
        if mv.is_en_passant {
            counts.en_passant += 1;
        }
        if mv.is_castling {
            counts.castles += 1;
        }
        if mv.mv.promotion.is_some() {
            counts.promotions += 1;
        }

        let after = &mv.board_after_move;
        if after.is_in_check(after.current_turn()) {
            counts.checks += 1;
            if !after.has_legal_moves(after.current_turn()) {
                counts.checkmates += 1;
            }
        }
        return;
    }

    for child in generator.generate_legal_moves(&mv.board_after_move) {
        perft_recurse(generator, &child, search_depth, current_depth + 1, counts);
    }
}
