//! Child ordering heuristics.
//!
//! Captures come first by most-valuable-victim / least-valuable-attacker, then
//! quiet moves by static evaluation of the resulting position from the mover's
//! side, nudged by opening principles and a center-square bonus.

use std::cmp::Reverse;

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Move, PieceKind};
use crate::move_generation::move_generator::GeneratedMove;
use crate::search::board_scoring::{color_sign, is_opening_phase, is_on_rim, BoardScorer, CENTER_SQUARES};

const CAPTURE_BASE: i32 = 10_000_000;
const CENTER_DESTINATION_BONUS: i32 = 10;

const CENTER_PAWN_PUSH_BONUS: i32 = 40;
const CASTLING_BONUS: i32 = 60;
const RIM_KNIGHT_PENALTY: i32 = 50;
const EARLY_KING_MOVE_PENALTY: i32 = 80;
const EARLY_QUEEN_MOVE_PENALTY: i32 = 30;
const EDGE_PAWN_PENALTY: i32 = 20;

/// Rank by kind: pawn 1 through king 6.
#[inline]
const fn rank(kind: PieceKind) -> i32 {
    kind.index() as i32 + 1
}

#[inline]
pub fn mvv_lva(victim: PieceKind, attacker: PieceKind) -> i32 {
    10 * rank(victim) - rank(attacker)
}

/// Opening-principle adjustment for `mv`.
pub fn opening_bonus(mv: &Move) -> i32 {
    let to = mv.to;
    match mv.piece_moved.kind {
        PieceKind::Pawn if to.col == 0 || to.col == 7 => -EDGE_PAWN_PENALTY,
        PieceKind::Pawn if to.col == 3 || to.col == 4 => CENTER_PAWN_PUSH_BONUS,
        PieceKind::Knight if is_on_rim(to) => -RIM_KNIGHT_PENALTY,
        PieceKind::King if mv.from.col.abs_diff(to.col) == 2 => CASTLING_BONUS,
        PieceKind::King => -EARLY_KING_MOVE_PENALTY,
        PieceKind::Queen => -EARLY_QUEEN_MOVE_PENALTY,
        _ => 0,
    }
}

pub fn move_order_score<S: BoardScorer>(scorer: &S, board: &Board, generated: &GeneratedMove) -> i32 {
    if let Some(victim) = generated.captured {
        return CAPTURE_BASE + mvv_lva(victim, generated.mv.piece_moved.kind);
    }

    let mover = generated.mv.piece_moved.color;
    let mut score = color_sign(mover) * scorer.score(&generated.board_after_move);
    if is_opening_phase(board) {
        score += opening_bonus(&generated.mv);
    }
    if CENTER_SQUARES.contains(&generated.mv.to) {
        score += CENTER_DESTINATION_BONUS;
    }
    score
}

/// Stable sort, best first.
pub fn order_moves<S: BoardScorer>(scorer: &S, board: &Board, moves: &mut [GeneratedMove]) {
    moves.sort_by_cached_key(|generated| Reverse(move_order_score(scorer, board, generated)));
}

/// Move `preferred` to the front, keeping the others in order. Returns
/// whether it was present.
pub fn promote_move(moves: &mut [GeneratedMove], preferred: &Move) -> bool {
    match moves.iter().position(|generated| generated.mv == *preferred) {
        Some(index) => {
            moves[..=index].rotate_right(1);
            true
        }
        None => false,
    }
}

/// Captures only need MVV-LVA.
pub fn order_captures(moves: &mut [GeneratedMove]) {
    moves.sort_by_cached_key(|generated| {
        Reverse(
            generated
                .captured
                .map_or(0, |victim| mvv_lva(victim, generated.mv.piece_moved.kind)),
        )
    });
}
