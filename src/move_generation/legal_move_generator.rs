//! Full legal move generation pipeline.
//!
//! Candidates come from the per-piece predicates (plus en passant) tried
//! against every destination square. Each candidate is applied to a snapshot
//! through [`Board::make_move`], so the generator and the rules engine can
//! never disagree about legality.

use log::debug;

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Move, PieceKind, Square};
use crate::move_generation::move_generator::{GeneratedMove, MoveGenerator};

pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, board: &Board) -> Vec<GeneratedMove> {
        generate_legal_moves_for(board, board.current_turn())
    }

    fn generate_legal_captures(&self, board: &Board) -> Vec<GeneratedMove> {
        let color = board.current_turn();
        candidate_moves(board, color)
            .into_iter()
            .filter(|mv| is_capture_candidate(board, mv))
            .filter_map(|mv| try_generated(board, color, mv))
            .collect()
    }
}

/// Legal moves for `color`, whether or not it is that side's turn.
pub fn generate_legal_moves(board: &Board, color: Color) -> Vec<Move> {
    generate_legal_moves_for(board, color)
        .into_iter()
        .map(|generated| generated.mv)
        .collect()
}

/// Short-circuiting existence check used by the terminal-state queries.
pub fn any_legal_move(board: &Board, color: Color) -> bool {
    candidate_moves(board, color)
        .into_iter()
        .any(|mv| try_generated(board, color, mv).is_some())
}

pub fn count_all_legal_moves(board: &Board) -> usize {
    let count = generate_legal_moves_for(board, board.current_turn()).len();
    debug!(
        "{} has {count} legal moves in {}",
        board.current_turn().name(),
        board.to_fen()
    );
    count
}

fn generate_legal_moves_for(board: &Board, color: Color) -> Vec<GeneratedMove> {
    candidate_moves(board, color)
        .into_iter()
        .filter_map(|mv| try_generated(board, color, mv))
        .collect()
}

/// Pseudo-legal candidates: every square pair the piece predicates accept,
/// with each promotion choice spelled out (queen first).
fn candidate_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);

    for (from, piece) in board.pieces().filter(|(_, p)| p.color == color) {
        for to in Square::all() {
            if !board.is_pseudo_legal(from, to) {
                continue;
            }

            let base = Move::new(from, to, piece);
            if piece.kind == PieceKind::Pawn && to.row == color.promotion_row() {
                out.extend(
                    PieceKind::PROMOTIONS
                        .into_iter()
                        .map(|kind| base.with_promotion(Some(kind))),
                );
            } else {
                out.push(base);
            }
        }
    }

    out
}

fn is_capture_candidate(board: &Board, mv: &Move) -> bool {
    board.piece_on(mv.to).is_some() || board.en_passant_victim(&mv.piece_moved, mv.from, mv.to).is_some()
}

/// Apply `mv` to a snapshot; `None` when the rules engine refuses it.
fn try_generated(board: &Board, color: Color, mv: Move) -> Option<GeneratedMove> {
    let mut next = board.snapshot();
    next.set_current_turn(color);

    let en_passant = board.en_passant_victim(&mv.piece_moved, mv.from, mv.to);
    let captured = match en_passant {
        Some(victim) => board.piece_on(victim),
        None => board.piece_on(mv.to),
    }
    .map(|p| p.kind);
    let is_castling =
        mv.piece_moved.kind == PieceKind::King && mv.from.col.abs_diff(mv.to.col) == 2;

    next.make_move(&mv).ok()?;

    let applied = next.last_move().unwrap_or(mv);
    Some(GeneratedMove {
        mv: applied,
        captured,
        is_en_passant: en_passant.is_some(),
        is_castling,
        board_after_move: next,
    })
}
