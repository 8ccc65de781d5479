//! Terminal-state queries derived on demand from the board.

use crate::game_state::board::Board;
use crate::game_state::chess_rules::FIFTY_MOVE_HALFMOVES;
use crate::game_state::chess_types::{Color, GameResult, PieceKind};
use crate::move_generation::legal_move_generator::any_legal_move;

impl Board {
    /// Whether `color` has at least one fully legal move, regardless of whose
    /// turn it is.
    pub fn has_legal_moves(&self, color: Color) -> bool {
        any_legal_move(self, color)
    }

    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_legal_moves(color)
    }

    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_legal_moves(color)
    }

    #[inline]
    pub fn is_fifty_move_rule(&self) -> bool {
        self.halfmove_clock >= FIFTY_MOVE_HALFMOVES
    }

    /// Classification for the side to move.
    pub fn game_result(&self) -> GameResult {
        let to_move = self.current_turn;
        let in_check = self.is_in_check(to_move);
        let has_moves = self.has_legal_moves(to_move);

        if in_check && !has_moves {
            GameResult::Checkmate
        } else if !has_moves {
            GameResult::Stalemate
        } else if self.is_fifty_move_rule() {
            GameResult::FiftyMoveRule
        } else if self.is_threefold_repetition() {
            GameResult::ThreefoldRepetition
        } else {
            GameResult::Ongoing
        }
    }

    /// Neither side can possibly mate: bare kings, or a single minor piece
    /// against a bare king.
    pub fn has_insufficient_material(&self) -> bool {
        let mut minors = 0;
        for (_, piece) in self.pieces() {
            match piece.kind {
                PieceKind::King => {}
                PieceKind::Knight | PieceKind::Bishop => minors += 1,
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            }
        }
        minors <= 1
    }
}
