//! The single mutating entry point of the board state machine.
//!
//! Order of checks: bounds, source piece and turn, en passant, castling (which
//! commits on its own path), piece geometry, tentative application with a
//! self-check test, and finally commit. Every failure after a tentative
//! change restores the grid before returning.

use std::error::Error;
use std::fmt;

use log::trace;

use crate::game_state::board::{is_grid_in_check, Board};
use crate::game_state::chess_rules::{
    KINGSIDE_ROOK_COL, KINGSIDE_ROOK_DEST_COL, KING_START_COL, QUEENSIDE_ROOK_COL,
    QUEENSIDE_ROOK_DEST_COL,
};
use crate::game_state::chess_types::{Color, Move, Piece, PieceKind, Square};
use crate::moves::piece_moves::path_is_clear;

/// Why a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    OutOfBounds,
    EmptySource,
    WrongTurn { to_move: Color },
    IllegalPieceMove,
    CastlingRookMissing,
    CastlingRightsLost,
    CastlingPathBlocked,
    CastlingWhileInCheck,
    CastlingThroughCheck,
    LeavesKingInCheck,
    PromotionChoiceRequired,
    InvalidPromotionPiece(PieceKind),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::OutOfBounds => write!(f, "coordinates are off the board"),
            MoveError::EmptySource => write!(f, "no piece at source square"),
            MoveError::WrongTurn { to_move } => write!(f, "it is {}'s turn", to_move.name()),
            MoveError::IllegalPieceMove => write!(f, "invalid move for this piece"),
            MoveError::CastlingRookMissing => write!(f, "castling rook is not in place"),
            MoveError::CastlingRightsLost => {
                write!(f, "castling not allowed: king or rook has already moved")
            }
            MoveError::CastlingPathBlocked => write!(f, "castling blocked: path not clear"),
            MoveError::CastlingWhileInCheck => write!(f, "cannot castle out of check"),
            MoveError::CastlingThroughCheck => write!(f, "king would pass through check"),
            MoveError::LeavesKingInCheck => write!(f, "move leaves own king in check"),
            MoveError::PromotionChoiceRequired => write!(f, "promotion piece must be chosen"),
            MoveError::InvalidPromotionPiece(kind) => {
                write!(f, "cannot promote to {kind:?}")
            }
        }
    }
}

impl Error for MoveError {}

pub type MoveResult = Result<(), MoveError>;

#[inline]
fn rejected(err: MoveError) -> MoveResult {
    trace!("move rejected: {err}");
    Err(err)
}

impl Board {
    /// Move the piece on `(from_row, from_col)` to `(to_row, to_col)`.
    ///
    /// A pawn reaching the last rank promotes to a queen when its side is
    /// computer controlled; a human side must use
    /// [`Board::move_piece_with_promotion`].
    pub fn move_piece(
        &mut self,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    ) -> MoveResult {
        self.move_piece_with_promotion(from_row, from_col, to_row, to_col, None)
    }

    /// Apply a previously generated or engine-chosen move.
    pub fn make_move(&mut self, mv: &Move) -> MoveResult {
        self.move_piece_with_promotion(
            i32::from(mv.from.row),
            i32::from(mv.from.col),
            i32::from(mv.to.row),
            i32::from(mv.to.col),
            mv.promotion,
        )
    }

    pub fn move_piece_with_promotion(
        &mut self,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
        promotion: Option<PieceKind>,
    ) -> MoveResult {
        let (Some(from), Some(to)) = (
            Square::try_new(from_row, from_col),
            Square::try_new(to_row, to_col),
        ) else {
            return rejected(MoveError::OutOfBounds);
        };

        let Some(piece) = self.piece_on(from) else {
            return rejected(MoveError::EmptySource);
        };
        if piece.color != self.current_turn {
            return rejected(MoveError::WrongTurn {
                to_move: self.current_turn,
            });
        }

        let en_passant_victim = self.en_passant_victim(&piece, from, to);

        if is_castling_attempt(&piece, from, to) {
            return self.castle(piece, from, to);
        }

        if en_passant_victim.is_none() && !piece.is_valid_move(from, to, &self.squares) {
            return rejected(MoveError::IllegalPieceMove);
        }

        let promotion = if piece.kind == PieceKind::Pawn && to.row == piece.color.promotion_row() {
            match self.resolve_promotion(piece.color, promotion) {
                Ok(kind) => Some(kind),
                Err(err) => return rejected(err),
            }
        } else {
            None
        };

        // Tentative application.
        let saved = self.squares;
        let captured = match en_passant_victim {
            Some(victim) => self.take(victim),
            None => self.piece_on(to),
        };
        self.put(to, Some(piece));
        self.put(from, None);

        if self.is_in_check(piece.color) {
            self.squares = saved;
            return rejected(MoveError::LeavesKingInCheck);
        }

        // Commit.
        let mut placed = piece;
        placed.has_moved = true;
        if let Some(kind) = promotion {
            placed.kind = kind;
        }
        self.put(to, Some(placed));

        self.update_castling_flags(&piece, from, captured, to);

        let resets_clock = piece.kind == PieceKind::Pawn || captured.is_some();
        self.finish_move(Move::new(from, to, piece).with_promotion(promotion), resets_clock);
        Ok(())
    }

    /// Predicate-level legality including en passant, without the self-check test.
    pub fn is_pseudo_legal(&self, from: Square, to: Square) -> bool {
        let Some(piece) = self.piece_on(from) else {
            return false;
        };
        piece.is_valid_move(from, to, &self.squares)
            || self.en_passant_victim(&piece, from, to).is_some()
    }

    /// Square of the pawn an en-passant capture from `from` to `to` would remove.
    pub(crate) fn en_passant_victim(&self, piece: &Piece, from: Square, to: Square) -> Option<Square> {
        if piece.kind != PieceKind::Pawn {
            return None;
        }
        let last = self.last_move?;
        if last.piece_moved.color == piece.color || !last.is_pawn_double_step() {
            return None;
        }

        let forward = i32::from(to.row) - i32::from(from.row) == i32::from(piece.color.pawn_direction());
        if !forward || from.col.abs_diff(to.col) != 1 || self.piece_on(to).is_some() {
            return None;
        }

        let victim = Square::new(from.row, to.col);
        if last.to != victim {
            return None;
        }
        self.piece_on(victim)
            .is_some_and(|p| p.kind == PieceKind::Pawn && p.color != piece.color)
            .then_some(victim)
    }

    fn castle(&mut self, king: Piece, from: Square, to: Square) -> MoveResult {
        let color = king.color;
        let kingside = to.col > from.col;
        let (rook_col, rook_dest_col) = if kingside {
            (KINGSIDE_ROOK_COL, KINGSIDE_ROOK_DEST_COL)
        } else {
            (QUEENSIDE_ROOK_COL, QUEENSIDE_ROOK_DEST_COL)
        };
        let row = from.row;
        let rook_square = Square::new(row, rook_col);

        let rook = match self.piece_on(rook_square) {
            Some(rook) if rook.kind == PieceKind::Rook && rook.color == color => rook,
            _ => return rejected(MoveError::CastlingRookMissing),
        };
        if !self.castling.can_castle(color, kingside) || king.has_moved || rook.has_moved {
            return rejected(MoveError::CastlingRightsLost);
        }
        if !path_is_clear(from, rook_square, &self.squares) {
            return rejected(MoveError::CastlingPathBlocked);
        }
        if self.is_in_check(color) {
            return rejected(MoveError::CastlingWhileInCheck);
        }

        // Walk the king one square at a time on a scratch grid.
        let step: i32 = if kingside { 1 } else { -1 };
        for i in 1..=2 {
            let col = (i32::from(from.col) + step * i) as u8;
            let mut scratch = self.squares;
            scratch[row as usize][from.col as usize] = None;
            scratch[row as usize][col as usize] = Some(king);
            if is_grid_in_check(&scratch, color) {
                return rejected(MoveError::CastlingThroughCheck);
            }
        }

        self.put(from, None);
        self.put(rook_square, None);
        self.put(to, Some(Piece { has_moved: true, ..king }));
        self.put(
            Square::new(row, rook_dest_col),
            Some(Piece { has_moved: true, ..rook }),
        );
        self.castling.set_king_moved(color);
        self.castling.set_rook_moved(color, kingside);

        self.finish_move(Move::new(from, to, king), false);
        Ok(())
    }

    fn resolve_promotion(
        &self,
        color: Color,
        choice: Option<PieceKind>,
    ) -> Result<PieceKind, MoveError> {
        match choice {
            Some(kind) if kind.is_promotion_target() => Ok(kind),
            Some(kind) => Err(MoveError::InvalidPromotionPiece(kind)),
            None if self.is_computer_controlled(color) => Ok(PieceKind::Queen),
            None => Err(MoveError::PromotionChoiceRequired),
        }
    }

    fn update_castling_flags(&mut self, piece: &Piece, from: Square, captured: Option<Piece>, to: Square) {
        match piece.kind {
            PieceKind::King => self.castling.set_king_moved(piece.color),
            PieceKind::Rook => {
                if let Some(kingside) = rook_corner_side(piece.color, from) {
                    self.castling.set_rook_moved(piece.color, kingside);
                }
            }
            _ => {}
        }

        if let Some(victim) = captured.filter(|p| p.kind == PieceKind::Rook) {
            if let Some(kingside) = rook_corner_side(victim.color, to) {
                self.castling.set_rook_moved(victim.color, kingside);
            }
        }
    }

    /// Bookkeeping shared by ordinary moves and castling.
    fn finish_move(&mut self, mv: Move, resets_clock: bool) {
        self.last_move = Some(mv);
        self.halfmove_clock = if resets_clock {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        if mv.piece_moved.color == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.current_turn = self.current_turn.opposite();
        self.record_position();
    }

    #[inline]
    fn put(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.row as usize][square.col as usize] = piece;
    }

    #[inline]
    fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.row as usize][square.col as usize].take()
    }
}

#[inline]
fn is_castling_attempt(piece: &Piece, from: Square, to: Square) -> bool {
    piece.kind == PieceKind::King
        && from.row == to.row
        && from.row == piece.color.home_row()
        && from.col == KING_START_COL
        && from.col.abs_diff(to.col) == 2
}

/// `Some(kingside)` when `square` is one of `color`'s original rook corners.
fn rook_corner_side(color: Color, square: Square) -> Option<bool> {
    if square.row != color.home_row() {
        return None;
    }
    match square.col {
        KINGSIDE_ROOK_COL => Some(true),
        QUEENSIDE_ROOK_COL => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::MoveError;
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{Color, PieceKind};

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).expect("FEN should parse")
    }

    #[test]
    fn rejects_out_of_bounds_empty_source_and_wrong_turn() {
        let mut b = Board::new_game();
        assert_eq!(b.move_piece(8, 0, 7, 0), Err(MoveError::OutOfBounds));
        assert_eq!(b.move_piece(6, 4, -1, 4), Err(MoveError::OutOfBounds));
        assert_eq!(b.move_piece(4, 4, 3, 4), Err(MoveError::EmptySource));
        assert_eq!(
            b.move_piece(1, 4, 3, 4),
            Err(MoveError::WrongTurn { to_move: Color::White })
        );
        assert_eq!(b.move_piece(7, 0, 5, 0), Err(MoveError::IllegalPieceMove));
    }

    #[test]
    fn successful_move_flips_turn_and_records_last_move() {
        let mut b = Board::new_game();
        b.move_piece(6, 4, 4, 4).expect("e2e4 should be legal");
        assert_eq!(b.current_turn(), Color::Black);
        let last = b.last_move().expect("last move recorded");
        assert!(last.is_pawn_double_step());
        assert_eq!(b.halfmove_clock(), 0);
        assert_eq!(b.fullmove_number(), 1);

        b.move_piece(0, 6, 2, 5).expect("Ng8f6 should be legal");
        assert_eq!(b.halfmove_clock(), 1);
        assert_eq!(b.fullmove_number(), 2);
    }

    #[test]
    fn failed_move_restores_identical_state() {
        // White king e1 pinned knight on e2 by the rook on e8.
        let mut b = board("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
        let before = b.clone();
        let key_before = b.position_key();
        assert_eq!(b.move_piece(6, 4, 4, 5), Err(MoveError::LeavesKingInCheck));
        assert_eq!(b, before);
        assert_eq!(b.position_key(), key_before);
    }

    #[test]
    fn en_passant_removes_pawn_from_its_own_square() {
        let mut b = board("4k3/8/8/8/5p2/8/4P3/4K3 w - - 0 1");
        b.move_piece(6, 4, 4, 4).expect("e2e4 should be legal");
        // Black pawn f4 captures onto e3.
        b.move_piece(4, 5, 5, 4).expect("fxe3 e.p. should be legal");
        assert_eq!(b.piece_at(4, 4), None, "white pawn removed from e4");
        assert_eq!(
            b.piece_at(5, 4).map(|p| (p.color, p.kind)),
            Some((Color::Black, PieceKind::Pawn))
        );
        assert_eq!(b.halfmove_clock(), 0);
    }

    #[test]
    fn en_passant_only_immediately_after_double_step() {
        let mut b = board("4k3/8/8/8/5p2/8/4P3/4K3 w - - 0 1");
        b.move_piece(6, 4, 4, 4).expect("e2e4");
        b.move_piece(0, 4, 0, 3).expect("Ke8d8");
        b.move_piece(7, 4, 7, 3).expect("Ke1d1");
        assert_eq!(b.move_piece(4, 5, 5, 4), Err(MoveError::IllegalPieceMove));
    }

    #[test]
    fn en_passant_exposing_own_king_is_rolled_back() {
        // Capturing would open the fourth rank between the rook and the black king.
        let mut b = board("8/8/8/8/k4p1R/8/4P3/4K3 w - - 0 1");
        b.move_piece(6, 4, 4, 4).expect("e2e4");
        let before = b.clone();
        assert_eq!(b.move_piece(4, 5, 5, 4), Err(MoveError::LeavesKingInCheck));
        assert_eq!(b, before);
        assert!(b.piece_at(4, 4).is_some(), "victim restored");
    }

    #[test]
    fn kingside_castling_relocates_king_and_rook() {
        let mut b = board("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        b.move_piece(7, 4, 7, 6).expect("O-O should be legal");
        let king = b.piece_at(7, 6).expect("king on g1");
        let rook = b.piece_at(7, 5).expect("rook on f1");
        assert_eq!(king.kind, PieceKind::King);
        assert_eq!(rook.kind, PieceKind::Rook);
        assert!(king.has_moved && rook.has_moved);
        assert_eq!(b.piece_at(7, 4), None);
        assert_eq!(b.piece_at(7, 7), None);
        assert!(b.has_king_moved(Color::White));
        assert!(b.has_rook_moved(Color::White, true));
        assert_eq!(b.current_turn(), Color::Black);
    }

    #[test]
    fn kingside_castling_blocked_by_piece() {
        let mut b = board("4k3/8/8/8/8/8/8/4K1NR w K - 0 1");
        let before = b.clone();
        assert_eq!(b.move_piece(7, 4, 7, 6), Err(MoveError::CastlingPathBlocked));
        assert_eq!(b, before);
    }

    #[test]
    fn queenside_castling_allows_attacked_b_file() {
        // Black rook eyes b1, which the king never crosses.
        let mut b = board("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        b.move_piece(7, 4, 7, 2).expect("O-O-O should be legal");
        assert_eq!(b.piece_at(7, 3).map(|p| p.kind), Some(PieceKind::Rook));
    }

    #[test]
    fn castling_out_of_and_through_check_is_rejected() {
        let mut b = board("4r1k1/8/8/8/8/8/8/4K2R w K - 0 1");
        assert_eq!(b.move_piece(7, 4, 7, 6), Err(MoveError::CastlingWhileInCheck));

        let mut b = board("5rk1/8/8/8/8/8/8/4K2R w K - 0 1");
        assert_eq!(b.move_piece(7, 4, 7, 6), Err(MoveError::CastlingThroughCheck));
    }

    #[test]
    fn castling_after_rook_moved_is_rejected() {
        let mut b = board("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        b.move_piece(7, 7, 6, 7).expect("Rh2");
        b.move_piece(0, 4, 0, 3).expect("Kd8");
        b.move_piece(6, 7, 7, 7).expect("Rh1");
        b.move_piece(0, 3, 0, 4).expect("Ke8");
        assert_eq!(b.move_piece(7, 4, 7, 6), Err(MoveError::CastlingRightsLost));
    }

    #[test]
    fn human_promotion_needs_a_choice() {
        let mut b = board("8/4P3/8/8/8/8/k7/4K3 w - - 0 1");
        let before = b.clone();
        assert_eq!(b.move_piece(1, 4, 0, 4), Err(MoveError::PromotionChoiceRequired));
        assert_eq!(b, before);
        assert_eq!(
            b.move_piece_with_promotion(1, 4, 0, 4, Some(PieceKind::King)),
            Err(MoveError::InvalidPromotionPiece(PieceKind::King))
        );

        b.move_piece_with_promotion(1, 4, 0, 4, Some(PieceKind::Knight))
            .expect("underpromotion should be legal");
        assert_eq!(b.piece_at(0, 4).map(|p| p.kind), Some(PieceKind::Knight));
    }

    #[test]
    fn computer_side_promotes_to_queen() {
        let mut b = board("8/4P3/8/8/8/8/k7/4K3 w - - 0 1");
        b.set_computer_controlled(Color::White, true);
        b.move_piece(1, 4, 0, 4).expect("promotion should be legal");
        assert_eq!(b.piece_at(0, 4).map(|p| p.kind), Some(PieceKind::Queen));
        assert_eq!(b.last_move().and_then(|m| m.promotion), Some(PieceKind::Queen));
    }

    #[test]
    fn capturing_corner_rook_removes_castling_right() {
        let mut b = board("r3k3/8/8/8/8/8/8/R3K3 w Qq - 0 1");
        b.move_piece(7, 0, 0, 0).expect("Rxa8");
        assert!(b.has_rook_moved(Color::Black, false));
        assert!(b.has_rook_moved(Color::White, false));
    }
}
