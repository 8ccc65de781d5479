//! Canonical position keys and the repetition history built from them.
//!
//! A key is the 64 squares in row-major order (`.` for empty, FEN letters for
//! pieces), the side to move, the castling rights still available, and the
//! en-passant target when the last move was a pawn double step.

use crate::game_state::board::Board;
use crate::game_state::chess_rules::REPETITION_LIMIT;
use crate::game_state::chess_types::{Color, Square};
use crate::utils::algebraic::square_to_algebraic;

impl Board {
    pub fn position_key(&self) -> String {
        let mut key = String::with_capacity(80);

        for row in &self.squares {
            for slot in row {
                key.push(slot.map_or('.', |p| p.fen_char()));
            }
        }

        key.push_str(match self.current_turn {
            Color::White => " w",
            Color::Black => " b",
        });

        for (color, kingside, tag) in [
            (Color::White, true, " K"),
            (Color::White, false, " Q"),
            (Color::Black, true, " k"),
            (Color::Black, false, " q"),
        ] {
            if self.castling.can_castle(color, kingside) {
                key.push_str(tag);
            }
        }

        if let Some(target) = self.en_passant_target() {
            key.push_str(" ep");
            key.push_str(&square_to_algebraic(target));
        }

        key
    }

    /// Square skipped by the last move when it was a pawn double step.
    pub fn en_passant_target(&self) -> Option<Square> {
        let last = self.last_move.filter(|m| m.is_pawn_double_step())?;
        let skipped_row = (last.from.row + last.to.row) / 2;
        Some(Square::new(skipped_row, last.from.col))
    }

    /// Forget every recorded position and count the current one once.
    pub fn reset_position_history(&mut self) {
        self.position_history.clear();
        if self.track_history {
            self.position_history.insert(self.position_key(), 1);
        }
    }

    pub(crate) fn record_position(&mut self) {
        if !self.track_history {
            return;
        }
        *self.position_history.entry(self.position_key()).or_insert(0) += 1;
    }

    /// How many times the current position has occurred.
    pub fn repetition_count(&self) -> u32 {
        self.position_history
            .get(&self.position_key())
            .copied()
            .unwrap_or(0)
    }

    #[inline]
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition_count() >= REPETITION_LIMIT
    }
}

#[cfg(test)]
mod tests {
    use crate::game_state::board::Board;

    #[test]
    fn starting_key_lists_all_rights() {
        let key = Board::new_game().position_key();
        assert!(key.starts_with("rnbqkbnrpppppppp"));
        assert!(key.ends_with(" w K Q k q"));
        assert_eq!(key.len(), 64 + 2 + 8);
    }

    #[test]
    fn double_step_adds_en_passant_target() {
        let mut board = Board::new_game();
        board.move_piece(6, 4, 4, 4).expect("e2e4");
        assert!(board.position_key().ends_with(" b K Q k q epe3"));
        board.move_piece(0, 6, 2, 5).expect("Nf6");
        assert!(!board.position_key().contains(" ep"));
    }

    #[test]
    fn knight_shuffle_repeats_start_position() {
        let mut board = Board::new_game();
        assert_eq!(board.repetition_count(), 1);
        for _ in 0..2 {
            board.move_piece(7, 6, 5, 5).expect("Nf3");
            board.move_piece(0, 6, 2, 5).expect("Nf6");
            board.move_piece(5, 5, 7, 6).expect("Ng1");
            board.move_piece(2, 5, 0, 6).expect("Ng8");
        }
        assert_eq!(board.repetition_count(), 3);
        assert!(board.is_threefold_repetition());
    }

    #[test]
    fn history_reset_counts_current_position_once() {
        let mut board = Board::new_game();
        board.move_piece(7, 6, 5, 5).expect("Nf3");
        board.reset_position_history();
        assert_eq!(board.repetition_count(), 1);
    }
}
