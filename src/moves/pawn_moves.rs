//! Pawn pushes and captures. En passant needs last-move context and is
//! decided by the board layer, not here.

use crate::game_state::chess_types::{Color, Grid, Square};
use crate::moves::piece_moves::piece_at;

pub fn is_valid_pawn_move(color: Color, from: Square, to: Square, grid: &Grid) -> bool {
    let direction = color.pawn_direction() as i32;
    let d_row = to.row as i32 - from.row as i32;
    let d_col = to.col as i32 - from.col as i32;

    if d_col == 0 {
        if d_row == direction && piece_at(grid, to).is_none() {
            return true;
        }
        if from.row == color.pawn_start_row() && d_row == 2 * direction {
            let Some(skipped) = from.offset(direction, 0) else {
                return false;
            };
            return piece_at(grid, skipped).is_none() && piece_at(grid, to).is_none();
        }
        return false;
    }

    d_col.abs() == 1
        && d_row == direction
        && piece_at(grid, to).is_some_and(|target| target.color != color)
}

#[cfg(test)]
mod tests {
    use super::is_valid_pawn_move;
    use crate::game_state::chess_types::{Color, PieceKind};
    use crate::moves::piece_moves::test_support::*;

    #[test]
    fn white_pawn_single_and_double_step_from_start() {
        let mut grid = empty_grid();
        place(&mut grid, 6, 4, Color::White, PieceKind::Pawn);
        assert!(is_valid_pawn_move(Color::White, sq(6, 4), sq(5, 4), &grid));
        assert!(is_valid_pawn_move(Color::White, sq(6, 4), sq(4, 4), &grid));
        assert!(!is_valid_pawn_move(Color::White, sq(6, 4), sq(3, 4), &grid));
        assert!(!is_valid_pawn_move(Color::White, sq(6, 4), sq(7, 4), &grid));
    }

    #[test]
    fn double_step_needs_both_squares_empty() {
        let mut grid = empty_grid();
        place(&mut grid, 1, 3, Color::Black, PieceKind::Pawn);
        place(&mut grid, 2, 3, Color::White, PieceKind::Knight);
        assert!(!is_valid_pawn_move(Color::Black, sq(1, 3), sq(3, 3), &grid));
        assert!(!is_valid_pawn_move(Color::Black, sq(1, 3), sq(2, 3), &grid));
    }

    #[test]
    fn double_step_only_from_start_row() {
        let mut grid = empty_grid();
        place(&mut grid, 5, 0, Color::White, PieceKind::Pawn);
        assert!(!is_valid_pawn_move(Color::White, sq(5, 0), sq(3, 0), &grid));
    }

    #[test]
    fn diagonal_only_onto_enemy() {
        let mut grid = empty_grid();
        place(&mut grid, 4, 4, Color::White, PieceKind::Pawn);
        place(&mut grid, 3, 3, Color::Black, PieceKind::Pawn);
        place(&mut grid, 3, 5, Color::White, PieceKind::Pawn);
        assert!(is_valid_pawn_move(Color::White, sq(4, 4), sq(3, 3), &grid));
        assert!(!is_valid_pawn_move(Color::White, sq(4, 4), sq(3, 5), &grid));
        assert!(!is_valid_pawn_move(Color::White, sq(4, 4), sq(5, 3), &grid));
    }

    #[test]
    fn forward_push_blocked_by_enemy() {
        let mut grid = empty_grid();
        place(&mut grid, 4, 4, Color::White, PieceKind::Pawn);
        place(&mut grid, 3, 4, Color::Black, PieceKind::Pawn);
        assert!(!is_valid_pawn_move(Color::White, sq(4, 4), sq(3, 4), &grid));
    }
}
