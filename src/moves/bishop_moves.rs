use crate::game_state::chess_types::{Color, Grid, Square};
use crate::moves::piece_moves::{is_empty_or_enemy, path_is_clear};

pub fn is_valid_bishop_move(color: Color, from: Square, to: Square, grid: &Grid) -> bool {
    let d_row = from.row.abs_diff(to.row);
    let d_col = from.col.abs_diff(to.col);
    if d_row == 0 || d_row != d_col {
        return false;
    }

    path_is_clear(from, to, grid) && is_empty_or_enemy(color, to, grid)
}

#[cfg(test)]
mod tests {
    use super::is_valid_bishop_move;
    use crate::game_state::chess_types::{Color, PieceKind};
    use crate::moves::piece_moves::test_support::*;

    #[test]
    fn bishop_blocker_stops_diagonal() {
        let mut grid = empty_grid();
        place(&mut grid, 7, 2, Color::White, PieceKind::Bishop);
        place(&mut grid, 5, 4, Color::Black, PieceKind::Pawn);

        assert!(is_valid_bishop_move(Color::White, sq(7, 2), sq(6, 3), &grid));
        assert!(is_valid_bishop_move(Color::White, sq(7, 2), sq(5, 4), &grid));
        assert!(!is_valid_bishop_move(Color::White, sq(7, 2), sq(4, 5), &grid));
    }

    #[test]
    fn bishop_rejects_orthogonal_and_knight_shapes() {
        let grid = empty_grid();
        assert!(!is_valid_bishop_move(Color::Black, sq(0, 2), sq(0, 5), &grid));
        assert!(!is_valid_bishop_move(Color::Black, sq(0, 2), sq(2, 3), &grid));
    }
}
