use crate::game_state::chess_types::{Color, Grid, Square};
use crate::moves::piece_moves::is_empty_or_enemy;

pub const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

#[inline]
pub fn is_valid_knight_move(color: Color, from: Square, to: Square, grid: &Grid) -> bool {
    let d_row = from.row.abs_diff(to.row);
    let d_col = from.col.abs_diff(to.col);
    let shape = (d_row == 2 && d_col == 1) || (d_row == 1 && d_col == 2);
    shape && is_empty_or_enemy(color, to, grid)
}

#[cfg(test)]
mod tests {
    use super::{is_valid_knight_move, KNIGHT_OFFSETS};
    use crate::game_state::chess_types::{Color, PieceKind};
    use crate::moves::piece_moves::test_support::*;

    #[test]
    fn knight_from_d4_reaches_eight_targets() {
        let mut grid = empty_grid();
        place(&mut grid, 4, 3, Color::White, PieceKind::Knight);
        let from = sq(4, 3);
        let reachable = KNIGHT_OFFSETS
            .iter()
            .filter_map(|(r, c)| from.offset(*r, *c))
            .filter(|to| is_valid_knight_move(Color::White, from, *to, &grid))
            .count();
        assert_eq!(reachable, 8);
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let mut grid = empty_grid();
        place(&mut grid, 7, 1, Color::White, PieceKind::Knight);
        for col in 0..8 {
            place(&mut grid, 6, col, Color::White, PieceKind::Pawn);
        }
        assert!(is_valid_knight_move(Color::White, sq(7, 1), sq(5, 2), &grid));
        assert!(!is_valid_knight_move(Color::White, sq(7, 1), sq(6, 3), &grid));
    }
}
