use crate::game_state::chess_types::{Color, Grid, Square};
use crate::moves::piece_moves::{is_empty_or_enemy, path_is_clear};

pub fn is_valid_rook_move(color: Color, from: Square, to: Square, grid: &Grid) -> bool {
    if from.row != to.row && from.col != to.col {
        return false;
    }

    path_is_clear(from, to, grid) && is_empty_or_enemy(color, to, grid)
}
