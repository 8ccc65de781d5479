use crate::game_state::chess_types::{Color, Grid, Square};
use crate::moves::bishop_moves::is_valid_bishop_move;
use crate::moves::rook_moves::is_valid_rook_move;

/// Union of rook and bishop movement.
#[inline]
pub fn is_valid_queen_move(color: Color, from: Square, to: Square, grid: &Grid) -> bool {
    is_valid_rook_move(color, from, to, grid) || is_valid_bishop_move(color, from, to, grid)
}
