//! Per-piece movement legality.
//!
//! Each piece kind has one pure predicate over the raw slot grid. Board-level
//! rules (turn order, en passant, self-check) are layered above in
//! [`crate::game_state::move_piece`].

use crate::game_state::chess_types::{Color, Grid, Piece, PieceKind, Square};
use crate::moves::bishop_moves::is_valid_bishop_move;
use crate::moves::king_moves::is_valid_king_move;
use crate::moves::knight_moves::is_valid_knight_move;
use crate::moves::pawn_moves::is_valid_pawn_move;
use crate::moves::queen_moves::is_valid_queen_move;
use crate::moves::rook_moves::is_valid_rook_move;

impl Piece {
    /// Geometric legality of moving this piece from `from` to `to` on `grid`.
    ///
    /// Never panics: a zero-length move or any malformed geometry is `false`.
    pub fn is_valid_move(&self, from: Square, to: Square, grid: &Grid) -> bool {
        if from == to || from.row > 7 || from.col > 7 || to.row > 7 || to.col > 7 {
            return false;
        }

        match self.kind {
            PieceKind::Pawn => is_valid_pawn_move(self.color, from, to, grid),
            PieceKind::Knight => is_valid_knight_move(self.color, from, to, grid),
            PieceKind::Bishop => is_valid_bishop_move(self.color, from, to, grid),
            PieceKind::Rook => is_valid_rook_move(self.color, from, to, grid),
            PieceKind::Queen => is_valid_queen_move(self.color, from, to, grid),
            PieceKind::King => is_valid_king_move(self, from, to, grid),
        }
    }
}

#[inline]
pub(crate) fn piece_at(grid: &Grid, square: Square) -> Option<Piece> {
    grid[square.row as usize][square.col as usize]
}

/// Destination is empty or holds an enemy piece.
#[inline]
pub(crate) fn is_empty_or_enemy(color: Color, to: Square, grid: &Grid) -> bool {
    piece_at(grid, to).map_or(true, |p| p.color != color)
}

/// Every square strictly between `from` and `to` along a straight line is empty.
///
/// Callers guarantee the two squares are aligned.
pub(crate) fn path_is_clear(from: Square, to: Square, grid: &Grid) -> bool {
    let d_row = (to.row as i32 - from.row as i32).signum();
    let d_col = (to.col as i32 - from.col as i32).signum();

    let mut row = from.row as i32 + d_row;
    let mut col = from.col as i32 + d_col;
    while (row, col) != (to.row as i32, to.col as i32) {
        if grid[row as usize][col as usize].is_some() {
            return false;
        }
        row += d_row;
        col += d_col;
    }

    true
}
