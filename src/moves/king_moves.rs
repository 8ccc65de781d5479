//! King steps and castling geometry.
//!
//! The two-square castling shape is accepted here only when the king and the
//! corner rook are both unmoved and the squares between them are empty. The
//! board re-validates the full castling rules (check, passing through check,
//! board-level rights) before relocating anything.

use crate::game_state::chess_rules::{KINGSIDE_ROOK_COL, KING_START_COL, QUEENSIDE_ROOK_COL};
use crate::game_state::chess_types::{Grid, Piece, PieceKind, Square};
use crate::moves::piece_moves::{is_empty_or_enemy, path_is_clear, piece_at};

pub const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub fn is_valid_king_move(king: &Piece, from: Square, to: Square, grid: &Grid) -> bool {
    let d_row = from.row.abs_diff(to.row);
    let d_col = from.col.abs_diff(to.col);

    if d_row <= 1 && d_col <= 1 {
        return is_empty_or_enemy(king.color, to, grid);
    }

    d_row == 0 && d_col == 2 && is_castling_shape(king, from, to, grid)
}

fn is_castling_shape(king: &Piece, from: Square, to: Square, grid: &Grid) -> bool {
    if king.has_moved || from.row != king.color.home_row() || from.col != KING_START_COL {
        return false;
    }
    if piece_at(grid, to).is_some() {
        return false;
    }

    let rook_col = if to.col > from.col {
        KINGSIDE_ROOK_COL
    } else {
        QUEENSIDE_ROOK_COL
    };
    let rook_square = Square::new(from.row, rook_col);
    let rook_ready = piece_at(grid, rook_square).is_some_and(|rook| {
        rook.kind == PieceKind::Rook && rook.color == king.color && !rook.has_moved
    });

    rook_ready && path_is_clear(from, rook_square, grid)
}
