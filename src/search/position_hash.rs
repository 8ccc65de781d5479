//! XOR-fold position hash for the transposition table.
//!
//! Folds piece kind, colour and square, plus the side to move. Castling rights
//! and the en-passant target are not part of the hash, and the fold is not
//! collision resistant; a table hit is a heuristic, never a proof.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Piece};

const MIX: u64 = 0x9E37_79B9_7F4A_7C15;
const BLACK_TO_MOVE: u64 = 0xD1B5_4A32_D192_ED03;

#[inline]
fn piece_code(piece: &Piece) -> u64 {
    (piece.kind.index() as u64 + 1) | ((piece.color.index() as u64) << 3)
}

pub fn position_hash(board: &Board) -> u64 {
    let mut hash = 0u64;
    for (square, piece) in board.pieces() {
        hash ^= piece_code(&piece)
            .wrapping_mul(MIX)
            .rotate_left(square.index() as u32);
    }
    if board.current_turn() == Color::Black {
        hash ^= BLACK_TO_MOVE;
    }
    hash
}
