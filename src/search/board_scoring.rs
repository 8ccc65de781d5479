//! Pluggable board evaluation interfaces and baseline implementations.
//!
//! Search remains modular by delegating static position scoring to this trait,
//! allowing alternate heuristics to be swapped without altering search code.

use crate::game_state::board::Board;
use crate::game_state::chess_rules::KING_START_COL;
use crate::game_state::chess_types::*;

pub const MATE_SCORE: i32 = 1_000_000;

pub trait BoardScorer: Send + Sync {
    /// Score from White's point of view: positive favors White.
    fn score(&self, board: &Board) -> i32;
}

#[inline]
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20_000,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl BoardScorer for MaterialScorer {
    fn score(&self, board: &Board) -> i32 {
        board
            .pieces()
            .map(|(_, piece)| color_sign(piece.color) * piece_value(piece.kind))
            .sum()
    }
}

/// Material, piece-square tables and the opening heuristics of [`evaluate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalScorer;

impl BoardScorer for PositionalScorer {
    #[inline]
    fn score(&self, board: &Board) -> i32 {
        evaluate(board)
    }
}

// Tables are laid out from White's side, row 0 = rank 8.
#[rustfmt::skip]
const PAWN_TABLE: [[i32; 8]; 8] = [
    [ 0,  0,   0,   0,   0,   0,  0,  0],
    [50, 50,  50,  50,  50,  50, 50, 50],
    [10, 10,  20,  30,  30,  20, 10, 10],
    [ 5,  5,  10,  25,  25,  10,  5,  5],
    [ 0,  0,   0,  20,  20,   0,  0,  0],
    [ 5, -5, -10,   0,   0, -10, -5,  5],
    [ 5, 10,  10, -20, -20,  10, 10,  5],
    [ 0,  0,   0,   0,   0,   0,  0,  0],
];

#[rustfmt::skip]
const KNIGHT_TABLE: [[i32; 8]; 8] = [
    [-50, -40, -30, -30, -30, -30, -40, -50],
    [-40, -20,   0,   5,   5,   0, -20, -40],
    [-30,   5,  10,  15,  15,  10,   5, -30],
    [-30,   0,  15,  20,  20,  15,   0, -30],
    [-30,   5,  15,  20,  20,  15,   5, -30],
    [-30,   0,  10,  15,  15,  10,   0, -30],
    [-40, -20,   0,   0,   0,   0, -20, -40],
    [-50, -40, -30, -30, -30, -30, -40, -50],
];

#[rustfmt::skip]
const BISHOP_TABLE: [[i32; 8]; 8] = [
    [-20, -10, -10, -10, -10, -10, -10, -20],
    [-10,   5,   0,   0,   0,   0,   5, -10],
    [-10,  10,  10,  10,  10,  10,  10, -10],
    [-10,   0,  10,  10,  10,  10,   0, -10],
    [-10,   5,   5,  10,  10,   5,   5, -10],
    [-10,   0,   5,  10,  10,   5,   0, -10],
    [-10,   0,   0,   0,   0,   0,   0, -10],
    [-20, -10, -10, -10, -10, -10, -10, -20],
];

#[rustfmt::skip]
const ROOK_TABLE: [[i32; 8]; 8] = [
    [ 0,  0,  0,  0,  0,  0,  0,  0],
    [ 5, 10, 10, 10, 10, 10, 10,  5],
    [-5,  0,  0,  0,  0,  0,  0, -5],
    [-5,  0,  0,  0,  0,  0,  0, -5],
    [-5,  0,  0,  0,  0,  0,  0, -5],
    [-5,  0,  0,  0,  0,  0,  0, -5],
    [-5,  0,  0,  0,  0,  0,  0, -5],
    [ 0,  0,  0,  5,  5,  0,  0,  0],
];

#[rustfmt::skip]
const QUEEN_TABLE: [[i32; 8]; 8] = [
    [-20, -10, -10, -5, -5, -10, -10, -20],
    [-10,   0,   0,  0,  0,   0,   0, -10],
    [-10,   0,   5,  5,  5,   5,   0, -10],
    [ -5,   0,   5,  5,  5,   5,   0,  -5],
    [  0,   0,   5,  5,  5,   5,   0,  -5],
    [-10,   5,   5,  5,  5,   5,   0, -10],
    [-10,   0,   5,  0,  0,   0,   0, -10],
    [-20, -10, -10, -5, -5, -10, -10, -20],
];

#[rustfmt::skip]
const KING_TABLE: [[i32; 8]; 8] = [
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-20, -30, -30, -40, -40, -30, -30, -20],
    [-10, -20, -20, -20, -20, -20, -20, -10],
    [ 20,  20,   0,   0,   0,   0,  20,  20],
    [ 20,  30,  10,   0,   0,  10,  30,  20],
];

const KNIGHT_ON_RIM_PENALTY: i32 = 100;
const KING_WANDERING_PENALTY: i32 = 200;
/// More pieces than this and the king is expected to stay home.
const KING_SAFETY_PIECE_THRESHOLD: usize = 20;
const CENTER_OCCUPANCY_BONUS: i32 = 15;
const DEVELOPMENT_BONUS: i32 = 10;
const ISOLATED_PAWN_PENALTY: i32 = 15;
const CASTLED_KING_BONUS: i32 = 30;
const EARLY_KING_MOVE_PENALTY: i32 = 40;

pub(crate) const CENTER_SQUARES: [Square; 4] = [
    Square::new(3, 3),
    Square::new(3, 4),
    Square::new(4, 3),
    Square::new(4, 4),
];

/// Piece-square value for `kind` on `(row, col)`, mirrored vertically for Black.
pub fn piece_square_value(kind: PieceKind, color: Color, row: u8, col: u8) -> i32 {
    let row = match color {
        Color::White => row as usize,
        Color::Black => 7 - row as usize,
    };
    let col = col as usize;
    match kind {
        PieceKind::Pawn => PAWN_TABLE[row][col],
        PieceKind::Knight => KNIGHT_TABLE[row][col],
        PieceKind::Bishop => BISHOP_TABLE[row][col],
        PieceKind::Rook => ROOK_TABLE[row][col],
        PieceKind::Queen => QUEEN_TABLE[row][col],
        PieceKind::King => KING_TABLE[row][col],
    }
}

/// Static evaluation, positive favors White. Pure and deterministic.
pub fn evaluate(board: &Board) -> i32 {
    let crowded = board.piece_count() > KING_SAFETY_PIECE_THRESHOLD;
    let mut score = 0i32;
    let mut queens_present = false;

    for (square, piece) in board.pieces() {
        let mut value = piece_value(piece.kind)
            + piece_square_value(piece.kind, piece.color, square.row, square.col);

        match piece.kind {
            PieceKind::Knight => {
                if is_on_rim(square) {
                    value -= KNIGHT_ON_RIM_PENALTY;
                }
                if square.row != piece.color.home_row() {
                    value += DEVELOPMENT_BONUS;
                }
            }
            PieceKind::Bishop if square.row != piece.color.home_row() => {
                value += DEVELOPMENT_BONUS;
            }
            PieceKind::King if crowded && !is_king_start(piece.color, square) => {
                value -= KING_WANDERING_PENALTY;
            }
            PieceKind::Queen => queens_present = true,
            _ => {}
        }

        if CENTER_SQUARES.contains(&square) {
            value += CENTER_OCCUPANCY_BONUS;
        }

        score += color_sign(piece.color) * value;
    }

    score -= isolated_pawn_penalty(board, Color::White);
    score += isolated_pawn_penalty(board, Color::Black);

    if queens_present {
        score += king_placement_adjustment(board, Color::White);
        score -= king_placement_adjustment(board, Color::Black);
    }

    score
}

/// Fifteen points per file holding pawns of `color` with no friendly pawn on
/// either neighbouring file.
pub fn isolated_pawn_penalty(board: &Board, color: Color) -> i32 {
    let mut files = [false; 8];
    for (square, piece) in board.pieces() {
        if piece.color == color && piece.kind == PieceKind::Pawn {
            files[square.col as usize] = true;
        }
    }

    (0..8)
        .filter(|&file| files[file])
        .filter(|&file| {
            let left = file > 0 && files[file - 1];
            let right = file < 7 && files[file + 1];
            !left && !right
        })
        .count() as i32
        * ISOLATED_PAWN_PENALTY
}

/// Castled-looking kings earn a bonus; a king that left its start square
/// without castling pays a penalty.
fn king_placement_adjustment(board: &Board, color: Color) -> i32 {
    let Some(king) = board.king_square(color) else {
        return 0;
    };
    if king.col == 6 || king.col == 2 {
        CASTLED_KING_BONUS
    } else if !is_king_start(color, king) {
        -EARLY_KING_MOVE_PENALTY
    } else {
        0
    }
}

/// Most of the army is still on the board.
pub fn is_opening_phase(board: &Board) -> bool {
    board.piece_count() > 28
}

#[inline]
pub(crate) const fn color_sign(color: Color) -> i32 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

#[inline]
pub(crate) fn is_on_rim(square: Square) -> bool {
    square.row == 0 || square.row == 7 || square.col == 0 || square.col == 7
}

#[inline]
fn is_king_start(color: Color, square: Square) -> bool {
    square.row == color.home_row() && square.col == KING_START_COL
}
