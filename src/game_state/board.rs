//! Mailbox board state.
//!
//! `Board` is the authoritative game model: an 8x8 grid of owned piece slots,
//! side to move, castling flags, the last applied move, clocks, and the
//! position-history map used for repetition detection. It is mutated only via
//! [`Board::move_piece`] (see `move_piece.rs`) and copied by value for every
//! simulation branch.

use std::collections::HashMap;

use crate::game_state::chess_types::*;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

/// Which castling pieces have left their original squares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CastlingFlags {
    pub white_king_moved: bool,
    pub black_king_moved: bool,
    pub white_kingside_rook_moved: bool,
    pub white_queenside_rook_moved: bool,
    pub black_kingside_rook_moved: bool,
    pub black_queenside_rook_moved: bool,
}

impl CastlingFlags {
    /// Flags for a position where nobody may castle.
    pub const fn all_moved() -> Self {
        Self {
            white_king_moved: true,
            black_king_moved: true,
            white_kingside_rook_moved: true,
            white_queenside_rook_moved: true,
            black_kingside_rook_moved: true,
            black_queenside_rook_moved: true,
        }
    }

    #[inline]
    pub fn king_moved(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_king_moved,
            Color::Black => self.black_king_moved,
        }
    }

    #[inline]
    pub fn rook_moved(&self, color: Color, kingside: bool) -> bool {
        match (color, kingside) {
            (Color::White, true) => self.white_kingside_rook_moved,
            (Color::White, false) => self.white_queenside_rook_moved,
            (Color::Black, true) => self.black_kingside_rook_moved,
            (Color::Black, false) => self.black_queenside_rook_moved,
        }
    }

    pub fn set_king_moved(&mut self, color: Color) {
        match color {
            Color::White => self.white_king_moved = true,
            Color::Black => self.black_king_moved = true,
        }
    }

    pub fn set_rook_moved(&mut self, color: Color, kingside: bool) {
        match (color, kingside) {
            (Color::White, true) => self.white_kingside_rook_moved = true,
            (Color::White, false) => self.white_queenside_rook_moved = true,
            (Color::Black, true) => self.black_kingside_rook_moved = true,
            (Color::Black, false) => self.black_queenside_rook_moved = true,
        }
    }

    /// Neither the king nor the rook on that side has moved.
    #[inline]
    pub fn can_castle(&self, color: Color, kingside: bool) -> bool {
        !self.king_moved(color) && !self.rook_moved(color, kingside)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) squares: Grid,
    pub(crate) current_turn: Color,
    pub(crate) castling: CastlingFlags,
    pub(crate) last_move: Option<Move>,
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
    pub(crate) position_history: HashMap<String, u32>,
    /// Snapshots used for simulation skip repetition bookkeeping.
    pub(crate) track_history: bool,
    pub(crate) computer_controlled: [bool; 2],
}

impl Default for Board {
    fn default() -> Self {
        Self {
            squares: [[None; 8]; 8],
            current_turn: Color::White,
            castling: CastlingFlags::default(),
            last_move: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            position_history: HashMap::new(),
            track_history: true,
            computer_controlled: [false; 2],
        }
    }
}

impl Board {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Board in the standard opening array, White to move.
    pub fn new_game() -> Self {
        let mut board = Self::new_empty();
        board.setup_board();
        board
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, String> {
        parse_fen(fen)
    }

    /// Replace the whole position with the one described by `fen`.
    ///
    /// On error the board is left unchanged. Which sides are computer
    /// controlled is a property of the session, not the position, and survives.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), String> {
        let mut loaded = parse_fen(fen)?;
        loaded.computer_controlled = self.computer_controlled;
        *self = loaded;
        Ok(())
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    /// Reset to the standard opening array.
    pub fn setup_board(&mut self) {
        self.squares = [[None; 8]; 8];

        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (col, kind) in back_rank.into_iter().enumerate() {
            self.squares[0][col] = Some(Piece::new(Color::Black, kind));
            self.squares[1][col] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            self.squares[6][col] = Some(Piece::new(Color::White, PieceKind::Pawn));
            self.squares[7][col] = Some(Piece::new(Color::White, kind));
        }

        self.current_turn = Color::White;
        self.castling = CastlingFlags::default();
        self.last_move = None;
        self.halfmove_clock = 0;
        self.fullmove_number = 1;
        self.reset_position_history();
    }

    /// Value copy for search and move simulation.
    ///
    /// The copy carries the full rules state but an empty position history and
    /// does not record the positions it passes through.
    pub fn snapshot(&self) -> Self {
        Self {
            squares: self.squares,
            current_turn: self.current_turn,
            castling: self.castling,
            last_move: self.last_move,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            position_history: HashMap::new(),
            track_history: false,
            computer_controlled: self.computer_controlled,
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.squares
    }

    /// Piece on `(row, col)`, or `None` for an empty or off-board square.
    #[inline]
    pub fn piece_at(&self, row: usize, col: usize) -> Option<Piece> {
        if row < 8 && col < 8 {
            self.squares[row][col]
        } else {
            None
        }
    }

    #[inline]
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.squares[square.row as usize][square.col as usize]
    }

    #[inline]
    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    #[inline]
    pub fn set_current_turn(&mut self, color: Color) {
        self.current_turn = color;
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline]
    pub fn castling_flags(&self) -> CastlingFlags {
        self.castling
    }

    #[inline]
    pub fn has_king_moved(&self, color: Color) -> bool {
        self.castling.king_moved(color)
    }

    #[inline]
    pub fn has_rook_moved(&self, color: Color, kingside: bool) -> bool {
        self.castling.rook_moved(color, kingside)
    }

    /// Automated sides promote to a queen without being asked.
    pub fn set_computer_controlled(&mut self, color: Color, automated: bool) {
        self.computer_controlled[color.index()] = automated;
    }

    #[inline]
    pub fn is_computer_controlled(&self, color: Color) -> bool {
        self.computer_controlled[color.index()]
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|square| self.piece_on(square).map(|piece| (square, piece)))
    }

    pub fn piece_count(&self) -> usize {
        self.squares.iter().flatten().filter(|slot| slot.is_some()).count()
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        king_square_on(&self.squares, color)
    }

    /// Whether `color`'s king is attacked. A side without a king is never in check.
    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        is_grid_in_check(&self.squares, color)
    }
}

pub(crate) fn king_square_on(grid: &Grid, color: Color) -> Option<Square> {
    Square::all().find(|square| {
        grid[square.row as usize][square.col as usize]
            .is_some_and(|p| p.kind == PieceKind::King && p.color == color)
    })
}

/// Check detection over a raw grid, using the piece predicates as the attack
/// oracle: any enemy piece that could legally move onto the king's square
/// gives check.
pub(crate) fn is_grid_in_check(grid: &Grid, color: Color) -> bool {
    let Some(king) = king_square_on(grid, color) else {
        return false;
    };

    Square::all().any(|square| {
        grid[square.row as usize][square.col as usize]
            .is_some_and(|p| p.color != color && p.is_valid_move(square, king, grid))
    })
}
