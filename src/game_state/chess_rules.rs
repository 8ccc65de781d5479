//! Canonical chess-rule constants.
//!
//! Starting position, draw thresholds, and castling geometry used by the
//! board state machine and its queries.

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Half-moves without a pawn move or capture before the fifty-move rule fires.
pub const FIFTY_MOVE_HALFMOVES: u16 = 100;

/// Occurrences of one position key that make a threefold repetition.
pub const REPETITION_LIMIT: u32 = 3;

/// File the king starts on.
pub const KING_START_COL: u8 = 4;

pub const KINGSIDE_ROOK_COL: u8 = 7;
pub const QUEENSIDE_ROOK_COL: u8 = 0;

/// Where the rook lands after castling (kingside, queenside).
pub const KINGSIDE_ROOK_DEST_COL: u8 = 5;
pub const QUEENSIDE_ROOK_DEST_COL: u8 = 3;
