//! Conversions between board coordinates and algebraic text.
//!
//! Row 0 is rank 8, so `a8 == (0, 0)` and `h1 == (7, 7)`. Also parses the
//! `"e2 e4"` coordinate-pair form used by text front ends.

use crate::game_state::chess_types::{Move, Square};

/// Convert algebraic notation (for example: "e4") to a square.
pub fn algebraic_to_square(square: &str) -> Result<Square, String> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(format!("Invalid algebraic square: {square}"));
    }

    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) {
        return Err(format!("Invalid algebraic file: {}", file as char));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(format!("Invalid algebraic rank: {}", rank as char));
    }

    Ok(Square::new(b'8' - rank, file - b'a'))
}

/// Convert a square to algebraic notation (for example: "e4").
pub fn square_to_algebraic(square: Square) -> String {
    let file_char = char::from(b'a' + square.col);
    let rank_char = char::from(b'8' - square.row);
    format!("{file_char}{rank_char}")
}

/// Parse `"e2 e4"` into source and destination squares.
pub fn parse_coordinate_move(text: &str) -> Result<(Square, Square), String> {
    let mut parts = text.split_whitespace();
    let from = parts.next().ok_or("Missing source square")?;
    let to = parts.next().ok_or("Missing destination square")?;
    if parts.next().is_some() {
        return Err(format!("Unexpected trailing input in move: {text}"));
    }

    Ok((algebraic_to_square(from)?, algebraic_to_square(to)?))
}

/// Render a move as `"e2 e4"`, with `=Q` style suffix for promotions.
pub fn move_to_coordinate_text(mv: &Move) -> String {
    let mut out = format!("{} {}", square_to_algebraic(mv.from), square_to_algebraic(mv.to));
    if let Some(kind) = mv.promotion {
        out.push('=');
        out.push(kind.letter());
    }
    out
}
