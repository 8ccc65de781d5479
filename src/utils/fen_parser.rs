//! FEN-to-Board loader.
//!
//! Builds a complete board from a Forsyth-Edwards Notation string: piece
//! placement, side to move, castling flags re-derived from the rights letters,
//! en-passant context, and both clocks.

use crate::game_state::board::{Board, CastlingFlags};
use crate::game_state::chess_rules::{KINGSIDE_ROOK_COL, KING_START_COL, QUEENSIDE_ROOK_COL};
use crate::game_state::chess_types::*;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<Board, String> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or("Missing board layout in FEN")?;
    let side_part = parts.next().ok_or("Missing side-to-move in FEN")?;
    let castling_part = parts.next().ok_or("Missing castling rights in FEN")?;
    let en_passant_part = parts.next().ok_or("Missing en-passant square in FEN")?;
    let halfmove_part = parts.next().ok_or("Missing halfmove clock in FEN")?;
    let fullmove_part = parts.next().ok_or("Missing fullmove number in FEN")?;

    if parts.next().is_some() {
        return Err("FEN has extra trailing fields".to_owned());
    }

    let mut board = Board::new_empty();

    parse_board(board_part, &mut board)?;
    board.current_turn = parse_side_to_move(side_part)?;
    board.castling = parse_castling_rights(castling_part)?;
    sync_piece_moved_flags(&mut board);
    board.last_move = parse_en_passant_square(en_passant_part, &board)?;
    board.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| format!("Invalid halfmove clock: {halfmove_part}"))?;
    board.fullmove_number = fullmove_part
        .parse::<u16>()
        .map_err(|_| format!("Invalid fullmove number: {fullmove_part}"))?;

    board.reset_position_history();
    Ok(board)
}

fn parse_board(board_part: &str, board: &mut Board) -> Result<(), String> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err("Board layout must contain 8 ranks".to_owned());
    }

    for (row, rank_str) in ranks.iter().enumerate() {
        let mut col = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(format!("Invalid empty-square count '{ch}'"));
                }
                col += empty_count as usize;
                continue;
            }

            let piece = piece_from_fen_char(ch)
                .ok_or_else(|| format!("Invalid piece character '{ch}' in board layout"))?;

            if col >= 8 {
                return Err("Board rank has too many files".to_owned());
            }

            board.squares[row][col] = Some(piece);
            col += 1;
        }

        if col != 8 {
            return Err("Board rank does not sum to 8 files".to_owned());
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, String> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(format!("Invalid side-to-move field: {side_part}")),
    }
}

/// A king counts as moved only when both of its rights are gone; a rook
/// counts as moved when its own letter is absent.
fn parse_castling_rights(castling_part: &str) -> Result<CastlingFlags, String> {
    if castling_part == "-" {
        return Ok(CastlingFlags::all_moved());
    }

    let (mut white_k, mut white_q, mut black_k, mut black_q) = (false, false, false, false);
    for ch in castling_part.chars() {
        match ch {
            'K' => white_k = true,
            'Q' => white_q = true,
            'k' => black_k = true,
            'q' => black_q = true,
            _ => return Err(format!("Invalid castling rights character: {ch}")),
        }
    }

    Ok(CastlingFlags {
        white_king_moved: !(white_k || white_q),
        black_king_moved: !(black_k || black_q),
        white_kingside_rook_moved: !white_k,
        white_queenside_rook_moved: !white_q,
        black_kingside_rook_moved: !black_k,
        black_queenside_rook_moved: !black_q,
    })
}

/// Mirror the board-level castling flags onto the king and rook pieces.
fn sync_piece_moved_flags(board: &mut Board) {
    let castling = board.castling;
    for row in 0..8u8 {
        for col in 0..8u8 {
            let Some(piece) = board.squares[row as usize][col as usize].as_mut() else {
                continue;
            };
            let on_home_row = row == piece.color.home_row();
            piece.has_moved = match piece.kind {
                PieceKind::King => !on_home_row || col != KING_START_COL || castling.king_moved(piece.color),
                PieceKind::Rook if on_home_row && col == KINGSIDE_ROOK_COL => {
                    castling.rook_moved(piece.color, true)
                }
                PieceKind::Rook if on_home_row && col == QUEENSIDE_ROOK_COL => {
                    castling.rook_moved(piece.color, false)
                }
                PieceKind::Rook => true,
                _ => false,
            };
        }
    }
}

/// Rebuild the opposing double step that produced the en-passant target so the
/// capture is available immediately after loading.
fn parse_en_passant_square(en_passant_part: &str, board: &Board) -> Result<Option<Move>, String> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let target = algebraic_to_square(en_passant_part)?;
    let mover = board.current_turn.opposite();
    let direction = i32::from(mover.pawn_direction());

    let (Some(from), Some(to)) = (target.offset(-direction, 0), target.offset(direction, 0)) else {
        return Err(format!("Invalid en-passant square: {en_passant_part}"));
    };
    if from.row != mover.pawn_start_row() {
        return Err(format!("Invalid en-passant square: {en_passant_part}"));
    }

    Ok(board
        .piece_on(to)
        .filter(|p| p.kind == PieceKind::Pawn && p.color == mover)
        .map(|pawn| Move::new(from, to, pawn)))
}

fn piece_from_fen_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some(Piece::new(color, kind))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, PieceKind, Square};
    use crate::utils::render_game_state::render_game_state;

    #[test]
    fn parse_starting_fen_and_render_board() {
        let board = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");

        println!("\n{}", render_game_state(&board));

        assert_eq!(board.current_turn(), Color::White);
        assert_eq!(board.fullmove_number(), 1);
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.piece_at(0, 4).map(|p| p.kind), Some(PieceKind::King));
        assert_eq!(board.piece_at(7, 3).map(|p| (p.color, p.kind)), Some((Color::White, PieceKind::Queen)));
    }

    #[test]
    fn castling_letters_drive_moved_flags() {
        let board = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1").expect("FEN should parse");
        assert!(!board.has_king_moved(Color::White));
        assert!(!board.has_rook_moved(Color::White, true));
        assert!(board.has_rook_moved(Color::White, false));
        assert!(!board.has_king_moved(Color::Black));
        assert!(board.has_rook_moved(Color::Black, true));
        assert!(!board.has_rook_moved(Color::Black, false));

        assert!(board.piece_at(7, 0).is_some_and(|p| p.has_moved));
        assert!(board.piece_at(7, 7).is_some_and(|p| !p.has_moved));
    }

    #[test]
    fn dash_means_no_castling() {
        let board = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").expect("FEN should parse");
        assert!(board.has_king_moved(Color::White));
        assert!(board.has_king_moved(Color::Black));
        assert!(board.piece_at(7, 4).is_some_and(|p| p.has_moved));
    }

    #[test]
    fn en_passant_field_enables_capture() {
        let mut board =
            parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("FEN should parse");
        let last = board.last_move().expect("double step reconstructed");
        assert_eq!(last.from, Square::new(1, 3));
        assert_eq!(last.to, Square::new(3, 3));

        board.move_piece(3, 4, 2, 3).expect("exd6 e.p. should be legal");
        assert_eq!(board.piece_at(3, 3), None);
    }

    #[test]
    fn malformed_fen_is_rejected() {
        assert!(parse_fen("").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(parse_fen("9/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/8 x - - 0 1").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/8 w X - 0 1").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/8 w - - zero 1").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/7z w - - 0 1").is_err());
    }
}
