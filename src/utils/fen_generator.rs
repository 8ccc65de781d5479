use crate::game_state::board::Board;
use crate::game_state::chess_types::Color;
use crate::utils::algebraic::square_to_algebraic;

pub fn generate_fen(board: &Board) -> String {
    let placement = generate_board_field(board);
    let side_to_move = match board.current_turn() {
        Color::White => "w",
        Color::Black => "b",
    };
    let castling = generate_castling_field(board);
    let en_passant = board
        .en_passant_target()
        .map(square_to_algebraic)
        .unwrap_or_else(|| "-".to_owned());

    format!(
        "{} {} {} {} {} {}",
        placement,
        side_to_move,
        castling,
        en_passant,
        board.halfmove_clock(),
        board.fullmove_number()
    )
}

fn generate_board_field(board: &Board) -> String {
    let mut out = String::new();

    for (row, rank) in board.grid().iter().enumerate() {
        let mut empty_count = 0u8;

        for slot in rank {
            match slot {
                Some(piece) => {
                    if empty_count > 0 {
                        out.push(char::from(b'0' + empty_count));
                        empty_count = 0;
                    }
                    out.push(piece.fen_char());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if row < 7 {
            out.push('/');
        }
    }

    out
}

fn generate_castling_field(board: &Board) -> String {
    let flags = board.castling_flags();
    let mut out = String::new();

    if flags.can_castle(Color::White, true) {
        out.push('K');
    }
    if flags.can_castle(Color::White, false) {
        out.push('Q');
    }
    if flags.can_castle(Color::Black, true) {
        out.push('k');
    }
    if flags.can_castle(Color::Black, false) {
        out.push('q');
    }

    if out.is_empty() {
        out.push('-');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::board::Board;

    #[test]
    fn fen_round_trips_through_board() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
        ] {
            let board = Board::from_fen(fen).expect("FEN should parse");
            assert_eq!(generate_fen(&board), fen);
        }
    }

    #[test]
    fn fen_tracks_moves_played() {
        let mut board = Board::new_game();
        board.move_piece(6, 4, 4, 4).expect("e2e4");
        assert_eq!(
            generate_fen(&board),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }
}
