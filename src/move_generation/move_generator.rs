use crate::game_state::board::Board;
use crate::game_state::chess_types::{Move, PieceKind};

/// A legal move together with the position it produces.
#[derive(Debug, Clone)]
pub struct GeneratedMove {
    pub mv: Move,
    pub captured: Option<PieceKind>,
    pub is_en_passant: bool,
    pub is_castling: bool,
    pub board_after_move: Board,
}

impl GeneratedMove {
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

pub trait MoveGenerator: Send + Sync {
    /// Every legal move for the side to move, each with its successor board.
    fn generate_legal_moves(&self, board: &Board) -> Vec<GeneratedMove>;

    /// The capturing subset of [`MoveGenerator::generate_legal_moves`].
    fn generate_legal_captures(&self, board: &Board) -> Vec<GeneratedMove> {
        self.generate_legal_moves(board)
            .into_iter()
            .filter(GeneratedMove::is_capture)
            .collect()
    }
}
