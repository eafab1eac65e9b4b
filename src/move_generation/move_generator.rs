use crate::game_state::chess_types::{Move, PieceKind};
use crate::game_state::snapshot::BoardSnapshot;
use crate::move_generation::legal_move_apply::MoveKind;

/// A legal move together with the position it produces.
#[derive(Debug, Clone, Copy)]
pub struct GeneratedMove {
    pub mv: Move,
    pub kind: MoveKind,
    pub mover: PieceKind,
    pub captured: Option<PieceKind>,
    pub snapshot_after: BoardSnapshot,
}

impl GeneratedMove {
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

pub trait MoveGenerator: Send + Sync {
    /// Every legal move for the side to move of `snapshot`.
    fn generate_legal_moves(&self, snapshot: &BoardSnapshot) -> Vec<GeneratedMove>;

    /// Legal moves that take an enemy piece.
    fn generate_captures(&self, snapshot: &BoardSnapshot) -> Vec<GeneratedMove> {
        let mut moves = self.generate_legal_moves(snapshot);
        moves.retain(GeneratedMove::is_capture);
        moves
    }
}
