//! Immutable search-side view of a position.
//!
//! A snapshot owns a copy of the board (modifiers included), the side to move
//! and the special-move rights. Making a move yields a new snapshot; the
//! original is never touched, so sibling search branches all see the same
//! parent position.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Move, Team};
use crate::game_state::special_rights::SpecialRights;
use crate::move_generation::legal_move_apply::{apply_move, AppliedMove};
use crate::move_generation::special_moves::classify_move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSnapshot {
    board: Board,
    side_to_move: Team,
    rights: SpecialRights,
}

impl BoardSnapshot {
    pub fn new(board: Board, side_to_move: Team, rights: SpecialRights) -> Self {
        board.debug_assert_consistent();
        Self {
            board,
            side_to_move,
            rights,
        }
    }

    pub fn standard() -> Self {
        Self::new(Board::standard(), Team::White, SpecialRights::initial())
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Team {
        self.side_to_move
    }

    #[inline]
    pub fn rights(&self) -> &SpecialRights {
        &self.rights
    }

    /// Child position after `mv`, with the move's resolution.
    ///
    /// Modifiers are carried over unchanged: a search never ticks or expires
    /// card grants.
    pub fn make_move(&self, mv: Move) -> (BoardSnapshot, AppliedMove) {
        let mut board = self.board;
        let kind = classify_move(&board, &self.rights, mv);
        let applied = apply_move(&mut board, mv, kind);
        let rights = self.rights.after_move(&board, mv);
        (
            BoardSnapshot {
                board,
                side_to_move: self.side_to_move.opposite(),
                rights,
            },
            applied,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::BoardSnapshot;
    use crate::game_state::chess_types::{Move, Square, Team};

    fn sq(file: i32, rank: i32) -> Square {
        Square::new(file, rank).expect("test square should be valid")
    }

    #[test]
    fn make_move_leaves_parent_untouched() {
        let parent = BoardSnapshot::standard();
        let copy = parent;
        let (child, applied) = parent.make_move(Move::new(sq(4, 1), sq(4, 3)));

        assert_eq!(parent, copy);
        assert_eq!(child.side_to_move(), Team::Black);
        assert!(child.board().is_empty(sq(4, 1)));
        assert_eq!(child.rights().double_push(), Some(sq(4, 3)));
        assert!(applied.captured.is_none());
    }

    #[test]
    fn modifiers_survive_make_move() {
        let mut board = crate::game_state::board::Board::standard();
        board.modifiers.set_move_cap(2, 1);
        board.modifiers.can_jump[0] = true;
        let snapshot = BoardSnapshot::new(
            board,
            Team::White,
            crate::game_state::special_rights::SpecialRights::initial(),
        );
        let (child, _) = snapshot.make_move(Move::new(sq(6, 0), sq(5, 2)));
        assert_eq!(child.board().modifiers, board.modifiers);
    }
}
