//! Move execution.
//!
//! [`apply_move`] performs a move with every consequence (special moves,
//! poison). [`make_temporary_move`] / [`undo_temporary_move`] are the cheap
//! in-place pair the legality filter uses on its scratch board.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Move, Piece, PieceKind, Square};

/// How a move resolves once played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Normal,
    /// Pawn capture whose victim stands beside the origin, not on `to`.
    EnPassant { captured: Square },
    /// King double step; the rook jumps to the far side of the king.
    Castle { rook_from: Square, rook_to: Square },
    /// Pawn arriving on the last rank becomes a queen.
    Promotion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    pub mv: Move,
    pub kind: MoveKind,
    pub captured: Option<Piece>,
    /// The mover took a poisoned piece and died with it.
    pub mover_destroyed: bool,
}

/// Execute `mv` on `board`. The caller has already validated the move;
/// allied-capture permission is checked by callers that can receive such
/// moves.
pub fn apply_move(board: &mut Board, mv: Move, kind: MoveKind) -> AppliedMove {
    let side_capture = match kind {
        MoveKind::EnPassant { captured } => board.remove(captured),
        _ => None,
    };
    let captured = board.relocate(mv.from, mv.to).or(side_capture);

    let mover_destroyed = captured.is_some_and(|p| p.poisoned);
    if mover_destroyed {
        board.remove(mv.to);
    } else {
        match kind {
            MoveKind::Castle { rook_from, rook_to } => {
                board.relocate(rook_from, rook_to);
            }
            MoveKind::Promotion => board.promote(mv.to, PieceKind::Queen),
            MoveKind::Normal | MoveKind::EnPassant { .. } => {}
        }
    }

    board.debug_assert_consistent();
    AppliedMove {
        mv,
        kind,
        captured,
        mover_destroyed,
    }
}

/// State needed to take back a temporary move.
#[derive(Debug, Clone, Copy)]
pub struct MoveUndo {
    mv: Move,
    moved: Piece,
    captured: Option<Piece>,
    rook: Option<(Square, Square)>,
}

/// Geometry-only move: no poison, no promotion. Returns `None` (and leaves
/// the board untouched) when `mv.from` is empty.
pub fn make_temporary_move(board: &mut Board, mv: Move, kind: MoveKind) -> Option<MoveUndo> {
    let moved = board.remove(mv.from)?;
    let captured = match kind {
        MoveKind::EnPassant { captured } => board.remove(captured),
        _ => board.remove(mv.to),
    };
    board.put(Piece {
        square: mv.to,
        ..moved
    });

    let rook = match kind {
        MoveKind::Castle { rook_from, rook_to } => {
            board.relocate(rook_from, rook_to);
            Some((rook_from, rook_to))
        }
        _ => None,
    };

    Some(MoveUndo {
        mv,
        moved,
        captured,
        rook,
    })
}

pub fn undo_temporary_move(board: &mut Board, undo: MoveUndo) {
    if let Some((rook_from, rook_to)) = undo.rook {
        board.relocate(rook_to, rook_from);
    }
    board.remove(undo.mv.to);
    board.put(undo.moved);
    if let Some(captured) = undo.captured {
        board.put(captured);
    }
    board.debug_assert_consistent();
}

#[cfg(test)]
mod tests {
    use super::{apply_move, make_temporary_move, undo_temporary_move, MoveKind};
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{Move, PieceKind, Square, Team};

    fn sq(file: i32, rank: i32) -> Square {
        Square::new(file, rank).expect("test square should be valid")
    }

    #[test]
    fn temporary_capture_round_trips_exactly() {
        let mut board = Board::standard();
        board.relocate(sq(3, 6), sq(3, 4));
        board.relocate(sq(4, 1), sq(4, 3));
        let before = board;

        let undo = make_temporary_move(&mut board, Move::new(sq(4, 3), sq(3, 4)), MoveKind::Normal)
            .expect("e4 pawn should move");
        assert_ne!(board, before);
        undo_temporary_move(&mut board, undo);
        assert_eq!(board, before);
    }

    #[test]
    fn temporary_en_passant_and_castle_round_trip() {
        let mut board = Board::empty();
        board.place(PieceKind::King, Team::White, sq(4, 0));
        board.place(PieceKind::Rook, Team::White, sq(7, 0));
        board.place(PieceKind::Pawn, Team::White, sq(4, 4));
        board.place(PieceKind::Pawn, Team::Black, sq(3, 4));
        let before = board;

        let ep = make_temporary_move(
            &mut board,
            Move::new(sq(4, 4), sq(3, 5)),
            MoveKind::EnPassant { captured: sq(3, 4) },
        )
        .expect("pawn should move");
        assert!(board.is_empty(sq(3, 4)));
        undo_temporary_move(&mut board, ep);
        assert_eq!(board, before);

        let castle = make_temporary_move(
            &mut board,
            Move::new(sq(4, 0), sq(6, 0)),
            MoveKind::Castle {
                rook_from: sq(7, 0),
                rook_to: sq(5, 0),
            },
        )
        .expect("king should move");
        assert_eq!(board.piece_at(sq(5, 0)).map(|p| p.kind), Some(PieceKind::Rook));
        undo_temporary_move(&mut board, castle);
        assert_eq!(board, before);
    }

    #[test]
    fn capturing_poisoned_piece_destroys_capturer() {
        let mut board = Board::empty();
        board.place(PieceKind::Queen, Team::White, sq(3, 0));
        board.place(PieceKind::Pawn, Team::Black, sq(3, 6));
        if let Some(victim) = board.piece_at_mut(sq(3, 6)) {
            victim.poisoned = true;
        }

        let applied = apply_move(&mut board, Move::new(sq(3, 0), sq(3, 6)), MoveKind::Normal);
        assert!(applied.mover_destroyed);
        assert_eq!(applied.captured.map(|p| p.kind), Some(PieceKind::Pawn));
        assert!(board.is_empty(sq(3, 6)));
        assert!(board.is_empty(sq(3, 0)));
    }

    #[test]
    fn promotion_becomes_queen() {
        let mut board = Board::empty();
        board.place(PieceKind::Pawn, Team::Black, sq(0, 1));
        apply_move(&mut board, Move::new(sq(0, 1), sq(0, 0)), MoveKind::Promotion);
        let piece = board.piece_at(sq(0, 0)).expect("promoted piece");
        assert_eq!(piece.kind, PieceKind::Queen);
        assert_eq!(piece.team, Team::Black);
    }
}
