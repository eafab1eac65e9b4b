//! Pawn pushes and diagonal captures.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Piece, Square};

pub fn pawn_moves(board: &Board, pawn: Piece, out: &mut Vec<Square>) {
    let dir = pawn.team.forward();
    let can_jump = board.modifiers.can_jump(pawn.team);

    if let Some(one) = pawn.square.offset(0, dir) {
        let one_empty = board.is_empty(one);
        if one_empty {
            out.push(one);
        }

        // A jump grant lets the double push leap a blocked first square.
        if pawn.square.rank() == pawn.team.pawn_start_rank() && (one_empty || can_jump) {
            if let Some(two) = pawn.square.offset(0, 2 * dir) {
                if board.is_empty(two) {
                    out.push(two);
                }
            }
        }
    }

    for target in pawn_capture_squares(pawn) {
        if board.is_enemy(target, pawn.team) {
            out.push(target);
        }
    }
}

/// The two forward diagonals, whether or not anything stands there.
pub fn pawn_capture_squares(pawn: Piece) -> impl Iterator<Item = Square> {
    let dir = pawn.team.forward();
    [-1i8, 1]
        .into_iter()
        .filter_map(move |df| pawn.square.offset(df, dir))
}

#[cfg(test)]
mod tests {
    use super::pawn_moves;
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{PieceKind, Square, Team};

    fn sq(file: i32, rank: i32) -> Square {
        Square::new(file, rank).expect("test square should be valid")
    }

    fn moves_of(board: &Board, square: Square) -> Vec<Square> {
        let pawn = board.piece_at(square).expect("pawn should exist");
        let mut out = Vec::new();
        pawn_moves(board, pawn, &mut out);
        out.sort();
        out
    }

    #[test]
    fn start_rank_pawn_has_single_and_double_push() {
        let board = Board::standard();
        assert_eq!(moves_of(&board, sq(4, 1)), vec![sq(4, 2), sq(4, 3)]);
        assert_eq!(moves_of(&board, sq(3, 6)), vec![sq(3, 4), sq(3, 5)]);
    }

    #[test]
    fn blocked_pawn_needs_jump_grant_for_double_push() {
        let mut board = Board::empty();
        board.place(PieceKind::Pawn, Team::White, sq(4, 1));
        board.place(PieceKind::Knight, Team::Black, sq(4, 2));
        assert!(moves_of(&board, sq(4, 1)).is_empty());

        board.modifiers.can_jump[Team::White.index()] = true;
        assert_eq!(moves_of(&board, sq(4, 1)), vec![sq(4, 3)]);
    }

    #[test]
    fn pawn_captures_only_enemies_diagonally() {
        let mut board = Board::empty();
        board.place(PieceKind::Pawn, Team::White, sq(3, 3));
        board.place(PieceKind::Rook, Team::Black, sq(2, 4));
        board.place(PieceKind::Rook, Team::White, sq(4, 4));
        assert_eq!(moves_of(&board, sq(3, 3)), vec![sq(2, 4), sq(3, 4)]);
    }
}
