//! Ray walking for bishops, rooks and queens.
//!
//! With a jump grant each ray may pass over one blocker. A passed enemy is
//! still recorded as a capture square; the ray then continues until the next
//! obstruction, which ends it.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Piece, PieceKind, Square};

pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub fn slider_directions(kind: PieceKind) -> &'static [(i8, i8)] {
    match kind {
        PieceKind::Bishop => &BISHOP_DIRECTIONS,
        PieceKind::Rook => &ROOK_DIRECTIONS,
        PieceKind::Queen => &QUEEN_DIRECTIONS,
        _ => &[],
    }
}

pub fn sliding_moves(board: &Board, piece: Piece, out: &mut Vec<Square>) {
    let can_jump = board.modifiers.can_jump(piece.team);

    for &(df, dr) in slider_directions(piece.kind) {
        let mut jump_left = can_jump;
        let mut cursor = piece.square;

        while let Some(next) = cursor.offset(df, dr) {
            cursor = next;
            match board.piece_at(next) {
                None => out.push(next),
                Some(blocker) => {
                    if blocker.team != piece.team {
                        out.push(next);
                    }
                    if !jump_left {
                        break;
                    }
                    jump_left = false;
                }
            }
        }
    }
}

/// First occupied square along each ray, without jumps.
pub fn first_blockers(board: &Board, piece: Piece) -> impl Iterator<Item = Square> + '_ {
    slider_directions(piece.kind).iter().filter_map(move |&(df, dr)| {
        let mut cursor = piece.square;
        while let Some(next) = cursor.offset(df, dr) {
            if !board.is_empty(next) {
                return Some(next);
            }
            cursor = next;
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::sliding_moves;
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{PieceKind, Square, Team};

    fn sq(file: i32, rank: i32) -> Square {
        Square::new(file, rank).expect("test square should be valid")
    }

    fn moves_of(board: &Board, square: Square) -> Vec<Square> {
        let piece = board.piece_at(square).expect("slider should exist");
        let mut out = Vec::new();
        sliding_moves(board, piece, &mut out);
        out.sort();
        out
    }

    #[test]
    fn rook_on_empty_board_sees_fourteen_squares() {
        let mut board = Board::empty();
        board.place(PieceKind::Rook, Team::White, sq(3, 3));
        assert_eq!(moves_of(&board, sq(3, 3)).len(), 14);
    }

    #[test]
    fn rook_stops_at_friend_and_after_enemy() {
        let mut board = Board::empty();
        board.place(PieceKind::Rook, Team::White, sq(0, 0));
        board.place(PieceKind::Pawn, Team::White, sq(0, 2));
        board.place(PieceKind::Knight, Team::Black, sq(3, 0));
        assert_eq!(moves_of(&board, sq(0, 0)), vec![sq(0, 1), sq(1, 0), sq(2, 0), sq(3, 0)]);
    }

    #[test]
    fn jumping_rook_passes_one_blocker_and_captures_beyond() {
        let mut board = Board::empty();
        board.place(PieceKind::Rook, Team::White, sq(0, 0));
        board.place(PieceKind::Pawn, Team::White, sq(0, 1));
        board.place(PieceKind::Knight, Team::Black, sq(0, 4));
        board.place(PieceKind::Bishop, Team::Black, sq(0, 6));
        board.modifiers.can_jump[Team::White.index()] = true;

        let moves = moves_of(&board, sq(0, 0));
        assert!(!moves.contains(&sq(0, 1)));
        assert!(moves.contains(&sq(0, 2)));
        assert!(moves.contains(&sq(0, 3)));
        assert!(moves.contains(&sq(0, 4)));
        assert!(!moves.contains(&sq(0, 5)));
        assert!(!moves.contains(&sq(0, 6)));
    }

    #[test]
    fn jump_over_enemy_records_capture_and_continues() {
        let mut board = Board::empty();
        board.place(PieceKind::Bishop, Team::Black, sq(7, 7));
        board.place(PieceKind::Pawn, Team::White, sq(5, 5));
        board.place(PieceKind::Queen, Team::White, sq(2, 2));
        board.modifiers.can_jump[Team::Black.index()] = true;

        let moves = moves_of(&board, sq(7, 7));
        assert_eq!(moves, vec![sq(2, 2), sq(3, 3), sq(4, 4), sq(5, 5), sq(6, 6)]);
    }
}
