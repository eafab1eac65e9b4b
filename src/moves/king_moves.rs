//! King steps: the adjacent squares not held by a friendly piece.
//!
//! Castling destinations are added by the special-move resolver.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Piece, Square};
use crate::moves::knight_moves::{bit_if_valid, squares_of};

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

pub const KING_TARGETS: [u64; 64] = generate_king_targets();

const fn generate_king_targets() -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut targets = 0u64;
        let mut i = 0;
        while i < KING_OFFSETS.len() {
            let (df, dr) = KING_OFFSETS[i];
            targets |= bit_if_valid(file + df as i32, rank + dr as i32);
            i += 1;
        }
        table[sq] = targets;
        sq += 1;
    }

    table
}

pub fn king_moves(board: &Board, king: Piece, out: &mut Vec<Square>) {
    for target in squares_of(KING_TARGETS[king.square.index()]) {
        if !board.is_friendly(target, king.team) {
            out.push(target);
        }
    }
}
