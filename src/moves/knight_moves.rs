//! Knight targets: eight fixed offsets, friendly squares excluded.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Piece, Square};

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// On-board knight targets per square index, ignoring occupancy.
pub const KNIGHT_TARGETS: [u64; 64] = generate_knight_targets();

const fn generate_knight_targets() -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut targets = 0u64;
        let mut i = 0;
        while i < KNIGHT_OFFSETS.len() {
            let (df, dr) = KNIGHT_OFFSETS[i];
            targets |= bit_if_valid(file + df as i32, rank + dr as i32);
            i += 1;
        }
        table[sq] = targets;
        sq += 1;
    }

    table
}

pub(crate) const fn bit_if_valid(file: i32, rank: i32) -> u64 {
    if file < 0 || file > 7 || rank < 0 || rank > 7 {
        return 0;
    }
    1u64 << ((rank as usize) * 8 + (file as usize))
}

/// Iterate the squares of a bit mask from a1 upward.
pub(crate) fn squares_of(mut mask: u64) -> impl Iterator<Item = Square> {
    std::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let index = mask.trailing_zeros() as usize;
        mask &= mask - 1;
        Square::from_index(index)
    })
}

pub fn knight_moves(board: &Board, knight: Piece, out: &mut Vec<Square>) {
    for target in squares_of(KNIGHT_TARGETS[knight.square.index()]) {
        if !board.is_friendly(target, knight.team) {
            out.push(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{knight_moves, KNIGHT_TARGETS};
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{PieceKind, Square, Team};

    #[test]
    fn knight_on_d4_has_eight_targets_and_corner_has_two() {
        let d4 = Square::new(3, 3).expect("d4 should be valid");
        assert_eq!(KNIGHT_TARGETS[d4.index()].count_ones(), 8);
        assert_eq!(KNIGHT_TARGETS[0].count_ones(), 2);
    }

    #[test]
    fn knight_skips_friendly_squares() {
        let board = Board::standard();
        let b1 = Square::new(1, 0).expect("b1 should be valid");
        let knight = board.piece_at(b1).expect("knight should stand on b1");
        assert_eq!(knight.kind, PieceKind::Knight);
        assert_eq!(knight.team, Team::White);

        let mut out = Vec::new();
        knight_moves(&board, knight, &mut out);
        out.sort();
        let expected = vec![
            Square::new(0, 2).expect("a3"),
            Square::new(2, 2).expect("c3"),
        ];
        assert_eq!(out, expected);
    }
}
