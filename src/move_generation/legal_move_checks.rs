use crate::game_state::board::Board;
use crate::game_state::chess_types::{Square, Team};
use crate::moves::piece_moves::occupied_reach;

/// True when any piece of `attacker` has `square` in its pseudo-legal set.
///
/// `scratch` is reused between attackers so a full scan allocates at most once.
pub fn is_square_attacked_with(
    board: &Board,
    square: Square,
    attacker: Team,
    scratch: &mut Vec<Square>,
) -> bool {
    board.team_pieces(attacker).any(|piece| {
        scratch.clear();
        occupied_reach(board, piece, scratch);
        scratch.contains(&square)
    })
}

/// Attack test on an occupied square. For empty squares the answer ignores
/// teleport grants, which is what move ordering wants.
pub fn is_square_attacked(board: &Board, square: Square, attacker: Team) -> bool {
    let mut scratch = Vec::with_capacity(32);
    is_square_attacked_with(board, square, attacker, &mut scratch)
}

#[inline]
pub fn is_king_in_check(board: &Board, team: Team) -> bool {
    let Some(king) = board.king_square(team) else {
        return false;
    };
    is_square_attacked(board, king, team.opposite())
}

/// Every enemy piece whose pseudo-legal set contains `square`.
pub fn attackers_to_square(board: &Board, square: Square, attacker: Team) -> Vec<Square> {
    let mut scratch = Vec::with_capacity(32);
    board
        .team_pieces(attacker)
        .filter(|piece| {
            scratch.clear();
            occupied_reach(board, *piece, &mut scratch);
            scratch.contains(&square)
        })
        .map(|piece| piece.square)
        .collect()
}
