//! Teleport grant: every empty square is reachable, whatever the piece.

use crate::game_state::board::Board;
use crate::game_state::chess_types::Square;

pub fn teleport_moves(board: &Board, out: &mut Vec<Square>) {
    out.extend(Square::all().filter(|sq| board.is_empty(*sq)));
}
