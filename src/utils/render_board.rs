//! Terminal board renderer used by the driver binary and in log output.

use crate::game_state::board::Board;
use crate::game_state::chess_types::Square;

/// Render with rank 8 at the top; poisoned pieces are marked with `*`.
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();
    out.push_str("   a  b  c  d  e  f  g  h\n");

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');
        for file in 0..8u8 {
            let square = Square::on_rank(file, rank);
            match board.piece_at(square) {
                Some(piece) => {
                    out.push(' ');
                    out.push(piece.kind.fen_char(piece.team));
                    out.push(if piece.poisoned { '*' } else { ' ' });
                }
                None => out.push_str(" . "),
            }
        }
        out.push(' ');
        out.push(char::from(b'1' + rank));
        out.push('\n');
    }

    out.push_str("   a  b  c  d  e  f  g  h");
    out
}

#[cfg(test)]
mod tests {
    use super::render_board;
    use crate::game_state::board::Board;

    #[test]
    fn renders_start_position_rows() {
        let text = render_board(&Board::standard());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[1], "8  r  n  b  q  k  b  n  r  8");
        assert_eq!(lines[4], "5  .  .  .  .  .  .  .  .  5");
    }
}
