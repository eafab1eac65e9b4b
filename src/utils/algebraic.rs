//! Coordinate notation helpers.
//!
//! Converts between human-readable coordinates (`e4`, `e2e4`) and the
//! internal `Square` / `Move` values used by tests, the opening book and the
//! command-line driver.

use crate::game_state::chess_types::{Move, Square};
use crate::game_state::errors::{ChessError, ChessResult};

/// Parse a square such as `"e4"`.
pub fn algebraic_to_square(text: &str) -> ChessResult<Square> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidAlgebraic(text.to_owned()));
    }

    let file = bytes[0];
    let rank = bytes[1];
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::InvalidAlgebraic(text.to_owned()));
    }

    Square::new(i32::from(file - b'a'), i32::from(rank - b'1'))
}

/// Parse a coordinate move such as `"e2e4"`.
pub fn algebraic_to_move(text: &str) -> ChessResult<Move> {
    let trimmed = text.trim();
    if trimmed.len() != 4 || !trimmed.is_ascii() {
        return Err(ChessError::InvalidAlgebraic(text.to_owned()));
    }
    let from = algebraic_to_square(&trimmed[..2])?;
    let to = algebraic_to_square(&trimmed[2..])?;
    Ok(Move::new(from, to))
}

#[cfg(test)]
mod tests {
    use super::{algebraic_to_move, algebraic_to_square};
    use crate::game_state::chess_types::Square;

    #[test]
    fn round_trip_square_conversions() {
        let a1 = algebraic_to_square("a1").expect("a1 should parse");
        let h8 = algebraic_to_square("h8").expect("h8 should parse");
        assert_eq!(a1, Square::new(0, 0).expect("a1"));
        assert_eq!(h8.index(), 63);
        assert_eq!(h8.to_string(), "h8");
    }

    #[test]
    fn moves_parse_and_reject_garbage() {
        let mv = algebraic_to_move("g1f3").expect("g1f3 should parse");
        assert_eq!(mv.to_string(), "g1f3");
        assert!(algebraic_to_move("z9a1").is_err());
        assert!(algebraic_to_move("e2e").is_err());
        assert!(algebraic_to_square("i1").is_err());
    }
}
