//! FEN-to-position parser.
//!
//! Understands the placement field plus the optional side-to-move, castling
//! and en-passant fields. Clocks are accepted and ignored; card modifiers
//! have no FEN representation and start switched off.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceKind, Square, Team};
use crate::game_state::errors::{ChessError, ChessResult};
use crate::game_state::snapshot::BoardSnapshot;
use crate::game_state::special_rights::{CastleSide, SpecialRights};
use crate::utils::algebraic::algebraic_to_square;

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Parse only the piece placement field (`rnbqkbnr/pppppppp/...`).
pub fn parse_placement(placement: &str) -> ChessResult<Board> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessError::InvalidFen(
            "board layout must contain 8 ranks".to_owned(),
        ));
    }

    let mut board = Board::empty();
    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - fen_rank_idx as i32;
        let mut file = 0i32;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid empty-square count '{ch}'"
                    )));
                }
                file += empty_count as i32;
                continue;
            }

            let (kind, team) = PieceKind::from_fen_char(ch).ok_or_else(|| {
                ChessError::InvalidFen(format!("invalid piece character '{ch}'"))
            })?;
            let square = Square::new(file, rank)
                .map_err(|_| ChessError::InvalidFen(format!("rank {} is too long", rank + 1)))?;
            board.place(kind, team, square);
            file += 1;
        }

        if file != 8 {
            return Err(ChessError::InvalidFen(format!(
                "rank {} does not sum to 8 files",
                rank + 1
            )));
        }
    }

    Ok(board)
}

/// Parse a full or abbreviated FEN. Missing fields default to White to move,
/// no castling and no en-passant target.
pub fn parse_fen(fen: &str) -> ChessResult<BoardSnapshot> {
    let mut parts = fen.split_whitespace();
    let placement = parts
        .next()
        .ok_or_else(|| ChessError::InvalidFen("missing board layout".to_owned()))?;
    let board = parse_placement(placement)?;

    let side = match parts.next() {
        None | Some("w") => Team::White,
        Some("b") => Team::Black,
        Some(other) => {
            return Err(ChessError::InvalidFen(format!(
                "invalid side-to-move field: {other}"
            )))
        }
    };

    let mut rights = parse_castling(parts.next().unwrap_or("-"))?;
    rights.set_double_push(parse_en_passant(parts.next().unwrap_or("-"), side)?);

    Ok(BoardSnapshot::new(board, side, rights))
}

fn parse_castling(field: &str) -> ChessResult<SpecialRights> {
    let mut rights = SpecialRights::none();
    if field == "-" {
        return Ok(rights);
    }
    for ch in field.chars() {
        let (team, side) = match ch {
            'K' => (Team::White, CastleSide::KingSide),
            'Q' => (Team::White, CastleSide::QueenSide),
            'k' => (Team::Black, CastleSide::KingSide),
            'q' => (Team::Black, CastleSide::QueenSide),
            _ => {
                return Err(ChessError::InvalidFen(format!(
                    "invalid castling character: {ch}"
                )))
            }
        };
        rights.set_castle(team, side, true);
    }
    Ok(rights)
}

/// FEN names the square behind the pushed pawn; rights store where it landed.
fn parse_en_passant(field: &str, side_to_move: Team) -> ChessResult<Option<Square>> {
    if field == "-" {
        return Ok(None);
    }
    let target = algebraic_to_square(field)?;
    // The pawn that pushed belongs to the side not on move.
    let back = side_to_move.opposite().forward();
    target
        .offset(0, back)
        .map(Some)
        .ok_or_else(|| ChessError::InvalidFen(format!("invalid en-passant square: {field}")))
}
