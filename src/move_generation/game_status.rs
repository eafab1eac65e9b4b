//! Game-ending classification.
//!
//! None of these outcomes are errors: checkmate, stalemate, a missing king
//! and insufficient material are all ordinary results of a position.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceKind, Team};
use crate::game_state::special_rights::SpecialRights;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::has_legal_move;

/// The (in check, can move) pair reported per team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardState {
    pub king_in_check: bool,
    pub has_legal_move: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing { in_check: bool },
    Checkmate { winner: Team },
    Stalemate,
    InsufficientMaterial,
    /// The team has no king left (captured through a card effect or poison).
    KingMissing { loser: Team },
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::Ongoing { .. })
    }
}

/// A team with no king reports `(false, false)`.
pub fn evaluate_board_state(board: &Board, rights: &SpecialRights, team: Team) -> BoardState {
    if board.king_square(team).is_none() {
        return BoardState {
            king_in_check: false,
            has_legal_move: false,
        };
    }
    BoardState {
        king_in_check: is_king_in_check(board, team),
        has_legal_move: has_legal_move(board, rights, team),
    }
}

/// Bare king, king plus one minor piece, or king plus two knights.
fn team_cannot_mate(board: &Board, team: Team) -> bool {
    let mut others = board
        .team_pieces(team)
        .filter(|p| p.kind != PieceKind::King)
        .map(|p| p.kind);
    match (others.next(), others.next(), others.next()) {
        (None, _, _) => true,
        (Some(PieceKind::Knight | PieceKind::Bishop), None, _) => true,
        (Some(PieceKind::Knight), Some(PieceKind::Knight), None) => true,
        _ => false,
    }
}

pub fn is_insufficient_material(board: &Board) -> bool {
    Team::ALL.iter().all(|team| team_cannot_mate(board, *team))
}

pub fn classify(board: &Board, rights: &SpecialRights, side_to_move: Team) -> GameStatus {
    for team in [side_to_move, side_to_move.opposite()] {
        if board.king_square(team).is_none() {
            return GameStatus::KingMissing { loser: team };
        }
    }
    if is_insufficient_material(board) {
        return GameStatus::InsufficientMaterial;
    }

    let state = evaluate_board_state(board, rights, side_to_move);
    match (state.king_in_check, state.has_legal_move) {
        (_, true) => GameStatus::Ongoing {
            in_check: state.king_in_check,
        },
        (true, false) => GameStatus::Checkmate {
            winner: side_to_move.opposite(),
        },
        (false, false) => GameStatus::Stalemate,
    }
}
