//! Castling and en-passant facts distilled from move history.
//!
//! The live game derives these from its `MoveRecord`; search snapshots carry
//! them forward move by move, so neither needs the full history.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Move, PieceKind, Square, Team};
use crate::game_state::move_record::MoveRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    /// Toward the a-file rook.
    QueenSide,
    /// Toward the h-file rook.
    KingSide,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::QueenSide, CastleSide::KingSide];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            CastleSide::QueenSide => 0,
            CastleSide::KingSide => 1,
        }
    }

    #[inline]
    pub const fn rook_file(self) -> u8 {
        match self {
            CastleSide::QueenSide => 0,
            CastleSide::KingSide => 7,
        }
    }

    #[inline]
    pub const fn king_target_file(self) -> u8 {
        match self {
            CastleSide::QueenSide => 2,
            CastleSide::KingSide => 6,
        }
    }

    #[inline]
    pub const fn rook_target_file(self) -> u8 {
        match self {
            CastleSide::QueenSide => 3,
            CastleSide::KingSide => 5,
        }
    }

    /// Files strictly between the king's home file and the rook.
    pub const fn between_files(self) -> &'static [u8] {
        match self {
            CastleSide::QueenSide => &[1, 2, 3],
            CastleSide::KingSide => &[5, 6],
        }
    }

    pub const fn from_king_target(file: u8) -> Option<Self> {
        match file {
            2 => Some(CastleSide::QueenSide),
            6 => Some(CastleSide::KingSide),
            _ => None,
        }
    }
}

pub const KING_HOME_FILE: u8 = 4;

#[inline]
pub const fn king_home(team: Team) -> Square {
    Square::on_rank(KING_HOME_FILE, team.back_rank())
}

#[inline]
pub const fn rook_home(team: Team, side: CastleSide) -> Square {
    Square::on_rank(side.rook_file(), team.back_rank())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialRights {
    /// `[team][side]`: neither the king nor that rook has left home.
    castling: [[bool; 2]; 2],
    /// Landing square of the last move when it was a pawn double push.
    double_push: Option<Square>,
}

impl Default for SpecialRights {
    fn default() -> Self {
        Self::initial()
    }
}

impl SpecialRights {
    pub const fn initial() -> Self {
        Self {
            castling: [[true; 2]; 2],
            double_push: None,
        }
    }

    pub const fn none() -> Self {
        Self {
            castling: [[false; 2]; 2],
            double_push: None,
        }
    }

    pub fn from_history(board: &Board, record: &MoveRecord) -> Self {
        let mut rights = Self::initial();
        for team in Team::ALL {
            let king_moved = record.has_move_from(king_home(team));
            for side in CastleSide::ALL {
                rights.castling[team.index()][side.index()] =
                    !king_moved && !record.has_move_from(rook_home(team, side));
            }
        }
        rights.double_push = record.last().and_then(|mv| double_push_landing(board, mv));
        rights
    }

    #[inline]
    pub const fn can_castle(&self, team: Team, side: CastleSide) -> bool {
        self.castling[team.index()][side.index()]
    }

    pub fn set_castle(&mut self, team: Team, side: CastleSide, allowed: bool) {
        self.castling[team.index()][side.index()] = allowed;
    }

    #[inline]
    pub const fn double_push(&self) -> Option<Square> {
        self.double_push
    }

    pub fn set_double_push(&mut self, landing: Option<Square>) {
        self.double_push = landing;
    }

    /// Rights after `mv` has been applied, with `board_after` the result.
    pub fn after_move(self, board_after: &Board, mv: Move) -> Self {
        let mut next = self;
        for team in Team::ALL {
            for side in CastleSide::ALL {
                if mv.from == king_home(team) || mv.from == rook_home(team, side) {
                    next.castling[team.index()][side.index()] = false;
                }
            }
        }
        next.double_push = double_push_landing(board_after, mv);
        next
    }
}

fn double_push_landing(board_after: &Board, mv: Move) -> Option<Square> {
    let is_pawn = board_after
        .piece_at(mv.to)
        .is_some_and(|p| p.kind == PieceKind::Pawn);
    (is_pawn && mv.file_delta() == 0 && mv.rank_delta().abs() == 2).then_some(mv.to)
}
