//! The 8x8 piece grid plus the modifier flags card effects toggle.
//!
//! `Board` is a plain `Copy` value: search snapshots and legality scratch
//! boards are produced by copying it, never by sharing it.

use crate::game_state::chess_types::{Piece, PieceKind, Square, Team};

/// Shared cap on how far any piece may travel, with a turn countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCap {
    /// Maximum Chebyshev distance of a single move.
    pub max_squares: u8,
    pub turns_left: u8,
}

/// Rule-bending flags carried alongside the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub can_teleport: [bool; 2],
    pub can_jump: [bool; 2],
    pub can_capture_allied: bool,
    pub move_cap: Option<MoveCap>,
}

impl Modifiers {
    #[inline]
    pub const fn can_teleport(&self, team: Team) -> bool {
        self.can_teleport[team.index()]
    }

    #[inline]
    pub const fn can_jump(&self, team: Team) -> bool {
        self.can_jump[team.index()]
    }

    pub fn set_move_cap(&mut self, max_squares: u8, turns: u8) {
        self.move_cap = (turns > 0).then_some(MoveCap {
            max_squares,
            turns_left: turns,
        });
    }

    /// Count one finished turn against the move cap, clearing it at zero.
    pub fn tick_move_cap(&mut self) {
        if let Some(cap) = self.move_cap.as_mut() {
            cap.turns_left = cap.turns_left.saturating_sub(1);
            if cap.turns_left == 0 {
                self.move_cap = None;
            }
        }
    }

    /// Drop single-turn grants held by `team`.
    pub fn expire_turn_grants(&mut self, team: Team) {
        self.can_jump[team.index()] = false;
        self.can_teleport[team.index()] = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    /// Indexed `[file][rank]`.
    grid: [[Option<Piece>; 8]; 8],
    pub modifiers: Modifiers,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

const BACK_RANK_LAYOUT: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    pub const fn empty() -> Self {
        Self {
            grid: [[None; 8]; 8],
            modifiers: Modifiers {
                can_teleport: [false; 2],
                can_jump: [false; 2],
                can_capture_allied: false,
                move_cap: None,
            },
        }
    }

    /// Standard starting position, modifiers off.
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for team in Team::ALL {
            for (file, kind) in BACK_RANK_LAYOUT.iter().enumerate() {
                board.place(*kind, team, Square::on_rank(file as u8, team.back_rank()));
                board.place(
                    PieceKind::Pawn,
                    team,
                    Square::on_rank(file as u8, team.pawn_start_rank()),
                );
            }
        }
        board
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.grid[square.file() as usize][square.rank() as usize]
    }

    #[inline]
    pub fn piece_at_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.grid[square.file() as usize][square.rank() as usize].as_mut()
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    #[inline]
    pub fn is_enemy(&self, square: Square, team: Team) -> bool {
        self.piece_at(square).is_some_and(|p| p.team != team)
    }

    #[inline]
    pub fn is_friendly(&self, square: Square, team: Team) -> bool {
        self.piece_at(square).is_some_and(|p| p.team == team)
    }

    #[inline]
    fn slot_mut(&mut self, square: Square) -> &mut Option<Piece> {
        &mut self.grid[square.file() as usize][square.rank() as usize]
    }

    /// Put a fresh piece on `square`, returning whatever stood there.
    pub fn place(&mut self, kind: PieceKind, team: Team, square: Square) -> Option<Piece> {
        self.put(Piece::new(kind, team, square))
    }

    /// Put `piece` on its own `square` field, returning the previous occupant.
    pub fn put(&mut self, piece: Piece) -> Option<Piece> {
        self.slot_mut(piece.square).replace(piece)
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.slot_mut(square).take()
    }

    /// Move whatever stands on `from` to `to`, returning the displaced piece.
    /// Does nothing when `from` is empty.
    pub fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let Some(mut piece) = self.remove(from) else {
            return None;
        };
        piece.square = to;
        self.put(piece)
    }

    /// Replace the piece on `square` with `kind`, keeping its team.
    pub fn promote(&mut self, square: Square, kind: PieceKind) {
        if let Some(piece) = self.piece_at_mut(square) {
            piece.kind = kind;
        }
    }

    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.grid.iter().flatten().filter_map(|slot| *slot)
    }

    pub fn team_pieces(&self, team: Team) -> impl Iterator<Item = Piece> + '_ {
        self.pieces().filter(move |p| p.team == team)
    }

    pub fn king_square(&self, team: Team) -> Option<Square> {
        self.team_pieces(team)
            .find(|p| p.kind == PieceKind::King)
            .map(|p| p.square)
    }

    pub fn count(&self, kind: PieceKind, team: Team) -> usize {
        self.team_pieces(team).filter(|p| p.kind == kind).count()
    }

    /// Grid/piece consistency: every piece's `square` equals its slot.
    pub fn is_consistent(&self) -> bool {
        self.grid.iter().enumerate().all(|(file, column)| {
            column.iter().enumerate().all(|(rank, slot)| {
                slot.is_none_or(|p| {
                    p.square.file() as usize == file && p.square.rank() as usize == rank
                })
            })
        })
    }

    #[inline]
    pub fn debug_assert_consistent(&self) {
        debug_assert!(self.is_consistent(), "board grid and piece squares disagree");
    }
}
