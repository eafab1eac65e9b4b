//! Core value types shared by the rules engine, search and card effects.
//!
//! Squares are (file, rank) pairs in `0..=7`: file 0 is the a-file and rank 0
//! is White's back rank. A `Square` can only be built through checked
//! constructors, so anything holding one may index the board directly.

use std::fmt;

use crate::game_state::errors::{ChessError, ChessResult};

pub const BOARD_SIZE: u8 = 8;

/// Side owning a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    White,
    Black,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::White, Team::Black];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Team::White => 0,
            Team::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Team::White => Team::Black,
            Team::Black => Team::White,
        }
    }

    /// Rank step a pawn of this team advances by.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Team::White => 1,
            Team::Black => -1,
        }
    }

    #[inline]
    pub const fn back_rank(self) -> u8 {
        match self {
            Team::White => 0,
            Team::Black => 7,
        }
    }

    #[inline]
    pub const fn pawn_start_rank(self) -> u8 {
        match self {
            Team::White => 1,
            Team::Black => 6,
        }
    }

    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Team::White => 7,
            Team::Black => 0,
        }
    }

    /// Rank counted from this team's own back rank.
    #[inline]
    pub const fn relative_rank(self, rank: u8) -> u8 {
        match self {
            Team::White => rank,
            Team::Black => 7 - rank,
        }
    }
}

/// Piece kind (team is stored separately on [`Piece`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Material value in pawns.
    #[inline]
    pub const fn value(self) -> f32 {
        match self {
            PieceKind::Pawn => 1.0,
            PieceKind::Knight => 3.2,
            PieceKind::Bishop => 3.3,
            PieceKind::Rook => 5.0,
            PieceKind::Queen => 9.0,
            PieceKind::King => 900.0,
        }
    }

    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// FEN letter, uppercase for White.
    pub const fn fen_char(self, team: Team) -> char {
        let lower = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match team {
            Team::White => lower.to_ascii_uppercase(),
            Team::Black => lower,
        }
    }

    pub const fn from_fen_char(ch: char) -> Option<(PieceKind, Team)> {
        let team = if ch.is_ascii_uppercase() {
            Team::White
        } else {
            Team::Black
        };
        let kind = match ch.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((kind, team))
    }
}

/// On-board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Checked constructor; rejects anything outside `0..=7`.
    pub fn new(file: i32, rank: i32) -> ChessResult<Self> {
        if (0..BOARD_SIZE as i32).contains(&file) && (0..BOARD_SIZE as i32).contains(&rank) {
            Ok(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            Err(ChessError::InvalidSquare { file, rank })
        }
    }

    /// Square `index = rank * 8 + file`, `None` past 63.
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 64 {
            Some(Self {
                file: (index % 8) as u8,
                rank: (index / 8) as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    #[inline]
    pub const fn bit(self) -> u64 {
        1u64 << self.index()
    }

    /// Step by `(d_file, d_rank)`, `None` when that leaves the board.
    #[inline]
    pub const fn offset(self, d_file: i8, d_rank: i8) -> Option<Self> {
        let file = self.file as i8 + d_file;
        let rank = self.rank as i8 + d_rank;
        if file >= 0 && file < BOARD_SIZE as i8 && rank >= 0 && rank < BOARD_SIZE as i8 {
            Some(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    /// Same file, given rank. Both arguments come from an existing square or
    /// from `Team` rank constants.
    #[inline]
    pub(crate) const fn with_rank(self, rank: u8) -> Self {
        debug_assert!(rank < BOARD_SIZE);
        Self {
            file: self.file,
            rank,
        }
    }

    #[inline]
    pub(crate) const fn on_rank(file: u8, rank: u8) -> Self {
        debug_assert!(file < BOARD_SIZE && rank < BOARD_SIZE);
        Self { file, rank }
    }

    /// King-move distance.
    #[inline]
    pub fn chebyshev_distance(self, other: Square) -> u8 {
        self.file
            .abs_diff(other.file)
            .max(self.rank.abs_diff(other.rank))
    }

    #[inline]
    pub fn manhattan_distance(self, other: Square) -> u8 {
        self.file.abs_diff(other.file) + self.rank.abs_diff(other.rank)
    }

    /// Manhattan distance to the geometric board center (3.5, 3.5).
    #[inline]
    pub fn center_distance(self) -> f32 {
        (self.file as f32 - 3.5).abs() + (self.rank as f32 - 3.5).abs()
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).filter_map(Square::from_index)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            char::from(b'a' + self.file),
            char::from(b'1' + self.rank)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub team: Team,
    /// Always equal to the grid slot holding this piece.
    pub square: Square,
    /// Capturing a poisoned piece also destroys the capturer.
    pub poisoned: bool,
}

impl Piece {
    pub const fn new(kind: PieceKind, team: Team, square: Square) -> Self {
        Self {
            kind,
            team,
            square,
            poisoned: false,
        }
    }
}

/// A {from, to} pair. Capture identity is read from the board when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    #[inline]
    pub fn file_delta(self) -> i8 {
        self.to.file() as i8 - self.from.file() as i8
    }

    #[inline]
    pub fn rank_delta(self) -> i8 {
        self.to.rank() as i8 - self.from.rank() as i8
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}
