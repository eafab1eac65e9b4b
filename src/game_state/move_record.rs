//! Append-only history of applied moves.

use crate::game_state::chess_types::{Move, Square};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveRecord {
    entries: Vec<Move>,
}

impl MoveRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mv: Move) {
        self.entries.push(mv);
    }

    pub fn last(&self) -> Option<Move> {
        self.entries.last().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.entries.iter().copied()
    }

    /// True once anything has moved away from `square`.
    pub fn has_move_from(&self, square: Square) -> bool {
        self.entries.iter().any(|mv| mv.from == square)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
