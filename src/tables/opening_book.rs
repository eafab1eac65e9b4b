//! Opening-book support with TSV import.
//!
//! Book rows name a move from White's side together with the range of the
//! engine's own move numbers it applies to; Black plays the rank-mirrored
//! move. Candidates that are not legal in the current position are skipped.

use std::fs;

use rand::Rng;
use tracing::debug;

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Move, Square, Team};
use crate::game_state::errors::{ChessError, ChessResult};
use crate::game_state::special_rights::SpecialRights;
use crate::move_generation::legal_move_generator::legal_destinations;
use crate::utils::algebraic::algebraic_to_move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookMove {
    /// Written from White's side.
    pub mv: Move,
    pub weight: u32,
    first_move: u32,
    last_move: u32,
}

impl BookMove {
    #[inline]
    fn applies_to(&self, engine_move: u32) -> bool {
        (self.first_move..=self.last_move).contains(&engine_move)
    }

    /// The move as `team` plays it.
    pub fn for_team(&self, team: Team) -> Move {
        match team {
            Team::White => self.mv,
            Team::Black => Move::new(mirror(self.mv.from), mirror(self.mv.to)),
        }
    }
}

#[inline]
fn mirror(square: Square) -> Square {
    square.with_rank(7 - square.rank())
}

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    moves: Vec<BookMove>,
}

impl OpeningBook {
    /// The embedded book, or an empty one if it fails to parse.
    pub fn load_default() -> Self {
        Self::from_tsv_str(include_str!("data/opening_book.tsv")).unwrap_or_default()
    }

    pub fn from_tsv_path(path: &str) -> ChessResult<Self> {
        let data = fs::read_to_string(path)
            .map_err(|e| ChessError::InvalidBook(format!("failed reading {path}: {e}")))?;
        Self::from_tsv_str(&data)
    }

    pub fn from_tsv_str(tsv: &str) -> ChessResult<Self> {
        let mut lines = tsv.lines().filter(|line| !line.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| ChessError::InvalidBook("opening TSV is empty".to_owned()))?;

        let mut first_idx = None;
        let mut last_idx = None;
        let mut uci_idx = None;
        let mut weight_idx = None;
        for (i, name) in header.split('\t').enumerate() {
            match name.trim().to_ascii_lowercase().as_str() {
                "first_move" => first_idx = Some(i),
                "last_move" => last_idx = Some(i),
                "uci" | "move" => uci_idx = Some(i),
                "weight" | "count" => weight_idx = Some(i),
                _ => {}
            }
        }
        let (Some(first_idx), Some(uci_idx)) = (first_idx, uci_idx) else {
            return Err(ChessError::InvalidBook(
                "opening TSV must contain 'first_move' and 'uci' columns".to_owned(),
            ));
        };
        let last_idx = last_idx.unwrap_or(first_idx);

        let mut moves = Vec::new();
        for line in lines {
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            let number = |idx: usize| -> ChessResult<u32> {
                fields
                    .get(idx)
                    .and_then(|s| s.parse::<u32>().ok())
                    .ok_or_else(|| ChessError::InvalidBook(format!("bad move number in row '{line}'")))
            };

            let uci = fields
                .get(uci_idx)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| ChessError::InvalidBook(format!("missing move in row '{line}'")))?;
            let mv = algebraic_to_move(uci)
                .map_err(|e| ChessError::InvalidBook(format!("row '{line}': {e}")))?;
            let weight = weight_idx
                .and_then(|idx| fields.get(idx))
                .and_then(|w| w.parse::<u32>().ok())
                .unwrap_or(1);

            moves.push(BookMove {
                mv,
                weight,
                first_move: number(first_idx)?,
                last_move: number(last_idx)?,
            });
        }
        Ok(Self { moves })
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Rows for the engine's `engine_move`-th move (counted from zero).
    pub fn moves_for(&self, engine_move: u32) -> impl Iterator<Item = &BookMove> + '_ {
        self.moves.iter().filter(move |m| m.applies_to(engine_move))
    }

    /// Book moves for `team` that are legal on `board`.
    pub fn legal_candidates(
        &self,
        board: &Board,
        rights: &SpecialRights,
        team: Team,
        engine_move: u32,
    ) -> Vec<(Move, u32)> {
        self.moves_for(engine_move)
            .filter_map(|entry| {
                let mv = entry.for_team(team);
                let owned = board.piece_at(mv.from).is_some_and(|p| p.team == team);
                (owned && legal_destinations(board, rights, mv.from).contains(&mv.to))
                    .then_some((mv, entry.weight))
            })
            .collect()
    }

    pub fn choose_weighted_move<R: Rng + ?Sized>(
        &self,
        board: &Board,
        rights: &SpecialRights,
        team: Team,
        engine_move: u32,
        rng: &mut R,
    ) -> Option<Move> {
        let candidates = self.legal_candidates(board, rights, team, engine_move);
        let first = candidates.first()?.0;

        let total_weight: u64 = candidates.iter().map(|(_, w)| u64::from(*w)).sum();
        if total_weight == 0 {
            return Some(first);
        }

        let mut pick = rng.random_range(0..total_weight);
        for (mv, weight) in &candidates {
            let w = u64::from(*weight);
            if pick < w {
                debug!(mv = %mv, engine_move, "opening book move chosen");
                return Some(*mv);
            }
            pick -= w;
        }
        Some(first)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::OpeningBook;
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{Move, Team};
    use crate::game_state::special_rights::SpecialRights;
    use crate::utils::algebraic::algebraic_to_move;
    use crate::utils::fen_parser::parse_placement;

    fn mv(text: &str) -> Move {
        algebraic_to_move(text).expect("test move should parse")
    }

    #[test]
    fn embedded_book_parses() {
        let book = OpeningBook::load_default();
        assert_eq!(book.len(), 8);
        assert_eq!(book.moves_for(0).count(), 4);
        assert_eq!(book.moves_for(2).count(), 4);
        assert_eq!(book.moves_for(4).count(), 0);
    }

    #[test]
    fn malformed_rows_are_rejected() {
        assert!(OpeningBook::from_tsv_str("").is_err());
        assert!(OpeningBook::from_tsv_str("uci\ne2e4\n").is_err());
        assert!(OpeningBook::from_tsv_str("first_move\tuci\nx\te2e4\n").is_err());
        assert!(OpeningBook::from_tsv_str("first_move\tuci\n0\te2z4\n").is_err());
    }

    #[test]
    fn black_plays_mirrored_moves() {
        let book = OpeningBook::load_default();
        let board = Board::standard();
        let candidates = book.legal_candidates(&board, &SpecialRights::initial(), Team::Black, 0);
        let moves: Vec<Move> = candidates.iter().map(|(m, _)| *m).collect();
        assert!(moves.contains(&mv("e7e5")));
        assert!(moves.contains(&mv("g8f6")));
        assert_eq!(moves.len(), 4);
    }

    #[test]
    fn illegal_candidates_are_filtered() {
        let book = OpeningBook::load_default();
        // The f1 bishop is still hemmed in by the e2 pawn.
        let board = Board::standard();
        let candidates = book.legal_candidates(&board, &SpecialRights::initial(), Team::White, 1);
        let moves: Vec<Move> = candidates.iter().map(|(m, _)| *m).collect();
        assert!(!moves.contains(&mv("f1c4")));
        assert_eq!(moves.len(), 3);

        let opened = parse_placement("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR")
            .expect("placement should parse");
        let candidates = book.legal_candidates(&opened, &SpecialRights::initial(), Team::White, 1);
        assert!(candidates.iter().any(|(m, _)| *m == mv("f1c4")));
    }

    #[test]
    fn choice_is_one_of_the_candidates() {
        let book = OpeningBook::load_default();
        let board = Board::standard();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..16 {
            let chosen = book
                .choose_weighted_move(&board, &SpecialRights::initial(), Team::White, 0, &mut rng)
                .expect("book should choose");
            assert!(["e2e4", "d2d4", "g1f3", "b1c3"].contains(&chosen.to_string().as_str()));
        }
        assert!(book
            .choose_weighted_move(&board, &SpecialRights::initial(), Team::White, 5, &mut rng)
            .is_none());
    }
}
