use std::sync::Arc;
use std::thread;

use crate::game_state::errors::{ChessError, ChessResult};
use crate::game_state::snapshot::BoardSnapshot;
use crate::move_generation::legal_move_apply::MoveKind;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenerator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

pub fn perft<G: MoveGenerator>(generator: &G, snapshot: &BoardSnapshot, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let mut total = PerftCounts::default();
    for mv in generator.generate_legal_moves(snapshot) {
        perft_recurse(generator, &mv, depth, 1, &mut total);
    }
    total
}

/// One thread per root move.
pub fn perft_multi_threaded(
    generator: Arc<dyn MoveGenerator>,
    snapshot: &BoardSnapshot,
    depth: u8,
) -> ChessResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let root_moves = generator.generate_legal_moves(snapshot);
    let mut handles = Vec::with_capacity(root_moves.len());
    for mv in root_moves {
        let generator_ref = Arc::clone(&generator);
        handles.push(thread::spawn(move || {
            let mut local = PerftCounts::default();
            perft_recurse(generator_ref.as_ref(), &mv, depth, 1, &mut local);
            local
        }));
    }

    let mut total = PerftCounts::default();
    for handle in handles {
        let local = handle.join().map_err(|_| ChessError::WorkerDisconnected)?;
        total.merge(local);
    }
    Ok(total)
}

fn perft_recurse<G: MoveGenerator + ?Sized>(
    generator: &G,
    mv: &GeneratedMove,
    search_depth: u8,
    current_depth: u8,
    counts: &mut PerftCounts,
) {
    if current_depth == search_depth {
        counts.nodes += 1;
        if mv.is_capture() {
            counts.captures += 1;
        }
        match mv.kind {
            MoveKind::EnPassant { .. } => counts.en_passant += 1,
            MoveKind::Castle { .. } => counts.castles += 1,
            MoveKind::Promotion => counts.promotions += 1,
            MoveKind::Normal => {}
        }

        let after = &mv.snapshot_after;
        if is_king_in_check(after.board(), after.side_to_move()) {
            counts.checks += 1;
            if generator.generate_legal_moves(after).is_empty() {
                counts.checkmates += 1;
            }
        }
        return;
    }

    for child in generator.generate_legal_moves(&mv.snapshot_after) {
        perft_recurse(generator, &child, search_depth, current_depth + 1, counts);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{perft, perft_multi_threaded, PerftCounts};
    use crate::game_state::snapshot::BoardSnapshot;
    use crate::move_generation::legal_move_generator::LegalMoveGenerator;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn perft_depth_zero_counts_single_node() {
        let counts = perft(&LegalMoveGenerator, &BoardSnapshot::standard(), 0);
        assert_eq!(
            counts,
            PerftCounts {
                nodes: 1,
                ..PerftCounts::default()
            }
        );
    }

    #[test]
    fn start_position_matches_reference_counts() {
        let start = BoardSnapshot::standard();
        assert_eq!(perft(&LegalMoveGenerator, &start, 1).nodes, 20);
        assert_eq!(perft(&LegalMoveGenerator, &start, 2).nodes, 400);

        let depth_three = perft(&LegalMoveGenerator, &start, 3);
        assert_eq!(depth_three.nodes, 8902);
        assert_eq!(depth_three.captures, 34);
        assert_eq!(depth_three.checks, 12);
        assert_eq!(depth_three.checkmates, 0);
    }

    #[test]
    fn castles_and_rook_checks_are_counted() {
        let snapshot = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("fen should parse");
        let counts = perft(&LegalMoveGenerator, &snapshot, 1);
        assert_eq!(counts.nodes, 26);
        assert_eq!(counts.castles, 2);
        assert_eq!(counts.captures, 2);
        assert_eq!(counts.checks, 2);
    }

    #[test]
    fn promotion_and_en_passant_are_counted() {
        let promotion = parse_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("fen should parse");
        let counts = perft(&LegalMoveGenerator, &promotion, 1);
        assert_eq!(counts.nodes, 6);
        assert_eq!(counts.promotions, 1);
        assert_eq!(counts.checks, 1);

        let en_passant = parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("fen should parse");
        let counts = perft(&LegalMoveGenerator, &en_passant, 1);
        assert_eq!(counts.nodes, 7);
        assert_eq!(counts.en_passant, 1);
        assert_eq!(counts.captures, 1);
    }

    #[test]
    fn multi_threaded_matches_single_threaded() {
        let start = BoardSnapshot::standard();
        let threaded = perft_multi_threaded(Arc::new(LegalMoveGenerator), &start, 2)
            .expect("perft workers should finish");
        assert_eq!(threaded, perft(&LegalMoveGenerator, &start, 2));
    }
}
