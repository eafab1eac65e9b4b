//! Legal move generation: pseudo-legal candidates plus special destinations,
//! filtered by simulating each one and testing the mover's king.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Move, Piece, Square, Team};
use crate::game_state::snapshot::BoardSnapshot;
use crate::game_state::special_rights::SpecialRights;
use crate::move_generation::legal_move_apply::{make_temporary_move, undo_temporary_move};
use crate::move_generation::legal_move_checks::is_square_attacked_with;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenerator};
use crate::move_generation::special_moves::{classify_move, special_destinations};
use crate::moves::piece_moves::pseudo_legal_moves;

/// Reusable buffers for a batch of legality checks.
struct LegalityScratch {
    board: Board,
    attacks: Vec<Square>,
}

impl LegalityScratch {
    fn new(board: &Board) -> Self {
        Self {
            board: *board,
            attacks: Vec::with_capacity(32),
        }
    }

    /// Simulate `mv` and report whether `team`'s king ends up attacked.
    /// A team without a king is never "in check"; that case is a terminal
    /// condition its callers handle.
    fn exposes_king(&mut self, rights: &SpecialRights, mv: Move, team: Team) -> bool {
        let kind = classify_move(&self.board, rights, mv);
        let Some(undo) = make_temporary_move(&mut self.board, mv, kind) else {
            return false;
        };
        let exposed = match self.board.king_square(team) {
            Some(king) => {
                is_square_attacked_with(&self.board, king, team.opposite(), &mut self.attacks)
            }
            None => false,
        };
        undo_temporary_move(&mut self.board, undo);
        exposed
    }
}

/// Would playing `mv` leave the mover's own king attacked?
pub fn leaves_king_in_check(board: &Board, rights: &SpecialRights, mv: Move) -> bool {
    let Some(piece) = board.piece_at(mv.from) else {
        return false;
    };
    LegalityScratch::new(board).exposes_king(rights, mv, piece.team)
}

fn candidate_destinations(
    board: &Board,
    rights: &SpecialRights,
    piece: Piece,
    out: &mut Vec<Square>,
) {
    out.clear();
    pseudo_legal_moves(board, piece, out);
    special_destinations(board, rights, piece, out);

    // Teleport squares can repeat ordinary destinations.
    let mut seen = 0u64;
    out.retain(|sq| {
        let fresh = seen & sq.bit() == 0;
        seen |= sq.bit();
        fresh
    });
}

fn legal_destinations_with(
    board: &Board,
    rights: &SpecialRights,
    piece: Piece,
    scratch: &mut LegalityScratch,
    out: &mut Vec<Square>,
) {
    candidate_destinations(board, rights, piece, out);
    out.retain(|&to| !scratch.exposes_king(rights, Move::new(piece.square, to), piece.team));
}

/// Legal destinations for whatever stands on `from` (empty when nothing does).
pub fn legal_destinations(board: &Board, rights: &SpecialRights, from: Square) -> Vec<Square> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };
    let mut scratch = LegalityScratch::new(board);
    let mut out = Vec::with_capacity(32);
    legal_destinations_with(board, rights, piece, &mut scratch, &mut out);
    out
}

/// All legal moves of `team`.
pub fn legal_moves_for_team(board: &Board, rights: &SpecialRights, team: Team) -> Vec<Move> {
    let mut scratch = LegalityScratch::new(board);
    let mut buffer = Vec::with_capacity(32);
    let mut moves = Vec::with_capacity(48);
    for piece in board.team_pieces(team) {
        legal_destinations_with(board, rights, piece, &mut scratch, &mut buffer);
        moves.extend(buffer.iter().map(|&to| Move::new(piece.square, to)));
    }
    moves
}

/// Cheaper than generating everything: stops at the first legal move.
pub fn has_legal_move(board: &Board, rights: &SpecialRights, team: Team) -> bool {
    let mut scratch = LegalityScratch::new(board);
    let mut buffer = Vec::with_capacity(32);
    board.team_pieces(team).any(|piece| {
        candidate_destinations(board, rights, piece, &mut buffer);
        buffer
            .iter()
            .any(|&to| !scratch.exposes_king(rights, Move::new(piece.square, to), team))
    })
}

/// The rules engine's generator for search and perft.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, snapshot: &BoardSnapshot) -> Vec<GeneratedMove> {
        let board = snapshot.board();
        legal_moves_for_team(board, snapshot.rights(), snapshot.side_to_move())
            .into_iter()
            .filter_map(|mv| {
                let mover = board.piece_at(mv.from)?.kind;
                let (snapshot_after, applied) = snapshot.make_move(mv);
                Some(GeneratedMove {
                    mv,
                    kind: applied.kind,
                    mover,
                    captured: applied.captured.map(|p| p.kind),
                    snapshot_after,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{legal_destinations, legal_moves_for_team, leaves_king_in_check};
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{Move, PieceKind, Square, Team};
    use crate::game_state::snapshot::BoardSnapshot;
    use crate::game_state::special_rights::SpecialRights;
    use crate::move_generation::legal_move_generator::LegalMoveGenerator;
    use crate::move_generation::move_generator::MoveGenerator;
    use crate::moves::piece_moves::piece_moves;

    fn sq(file: i32, rank: i32) -> Square {
        Square::new(file, rank).expect("test square should be valid")
    }

    #[test]
    fn start_position_has_twenty_legal_moves() {
        let board = Board::standard();
        let moves = legal_moves_for_team(&board, &SpecialRights::initial(), Team::White);
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let mut board = Board::empty();
        board.place(PieceKind::King, Team::White, sq(4, 0));
        board.place(PieceKind::Knight, Team::White, sq(4, 1));
        board.place(PieceKind::Rook, Team::Black, sq(4, 7));
        let rights = SpecialRights::none();

        assert!(legal_destinations(&board, &rights, sq(4, 1)).is_empty());
        assert!(leaves_king_in_check(&board, &rights, Move::new(sq(4, 1), sq(2, 2))));
    }

    #[test]
    fn teleport_legal_set_is_superset_and_covers_safe_empty_squares() {
        let mut board = Board::standard();
        board.relocate(sq(4, 1), sq(4, 3));
        let rights = SpecialRights::none();
        let plain = legal_destinations(&board, &rights, sq(6, 0));

        board.modifiers.can_teleport[Team::White.index()] = true;
        let teleport = legal_destinations(&board, &rights, sq(6, 0));

        assert!(plain.iter().all(|sq| teleport.contains(sq)));
        for square in Square::all().filter(|s| board.is_empty(*s)) {
            let mv = Move::new(sq(6, 0), square);
            if !leaves_king_in_check(&board, &rights, mv) {
                assert!(teleport.contains(&square), "missing teleport square {square}");
            }
        }
    }

    #[test]
    fn legality_filter_leaves_board_untouched() {
        let mut board = Board::standard();
        board.relocate(sq(5, 1), sq(5, 2));
        board.relocate(sq(3, 7), sq(7, 3));
        let before = board;
        let _ = legal_moves_for_team(&board, &SpecialRights::initial(), Team::White);
        assert_eq!(board, before);
    }

    #[test]
    fn generator_reports_captures_and_child_positions() {
        let mut board = Board::empty();
        board.place(PieceKind::King, Team::White, sq(0, 0));
        board.place(PieceKind::King, Team::Black, sq(7, 7));
        board.place(PieceKind::Rook, Team::White, sq(3, 0));
        board.place(PieceKind::Queen, Team::Black, sq(3, 5));
        let snapshot = BoardSnapshot::new(board, Team::White, SpecialRights::none());

        let captures = LegalMoveGenerator.generate_captures(&snapshot);
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].captured, Some(PieceKind::Queen));
        assert_eq!(captures[0].snapshot_after.side_to_move(), Team::Black);
        assert_eq!(piece_moves(&board, board.piece_at(sq(3, 0)).expect("rook")).len(), 11);
    }
}
