//! En passant, castling and promotion.
//!
//! Castling and en passant add destinations to a piece's candidate list;
//! all three are recognised afterwards by classifying a chosen destination.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Move, Piece, PieceKind, Square};
use crate::game_state::special_rights::{king_home, rook_home, CastleSide, SpecialRights};
use crate::move_generation::legal_move_apply::MoveKind;

/// Append castling and en-passant destinations for `piece`.
pub fn special_destinations(
    board: &Board,
    rights: &SpecialRights,
    piece: Piece,
    out: &mut Vec<Square>,
) {
    match piece.kind {
        PieceKind::Pawn => {
            if let Some(target) = en_passant_target(board, rights, piece) {
                out.push(target);
            }
        }
        PieceKind::King => {
            for side in CastleSide::ALL {
                if castle_available(board, rights, piece, side) {
                    out.push(Square::on_rank(
                        side.king_target_file(),
                        piece.team.back_rank(),
                    ));
                }
            }
        }
        _ => {}
    }
}

/// Diagonal destination behind an enemy pawn that just double-pushed beside
/// `pawn`.
pub fn en_passant_target(board: &Board, rights: &SpecialRights, pawn: Piece) -> Option<Square> {
    let landed = rights.double_push()?;
    if landed.rank() != pawn.square.rank() || landed.file().abs_diff(pawn.square.file()) != 1 {
        return None;
    }
    let victim = board.piece_at(landed)?;
    if victim.kind != PieceKind::Pawn || victim.team == pawn.team {
        return None;
    }
    let target = landed.offset(0, pawn.team.forward())?;
    board.is_empty(target).then_some(target)
}

fn castle_available(board: &Board, rights: &SpecialRights, king: Piece, side: CastleSide) -> bool {
    let team = king.team;
    if king.square != king_home(team) || !rights.can_castle(team, side) {
        return false;
    }
    let rook_ok = board
        .piece_at(rook_home(team, side))
        .is_some_and(|p| p.kind == PieceKind::Rook && p.team == team);
    rook_ok
        && side
            .between_files()
            .iter()
            .all(|&file| board.is_empty(Square::on_rank(file, team.back_rank())))
}

/// Decide how `mv` resolves on `board`.
pub fn classify_move(board: &Board, rights: &SpecialRights, mv: Move) -> MoveKind {
    let Some(piece) = board.piece_at(mv.from) else {
        return MoveKind::Normal;
    };

    match piece.kind {
        PieceKind::Pawn => {
            if mv.to.rank() == piece.team.promotion_rank() {
                return MoveKind::Promotion;
            }
            let diagonal_step =
                mv.file_delta().abs() == 1 && mv.rank_delta() == piece.team.forward();
            if diagonal_step
                && board.is_empty(mv.to)
                && en_passant_target(board, rights, piece) == Some(mv.to)
            {
                return MoveKind::EnPassant {
                    captured: mv.to.with_rank(mv.from.rank()),
                };
            }
            MoveKind::Normal
        }
        PieceKind::King => {
            let side = CastleSide::from_king_target(mv.to.file());
            match side {
                Some(side)
                    if mv.from == king_home(piece.team)
                        && mv.to.rank() == mv.from.rank()
                        && castle_available(board, rights, piece, side) =>
                {
                    let rank = piece.team.back_rank();
                    MoveKind::Castle {
                        rook_from: rook_home(piece.team, side),
                        rook_to: Square::on_rank(side.rook_target_file(), rank),
                    }
                }
                _ => MoveKind::Normal,
            }
        }
        _ => MoveKind::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_move, special_destinations};
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{Move, PieceKind, Square, Team};
    use crate::game_state::special_rights::{CastleSide, SpecialRights};
    use crate::move_generation::legal_move_apply::MoveKind;

    fn sq(file: i32, rank: i32) -> Square {
        Square::new(file, rank).expect("test square should be valid")
    }

    fn castling_board() -> Board {
        let mut board = Board::empty();
        board.place(PieceKind::King, Team::White, sq(4, 0));
        board.place(PieceKind::Rook, Team::White, sq(0, 0));
        board.place(PieceKind::Rook, Team::White, sq(7, 0));
        board.place(PieceKind::King, Team::Black, sq(4, 7));
        board
    }

    #[test]
    fn unmoved_king_gets_both_castling_destinations() {
        let board = castling_board();
        let king = board.piece_at(sq(4, 0)).expect("king");
        let mut out = Vec::new();
        special_destinations(&board, &SpecialRights::initial(), king, &mut out);
        out.sort();
        assert_eq!(out, vec![sq(2, 0), sq(6, 0)]);
    }

    #[test]
    fn castling_blocked_by_piece_or_lost_right() {
        let mut board = castling_board();
        board.place(PieceKind::Knight, Team::White, sq(1, 0));
        let mut rights = SpecialRights::initial();
        rights.set_castle(Team::White, CastleSide::KingSide, false);

        let king = board.piece_at(sq(4, 0)).expect("king");
        let mut out = Vec::new();
        special_destinations(&board, &rights, king, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn castle_classification_moves_rook_beside_king() {
        let board = castling_board();
        let kind = classify_move(&board, &SpecialRights::initial(), Move::new(sq(4, 0), sq(2, 0)));
        assert_eq!(
            kind,
            MoveKind::Castle {
                rook_from: sq(0, 0),
                rook_to: sq(3, 0),
            }
        );
    }

    #[test]
    fn en_passant_only_right_after_double_push() {
        let mut board = Board::empty();
        board.place(PieceKind::Pawn, Team::White, sq(4, 4));
        board.place(PieceKind::Pawn, Team::Black, sq(3, 4));
        let pawn = board.piece_at(sq(4, 4)).expect("white pawn");

        let mut rights = SpecialRights::none();
        let mut out = Vec::new();
        special_destinations(&board, &rights, pawn, &mut out);
        assert!(out.is_empty());

        rights.set_double_push(Some(sq(3, 4)));
        special_destinations(&board, &rights, pawn, &mut out);
        assert_eq!(out, vec![sq(3, 5)]);
        assert_eq!(
            classify_move(&board, &rights, Move::new(sq(4, 4), sq(3, 5))),
            MoveKind::EnPassant { captured: sq(3, 4) }
        );
    }

    #[test]
    fn pawn_reaching_last_rank_promotes() {
        let mut board = Board::empty();
        board.place(PieceKind::Pawn, Team::White, sq(2, 6));
        board.place(PieceKind::Rook, Team::Black, sq(1, 7));
        let rights = SpecialRights::none();
        assert_eq!(
            classify_move(&board, &rights, Move::new(sq(2, 6), sq(2, 7))),
            MoveKind::Promotion
        );
        assert_eq!(
            classify_move(&board, &rights, Move::new(sq(2, 6), sq(1, 7))),
            MoveKind::Promotion
        );
    }
}
