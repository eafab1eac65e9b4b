//! Heuristic move ordering for alpha-beta.
//!
//! Scores are from the mover's point of view and only decide visiting
//! order; they never feed back into evaluation.

use crate::game_state::chess_types::{Move, PieceKind};
use crate::game_state::snapshot::BoardSnapshot;
use crate::move_generation::legal_move_checks::{is_king_in_check, is_square_attacked};
use crate::move_generation::move_generator::GeneratedMove;
use crate::search::eval_constants::{
    center_value, ATTACKED_DESTINATION_FACTOR, CAPTURE_MULTIPLIER, CASTLE_BONUS, CENTER_MULTIPLIER,
    CHECK_BONUS, DEVELOPMENT_BONUS, KING_CAPTURE_SCORE, PREVIOUS_BEST_BONUS, PROMOTION_BONUS,
};

pub fn score_move(
    snapshot: &BoardSnapshot,
    generated: &GeneratedMove,
    previous_best: Option<Move>,
) -> f32 {
    let board = snapshot.board();
    let mv = generated.mv;
    let Some(mover) = board.piece_at(mv.from) else {
        return 0.0;
    };

    let mut score = 0.0;
    if previous_best == Some(mv) {
        score += PREVIOUS_BEST_BONUS;
    }

    if let Some(target) = board.piece_at(mv.to) {
        if target.kind == PieceKind::King {
            return KING_CAPTURE_SCORE;
        }
        score += target.kind.value() * CAPTURE_MULTIPLIER;
        score += target.kind.value() - mover.kind.value();
    }

    if mover.kind == PieceKind::Pawn && mv.to.rank() == mover.team.promotion_rank() {
        score += PROMOTION_BONUS;
    }

    score += center_value(mv.to) * CENTER_MULTIPLIER;

    if !matches!(mover.kind, PieceKind::Pawn | PieceKind::King)
        && mv.from.rank() == mover.team.back_rank()
    {
        score += DEVELOPMENT_BONUS;
    }

    let after = generated.snapshot_after.board();
    let enemy = mover.team.opposite();
    if is_king_in_check(after, enemy) {
        score += CHECK_BONUS;
    }
    if is_square_attacked(after, mv.to, enemy) {
        score -= mover.kind.value() * ATTACKED_DESTINATION_FACTOR;
    }

    if mover.kind == PieceKind::King && mv.file_delta().abs() == 2 {
        score += CASTLE_BONUS;
    }
    score
}

/// Sort `moves` best-first for the side to move of `snapshot`.
pub fn order_moves(
    snapshot: &BoardSnapshot,
    moves: &mut Vec<GeneratedMove>,
    previous_best: Option<Move>,
) {
    let mut keyed: Vec<(f32, GeneratedMove)> = moves
        .drain(..)
        .map(|generated| (score_move(snapshot, &generated, previous_best), generated))
        .collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    moves.extend(keyed.into_iter().map(|(_, generated)| generated));
}

/// Most valuable victim first, cheapest attacker breaking ties.
pub fn order_captures_mvv_lva(captures: &mut [GeneratedMove]) {
    let key = |generated: &GeneratedMove| {
        let victim = generated.captured.map_or(0.0, PieceKind::value);
        victim - generated.mover.value()
    };
    captures.sort_by(|a, b| key(b).total_cmp(&key(a)));
}

#[cfg(test)]
mod tests {
    use super::{order_captures_mvv_lva, order_moves, score_move};
    use crate::game_state::chess_types::{Move, PieceKind, Square};
    use crate::move_generation::legal_move_generator::LegalMoveGenerator;
    use crate::move_generation::move_generator::MoveGenerator;
    use crate::utils::fen_parser::parse_fen;

    fn sq(file: i32, rank: i32) -> Square {
        Square::new(file, rank).expect("test square should be valid")
    }

    #[test]
    fn previous_best_move_is_searched_first() {
        let snapshot = parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("fen should parse");
        let mut moves = LegalMoveGenerator.generate_legal_moves(&snapshot);
        let favourite = Move::new(sq(0, 1), sq(0, 2));
        order_moves(&snapshot, &mut moves, Some(favourite));
        assert_eq!(moves[0].mv, favourite);
    }

    #[test]
    fn queen_capture_outranks_quiet_moves() {
        let snapshot = parse_fen("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1").expect("fen should parse");
        let mut moves = LegalMoveGenerator.generate_legal_moves(&snapshot);
        order_moves(&snapshot, &mut moves, None);
        assert_eq!(moves[0].mv, Move::new(sq(3, 1), sq(3, 4)));
    }

    #[test]
    fn hanging_destination_is_penalised() {
        let snapshot = parse_fen("4k3/8/8/4p3/8/8/8/Q3K3 w - - 0 1").expect("fen should parse");
        let moves = LegalMoveGenerator.generate_legal_moves(&snapshot);
        let find = |to: Square| {
            moves
                .iter()
                .find(|m| m.mv.from == sq(0, 0) && m.mv.to == to)
                .copied()
                .expect("queen move should be generated")
        };
        // d4 is covered by the e5 pawn, c3 is not; both sit at the same
        // distance from the center band.
        let attacked = score_move(&snapshot, &find(sq(3, 3)), None);
        let safe = score_move(&snapshot, &find(sq(2, 2)), None);
        assert!(attacked < safe);
    }

    #[test]
    fn mvv_lva_prefers_cheap_attacker_on_big_victim() {
        let snapshot =
            parse_fen("4k3/8/8/2r1q3/3P4/8/8/3QK3 w - - 0 1").expect("fen should parse");
        let mut captures = LegalMoveGenerator.generate_captures(&snapshot);
        order_captures_mvv_lva(&mut captures);
        assert_eq!(captures[0].mover, PieceKind::Pawn);
        assert_eq!(captures[0].captured, Some(PieceKind::Queen));
    }
}
