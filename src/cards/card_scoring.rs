//! Engine-side hand evaluation: how much each card in hand is worth right
//! now, on the same pawn scale as search scores.

use crate::cards::card_kind::CardKind;
use crate::cards::deck::Hand;
use crate::game_state::board::Board;
use crate::game_state::chess_types::{Move, PieceKind, Team};
use crate::game_state::special_rights::SpecialRights;
use crate::move_generation::legal_move_generator::{leaves_king_in_check, legal_moves_for_team};
use crate::search::board_scoring::is_passed_pawn;

/// A card must beat the searched move by more than this to be played.
pub const CARD_PREFERENCE_THRESHOLD: f32 = 1.0;
pub const MIN_PAWN_PUSHES_FOR_QUICK_STEP: usize = 2;
pub const QUICK_STEP_PAWN_BONUS: f32 = 0.25;
pub const PASSED_PAWN_BONUS: f32 = 1.0;
pub const NO_JUMP_CAPTURE_SCORE: f32 = -1.5;
pub const MIN_JUMP_GAIN: f32 = 0.1;
/// Score of a card that must not be played now.
pub const UNPLAYABLE_SCORE: f32 = -900.0;
/// Score of cards the engine does not know how to use.
pub const UNSCORED_CARD: f32 = -200.0;

/// Cards limited to one play per turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayedThisTurn {
    pub magic_storm: bool,
    pub strategic_jump: bool,
}

impl PlayedThisTurn {
    pub fn record(&mut self, card: CardKind) {
        match card {
            CardKind::MagicStorm => self.magic_storm = true,
            CardKind::StrategicJump => self.strategic_jump = true,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardChoice {
    pub card: CardKind,
    pub score: f32,
    /// Move to play right after the card (the jump capture for StrategicJump).
    pub follow_up: Option<Move>,
}

/// Highest-scoring card in `hand`; ties keep the earlier card.
pub fn best_card(
    board: &Board,
    rights: &SpecialRights,
    team: Team,
    hand: &Hand,
    played: PlayedThisTurn,
) -> Option<CardChoice> {
    let mut best: Option<CardChoice> = None;
    for &card in hand.cards() {
        let (score, follow_up) = score_card(board, rights, team, card, played);
        if best.is_none_or(|b| score > b.score) {
            best = Some(CardChoice {
                card,
                score,
                follow_up,
            });
        }
    }
    best
}

pub fn score_card(
    board: &Board,
    rights: &SpecialRights,
    team: Team,
    card: CardKind,
    played: PlayedThisTurn,
) -> (f32, Option<Move>) {
    match card {
        CardKind::QuickStep => (score_quick_step(board, rights, team), None),
        CardKind::StrategicJump if played.strategic_jump => (UNPLAYABLE_SCORE, None),
        CardKind::StrategicJump => score_strategic_jump(board, rights, team),
        CardKind::MagicStorm if played.magic_storm => (UNPLAYABLE_SCORE, None),
        CardKind::MagicStorm => (score_magic_storm(board, team), None),
        _ => (UNSCORED_CARD, None),
    }
}

fn score_quick_step(board: &Board, rights: &SpecialRights, team: Team) -> f32 {
    let pushes = board
        .team_pieces(team)
        .filter(|p| p.kind == PieceKind::Pawn)
        .filter(|p| {
            p.square.offset(0, team.forward()).is_some_and(|one| {
                board.is_empty(one) && !leaves_king_in_check(board, rights, Move::new(p.square, one))
            })
        })
        .count();
    if pushes < MIN_PAWN_PUSHES_FOR_QUICK_STEP {
        return UNPLAYABLE_SCORE;
    }

    let passed = board
        .team_pieces(team)
        .filter(|p| p.kind == PieceKind::Pawn && is_passed_pawn(board, p.square, team))
        .count();
    QUICK_STEP_PAWN_BONUS * pushes as f32 + PASSED_PAWN_BONUS * passed as f32
}

/// Best capture only reachable by jumping, with the move that makes it.
fn score_strategic_jump(board: &Board, rights: &SpecialRights, team: Team) -> (f32, Option<Move>) {
    let mut jumping = *board;
    jumping.modifiers.can_jump[team.index()] = true;

    let mut gain = 0.0f32;
    let mut best_move = None;
    for mv in legal_moves_for_team(&jumping, rights, team) {
        let value = board
            .piece_at(mv.to)
            .filter(|p| p.team != team)
            .map_or(0.0, |p| p.kind.value());
        if value > gain && looks_like_jump(board, mv) {
            gain = value;
            best_move = Some(mv);
        }
    }

    if gain > MIN_JUMP_GAIN {
        (gain, best_move)
    } else {
        (NO_JUMP_CAPTURE_SCORE, None)
    }
}

/// A slider passing over an occupied square, or a pawn double push over one.
fn looks_like_jump(board: &Board, mv: Move) -> bool {
    let Some(piece) = board.piece_at(mv.from) else {
        return false;
    };
    if piece.kind.is_slider() {
        let (dx, dy) = (mv.file_delta().signum(), mv.rank_delta().signum());
        let mut cursor = mv.from;
        while let Some(next) = cursor.offset(dx, dy) {
            if next == mv.to {
                break;
            }
            if !board.is_empty(next) {
                return true;
            }
            cursor = next;
        }
        return false;
    }
    piece.kind == PieceKind::Pawn
        && mv.rank_delta().abs() == 2
        && mv
            .from
            .offset(0, piece.team.forward())
            .is_some_and(|over| !board.is_empty(over))
}

/// Worth playing only when more than a pawn down.
fn score_magic_storm(board: &Board, team: Team) -> f32 {
    let material = |t: Team| -> f32 { board.team_pieces(t).map(|p| p.kind.value()).sum() };
    if material(team) < material(team.opposite()) - 1.0 {
        2.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::{best_card, score_card, PlayedThisTurn, UNPLAYABLE_SCORE, UNSCORED_CARD};
    use crate::cards::card_kind::CardKind;
    use crate::cards::deck::Hand;
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::Team;
    use crate::game_state::special_rights::SpecialRights;
    use crate::utils::fen_parser::parse_placement;

    fn score(board: &Board, team: Team, card: CardKind) -> f32 {
        score_card(board, &SpecialRights::none(), team, card, PlayedThisTurn::default()).0
    }

    #[test]
    fn quick_step_counts_pushes_and_passed_pawns() {
        let board = Board::standard();
        let start = score_card(
            &board,
            &SpecialRights::initial(),
            Team::White,
            CardKind::QuickStep,
            PlayedThisTurn::default(),
        )
        .0;
        assert!((start - 2.0).abs() < 1e-6, "got {start}");

        // Two pushable pawns, the a-pawn passed.
        let board = parse_placement("4k3/7p/8/8/8/8/P6P/4K3").expect("placement should parse");
        assert!((score(&board, Team::White, CardKind::QuickStep) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn quick_step_needs_two_pushes() {
        let board = parse_placement("4k3/8/8/8/8/8/P7/4K3").expect("placement should parse");
        assert_eq!(score(&board, Team::White, CardKind::QuickStep), UNPLAYABLE_SCORE);
    }

    #[test]
    fn strategic_jump_finds_capture_behind_a_blocker() {
        // The a1 rook can only reach the a8 queen by jumping the a4 pawn.
        let board = parse_placement("q3k3/8/8/8/P7/8/8/R3K3").expect("placement should parse");
        let (value, follow_up) = score_card(
            &board,
            &SpecialRights::none(),
            Team::White,
            CardKind::StrategicJump,
            PlayedThisTurn::default(),
        );
        assert!((value - 9.0).abs() < 1e-6);
        assert_eq!(follow_up.map(|m| m.to_string()).as_deref(), Some("a1a8"));
    }

    #[test]
    fn strategic_jump_sees_pawns_behind_the_start_ranks() {
        // Rook and queen can hop their own pawn and take one on the seventh rank.
        let (value, follow_up) = score_card(
            &Board::standard(),
            &SpecialRights::initial(),
            Team::White,
            CardKind::StrategicJump,
            PlayedThisTurn::default(),
        );
        assert!((value - 1.0).abs() < 1e-6);
        assert!(follow_up.is_some());
    }

    #[test]
    fn strategic_jump_without_target_scores_low() {
        let lone_rook = parse_placement("4k3/8/8/8/8/8/8/R3K3").expect("placement should parse");
        assert_eq!(score(&lone_rook, Team::White, CardKind::StrategicJump), -1.5);
        let played = PlayedThisTurn {
            strategic_jump: true,
            ..PlayedThisTurn::default()
        };
        let (value, _) = score_card(
            &Board::standard(),
            &SpecialRights::initial(),
            Team::White,
            CardKind::StrategicJump,
            played,
        );
        assert_eq!(value, UNPLAYABLE_SCORE);
    }

    #[test]
    fn magic_storm_only_when_behind() {
        assert_eq!(score(&Board::standard(), Team::White, CardKind::MagicStorm), -1.0);
        let behind = parse_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR")
            .expect("placement should parse");
        assert_eq!(score(&behind, Team::White, CardKind::MagicStorm), 2.0);
        assert_eq!(score(&behind, Team::Black, CardKind::MagicStorm), -1.0);
    }

    #[test]
    fn unknown_cards_are_never_preferred() {
        assert_eq!(score(&Board::standard(), Team::White, CardKind::Chaos), UNSCORED_CARD);

        let mut hand = Hand::new();
        hand.add(CardKind::Chaos);
        hand.add(CardKind::MagicStorm);
        let behind = parse_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR")
            .expect("placement should parse");
        let choice = best_card(
            &behind,
            &SpecialRights::initial(),
            Team::White,
            &hand,
            PlayedThisTurn::default(),
        )
        .expect("a card should be chosen");
        assert_eq!(choice.card, CardKind::MagicStorm);
        assert!(best_card(
            &behind,
            &SpecialRights::initial(),
            Team::White,
            &Hand::new(),
            PlayedThisTurn::default()
        )
        .is_none());
    }
}
