//! Playing a card: hand bookkeeping plus the effects that resolve at once.

use rand::{seq::IndexedRandom, Rng};
use tracing::{debug, info, warn};

use crate::cards::card_kind::CardKind;
use crate::cards::deck::Hand;
use crate::cards::pending_effect::PendingEffect;
use crate::game_state::chess_types::{Move, PieceKind, Square, Team};
use crate::game_state::errors::{ChessError, ChessResult};
use crate::game_state::game::Game;
use crate::moves::piece_moves::piece_moves;

/// How the turn stands after a card was played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOutcome {
    /// The player still makes a normal move this turn.
    TurnContinues,
    TurnEnded,
    /// Board selections are needed; see [`PendingEffect::select`].
    AwaitingInput(PendingEffect),
}

/// Play `card` from `hand` for the side to move. A card whose effect cannot
/// apply is put back in the hand and reported as [`ChessError::CardRejected`].
pub fn play_card<R: Rng + ?Sized>(
    game: &mut Game,
    hand: &mut Hand,
    card: CardKind,
    rng: &mut R,
) -> ChessResult<CardOutcome> {
    if game.effect_pending() {
        return Err(ChessError::EffectPending);
    }
    if game.status().is_over() {
        return Err(ChessError::GameOver);
    }
    hand.take(card)?;

    let team = game.side_to_move();
    match resolve_card(game, card, team, rng) {
        Ok(outcome) => {
            info!(%card, ?team, ?outcome, "card played");
            Ok(outcome)
        }
        Err(err) => {
            warn!(%card, error = %err, "card refunded");
            hand.refund(card);
            Err(err)
        }
    }
}

fn resolve_card<R: Rng + ?Sized>(
    game: &mut Game,
    card: CardKind,
    team: Team,
    rng: &mut R,
) -> ChessResult<CardOutcome> {
    if let Some(effect) = PendingEffect::begin(card, team) {
        game.set_effect_pending(true);
        return Ok(CardOutcome::AwaitingInput(effect));
    }

    match card {
        CardKind::MagicStorm => {
            game.modifiers_mut().set_move_cap(2, 2);
            Ok(CardOutcome::TurnContinues)
        }
        CardKind::StrategicJump => {
            game.modifiers_mut().can_jump[team.index()] = true;
            Ok(CardOutcome::TurnContinues)
        }
        CardKind::Teleport => {
            game.modifiers_mut().can_teleport[team.index()] = true;
            Ok(CardOutcome::TurnContinues)
        }
        CardKind::QuickStep => {
            quick_step(game, team)?;
            game.end_turn();
            Ok(CardOutcome::TurnEnded)
        }
        CardKind::Chaos => {
            chaos(game, rng)?;
            game.end_turn();
            Ok(CardOutcome::TurnEnded)
        }
        CardKind::UncoordinatedAttack => {
            uncoordinated_attack(game, team, rng)?;
            game.end_turn();
            Ok(CardOutcome::TurnEnded)
        }
        CardKind::PoisonedPiece | CardKind::RookSweep | CardKind::DivineIntervention | CardKind::Arise => {
            Err(ChessError::CardRejected {
                card,
                reason: "deferred card without a selection state".to_owned(),
            })
        }
    }
}

fn team_squares(game: &Game, team: Team, kind: Option<PieceKind>) -> Vec<Square> {
    game.board()
        .team_pieces(team)
        .filter(|p| kind.is_none_or(|k| p.kind == k))
        .map(|p| p.square)
        .collect()
}

/// Every allied pawn advances as far straight ahead as its moves allow.
fn quick_step(game: &mut Game, team: Team) -> ChessResult<()> {
    let pawns = team_squares(game, team, Some(PieceKind::Pawn));
    if pawns.is_empty() {
        return Err(ChessError::CardRejected {
            card: CardKind::QuickStep,
            reason: "no pawns to move".to_owned(),
        });
    }

    let forward = i32::from(team.forward());
    for from in pawns {
        let Some(pawn) = game.board().piece_at(from) else {
            continue;
        };
        let furthest = piece_moves(game.board(), pawn)
            .into_iter()
            .filter(|to| to.file() == from.file())
            .max_by_key(|to| (i32::from(to.rank()) - i32::from(from.rank())) * forward);
        if let Some(to) = furthest {
            game.execute_move(Move::new(from, to))?;
        }
    }
    Ok(())
}

/// Every piece on the board, both teams, lands on a random empty square.
fn chaos<R: Rng + ?Sized>(game: &mut Game, rng: &mut R) -> ChessResult<()> {
    let origins: Vec<Square> = game.board().pieces().map(|p| p.square).collect();
    let mut moved = 0u64;
    for from in origins {
        if moved & from.bit() != 0 {
            continue;
        }
        let empty: Vec<Square> = Square::all().filter(|sq| game.board().is_empty(*sq)).collect();
        let Some(&to) = empty.choose(rng) else {
            break;
        };
        game.relocate_piece(Move::new(from, to))?;
        moved |= to.bit();
    }
    debug!(pieces = moved.count_ones(), "chaos scattered the board");
    Ok(())
}

/// Every allied piece plays a random one of its moves.
fn uncoordinated_attack<R: Rng + ?Sized>(game: &mut Game, team: Team, rng: &mut R) -> ChessResult<()> {
    let origins = team_squares(game, team, None);
    let mut landed = 0u64;
    for from in origins {
        if landed & from.bit() != 0 {
            continue;
        }
        let Some(piece) = game.board().piece_at(from).filter(|p| p.team == team) else {
            continue;
        };
        let moves = piece_moves(game.board(), piece);
        let Some(&to) = moves.choose(rng) else {
            continue;
        };
        game.execute_move(Move::new(from, to))?;
        landed |= to.bit();
    }
    Ok(())
}
