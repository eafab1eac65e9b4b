//! Card effects that wait for board selections before resolving.
//!
//! A [`PendingEffect`] is an explicit state machine: it starts awaiting a
//! selection, may ask for a second one, and ends either resolved (the turn
//! passes) or cancelled (the card goes back to the hand). While one exists
//! the game refuses ordinary moves.

use tracing::{info, warn};

use crate::cards::card_kind::CardKind;
use crate::cards::deck::Hand;
use crate::game_state::chess_types::{Move, PieceKind, Square, Team};
use crate::game_state::errors::{ChessError, ChessResult};
use crate::game_state::game::Game;
use crate::move_generation::legal_move_checks::is_king_in_check;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectStage {
    /// Waiting for the piece the card acts on.
    AwaitingPiece,
    /// Piece chosen; waiting for a square that fixes the sweep direction.
    AwaitingDirection { from: Square },
    /// Waiting for any square on the file to use.
    AwaitingFile,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectProgress {
    AwaitingInput,
    Resolved,
    /// The selection was invalid; the card has been refunded.
    Cancelled { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEffect {
    card: CardKind,
    team: Team,
    stage: EffectStage,
}

impl PendingEffect {
    /// `None` for cards that resolve immediately.
    pub fn begin(card: CardKind, team: Team) -> Option<Self> {
        let stage = match card {
            CardKind::PoisonedPiece | CardKind::RookSweep | CardKind::DivineIntervention => {
                EffectStage::AwaitingPiece
            }
            CardKind::Arise => EffectStage::AwaitingFile,
            _ => return None,
        };
        Some(Self { card, team, stage })
    }

    pub fn card(&self) -> CardKind {
        self.card
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn stage(&self) -> EffectStage {
        self.stage
    }

    pub fn is_finished(&self) -> bool {
        self.stage == EffectStage::Finished
    }

    /// What the player is asked to select next.
    pub fn prompt(&self) -> &'static str {
        match (self.card, self.stage) {
            (_, EffectStage::Finished) => "effect finished",
            (CardKind::PoisonedPiece, _) => "select an allied piece to poison",
            (CardKind::RookSweep, EffectStage::AwaitingPiece) => "select an allied rook",
            (CardKind::RookSweep, _) => "select a square in a straight line from the rook",
            (CardKind::DivineIntervention, EffectStage::AwaitingPiece) => {
                "select an allied bishop"
            }
            (CardKind::DivineIntervention, _) => "select a square diagonal from the bishop",
            (CardKind::Arise, _) => "select the file to revive a pawn on",
            _ => "no selection needed",
        }
    }

    /// Feed one board selection to the effect.
    pub fn select(
        &mut self,
        game: &mut Game,
        hand: &mut Hand,
        square: Square,
    ) -> ChessResult<EffectProgress> {
        if self.is_finished() || !game.effect_pending() {
            return Err(ChessError::NoEffectPending);
        }

        let step = match (self.card, self.stage) {
            (CardKind::PoisonedPiece, EffectStage::AwaitingPiece) => self.poison(game, square),
            (CardKind::RookSweep, EffectStage::AwaitingPiece) => {
                self.pick_sweeper(game, square, PieceKind::Rook)
            }
            (CardKind::DivineIntervention, EffectStage::AwaitingPiece) => {
                self.pick_sweeper(game, square, PieceKind::Bishop)
            }
            (CardKind::RookSweep | CardKind::DivineIntervention, EffectStage::AwaitingDirection { from }) => {
                self.sweep(game, from, square)
            }
            (CardKind::Arise, EffectStage::AwaitingFile) => self.arise(game, square),
            _ => Err("unexpected selection".to_owned()),
        };

        match step {
            Ok(EffectProgress::Resolved) => {
                self.stage = EffectStage::Finished;
                game.set_effect_pending(false);
                info!(card = %self.card, team = ?self.team, "card effect resolved");
                game.end_turn();
                Ok(EffectProgress::Resolved)
            }
            Ok(progress) => Ok(progress),
            Err(reason) => Ok(self.abort(game, hand, reason)),
        }
    }

    /// Abandon the effect and refund the card.
    pub fn cancel(&mut self, game: &mut Game, hand: &mut Hand) -> ChessResult<EffectProgress> {
        if self.is_finished() {
            return Err(ChessError::NoEffectPending);
        }
        Ok(self.abort(game, hand, "cancelled by player".to_owned()))
    }

    fn abort(&mut self, game: &mut Game, hand: &mut Hand, reason: String) -> EffectProgress {
        warn!(card = %self.card, %reason, "card effect cancelled, card refunded");
        self.stage = EffectStage::Finished;
        game.set_effect_pending(false);
        game.modifiers_mut().can_capture_allied = false;
        hand.refund(self.card);
        EffectProgress::Cancelled { reason }
    }

    fn poison(&mut self, game: &mut Game, square: Square) -> Result<EffectProgress, String> {
        let team = self.team;
        let piece = game
            .board_mut()
            .piece_at_mut(square)
            .filter(|p| p.team == team)
            .ok_or_else(|| format!("{square} does not hold an allied piece"))?;
        piece.poisoned = true;
        Ok(EffectProgress::Resolved)
    }

    fn pick_sweeper(
        &mut self,
        game: &Game,
        square: Square,
        kind: PieceKind,
    ) -> Result<EffectProgress, String> {
        match game.board().piece_at(square) {
            Some(p) if p.team == self.team && p.kind == kind => {
                self.stage = EffectStage::AwaitingDirection { from: square };
                Ok(EffectProgress::AwaitingInput)
            }
            _ => Err(format!("{square} does not hold an allied {kind:?}")),
        }
    }

    /// Move the sweeper one square at a time to the board edge, taking
    /// whatever stands in the way (allies included), then remove it.
    fn sweep(&mut self, game: &mut Game, from: Square, toward: Square) -> Result<EffectProgress, String> {
        let (dx, dy) = sweep_direction(self.card, from, toward)
            .ok_or_else(|| format!("{toward} is not a valid direction from {from}"))?;

        game.modifiers_mut().can_capture_allied = true;
        let mut at = from;
        let mut alive = true;
        while let Some(next) = at.offset(dx, dy) {
            match game.relocate_piece(Move::new(at, next)) {
                Ok(applied) if applied.mover_destroyed => {
                    alive = false;
                    break;
                }
                Ok(_) => at = next,
                Err(err) => {
                    game.modifiers_mut().can_capture_allied = false;
                    return Err(err.to_string());
                }
            }
        }
        game.modifiers_mut().can_capture_allied = false;

        if alive {
            game.board_mut().remove(at);
        }
        Ok(EffectProgress::Resolved)
    }

    /// Revive a pawn on the team's pawn start rank of the selected file.
    fn arise(&mut self, game: &mut Game, square: Square) -> Result<EffectProgress, String> {
        let target = square.with_rank(self.team.pawn_start_rank());
        if !game.board().is_empty(target) {
            return Err(format!("{target} is not empty"));
        }
        game.board_mut().place(PieceKind::Pawn, self.team, target);
        if is_king_in_check(game.board(), self.team) {
            game.board_mut().remove(target);
            return Err("reviving the pawn would leave the king in check".to_owned());
        }
        Ok(EffectProgress::Resolved)
    }
}

/// Unit step from `from` toward `toward`: orthogonal for the rook sweep,
/// diagonal for divine intervention.
fn sweep_direction(card: CardKind, from: Square, toward: Square) -> Option<(i8, i8)> {
    let dx = toward.file() as i8 - from.file() as i8;
    let dy = toward.rank() as i8 - from.rank() as i8;
    if dx == 0 && dy == 0 {
        return None;
    }
    let valid = match card {
        CardKind::RookSweep => dx == 0 || dy == 0,
        CardKind::DivineIntervention => dx.abs() == dy.abs(),
        _ => false,
    };
    valid.then_some((dx.signum(), dy.signum()))
}
