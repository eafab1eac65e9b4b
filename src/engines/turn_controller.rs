//! Drives the engine's side of the game across turns.
//!
//! On "turn started" the controller cancels whatever it was still doing,
//! snapshots the game, locks human interaction and hands the snapshot to a
//! [`SearchWorker`]. The caller polls once per frame; when the search is done
//! and a random think delay has passed, the lock is released and a
//! [`TurnDecision`] comes back. Applying the decision is the caller's job.

use std::mem;
use std::thread;
use std::time::{Duration, Instant};

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info};

use crate::cards::card_kind::CardKind;
use crate::cards::card_scoring::{best_card, PlayedThisTurn, CARD_PREFERENCE_THRESHOLD};
use crate::cards::deck::Hand;
use crate::engines::engine_trait::{Engine, EngineOutput, EngineReply, SearchRequest};
use crate::engines::search_worker::SearchWorker;
use crate::game_state::chess_types::{Move, Team};
use crate::game_state::errors::{ChessError, ChessResult};
use crate::game_state::game::Game;
use crate::move_generation::legal_move_checks::is_king_in_check;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, PartialEq)]
pub struct TurnConfig {
    pub think_delay_min: Duration,
    pub think_delay_max: Duration,
    /// A card is played only when it beats the searched move by more than this.
    pub card_threshold: f32,
    pub seed: Option<u64>,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            think_delay_min: Duration::from_millis(400),
            think_delay_max: Duration::from_millis(800),
            card_threshold: CARD_PREFERENCE_THRESHOLD,
            seed: None,
        }
    }
}

impl TurnConfig {
    /// No think delay; for tests and batch play.
    pub fn instant() -> Self {
        Self {
            think_delay_min: Duration::ZERO,
            think_delay_max: Duration::ZERO,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnDecision {
    PlayMove { mv: Move, score: f32 },
    /// Play `card`, then `follow_up` if there is one.
    PlayCard { card: CardKind, follow_up: Option<Move> },
    NoMove,
}

enum Phase {
    Idle,
    Searching(SearchWorker),
    Thinking {
        ready_at: Instant,
        decision: TurnDecision,
    },
}

pub struct TurnController {
    team: Team,
    engine: Option<Box<dyn Engine>>,
    config: TurnConfig,
    phase: Phase,
    interaction_locked: bool,
    engine_moves: u32,
    played: PlayedThisTurn,
    rng: StdRng,
}

impl TurnController {
    pub fn new(team: Team, engine: Box<dyn Engine>, config: TurnConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            team,
            engine: Some(engine),
            config,
            phase: Phase::Idle,
            interaction_locked: false,
            engine_moves: 0,
            played: PlayedThisTurn::default(),
            rng,
        }
    }

    pub fn team(&self) -> Team {
        self.team
    }

    /// True while the engine is thinking; human input should be ignored.
    pub fn interaction_locked(&self) -> bool {
        self.interaction_locked
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    pub fn engine_moves(&self) -> u32 {
        self.engine_moves
    }

    pub fn new_game(&mut self) -> ChessResult<()> {
        self.cancel()?;
        self.engine_moves = 0;
        self.played = PlayedThisTurn::default();
        self.engine_mut()?.new_game();
        Ok(())
    }

    pub fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        self.cancel()?;
        self.engine_mut()?.set_option(name, value)
    }

    fn engine_mut(&mut self) -> ChessResult<&mut Box<dyn Engine>> {
        self.engine.as_mut().ok_or(ChessError::WorkerDisconnected)
    }

    /// Turn-started hook. Returns whether a search was launched.
    pub fn on_turn_started(&mut self, game: &Game) -> ChessResult<bool> {
        self.cancel()?;
        if game.side_to_move() != self.team {
            return Ok(false);
        }
        self.played = PlayedThisTurn::default();
        self.start_search(game)
    }

    /// Search the current position again within the same turn, e.g. after a
    /// card that keeps the turn.
    pub fn start_search(&mut self, game: &Game) -> ChessResult<bool> {
        if game.effect_pending() {
            return Err(ChessError::EffectPending);
        }
        if game.side_to_move() != self.team || game.status().is_over() {
            return Ok(false);
        }
        self.cancel()?;

        let engine = self.engine.take().ok_or(ChessError::WorkerDisconnected)?;
        let request = SearchRequest {
            depth: None,
            engine_move_number: self.engine_moves,
        };
        let worker = SearchWorker::spawn(engine, game.snapshot(), request);
        self.phase = Phase::Searching(worker);
        self.interaction_locked = true;
        debug!(team = ?self.team, turn = game.turn_number(), "engine turn started");
        Ok(true)
    }

    /// Non-blocking step. `hand` is the engine's hand when cards are in play.
    pub fn poll(&mut self, game: &Game, hand: Option<&Hand>) -> ChessResult<Option<TurnDecision>> {
        if let Phase::Searching(worker) = &mut self.phase {
            let finished = match worker.poll() {
                Ok(finished) => finished,
                Err(err) => {
                    self.release();
                    return Err(err);
                }
            };
            let Some(result) = finished else {
                return Ok(None);
            };
            self.engine = Some(result.engine);

            match result.reply {
                EngineReply::Cancelled => {
                    info!("engine search cancelled, no decision this time");
                    self.release();
                    return Ok(None);
                }
                EngineReply::Ready(output) => {
                    let decision = self.decide(&output, game, hand);
                    let delay = self.think_delay();
                    debug!(?decision, delay_ms = delay.as_millis() as u64, "engine decided");
                    self.phase = Phase::Thinking {
                        ready_at: Instant::now() + delay,
                        decision,
                    };
                }
            }
        }

        if let Phase::Thinking { ready_at, .. } = &self.phase {
            if Instant::now() < *ready_at {
                return Ok(None);
            }
            if let Phase::Thinking { decision, .. } = mem::replace(&mut self.phase, Phase::Idle) {
                self.interaction_locked = false;
                self.note_decision(&decision);
                return Ok(Some(decision));
            }
        }
        Ok(None)
    }

    /// Poll until a decision arrives or the controller goes idle.
    pub fn wait_for_decision(
        &mut self,
        game: &Game,
        hand: Option<&Hand>,
    ) -> ChessResult<Option<TurnDecision>> {
        loop {
            if let Some(decision) = self.poll(game, hand)? {
                return Ok(Some(decision));
            }
            if !self.is_busy() {
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Stop any in-flight search and drop a decision not yet delivered.
    pub fn cancel(&mut self) -> ChessResult<()> {
        let phase = mem::replace(&mut self.phase, Phase::Idle);
        self.interaction_locked = false;
        if let Phase::Searching(mut worker) = phase {
            worker.cancel();
            let result = worker.wait()?;
            self.engine = Some(result.engine);
        }
        Ok(())
    }

    fn release(&mut self) {
        self.phase = Phase::Idle;
        self.interaction_locked = false;
    }

    fn decide(&self, output: &EngineOutput, game: &Game, hand: Option<&Hand>) -> TurnDecision {
        let in_check = is_king_in_check(game.board(), self.team);
        if let Some(hand) = hand.filter(|_| !output.from_book && !in_check) {
            let choice = best_card(game.board(), &game.rights(), self.team, hand, self.played);
            if let Some(choice) = choice {
                if choice.score > output.score + self.config.card_threshold {
                    info!(card = %choice.card, card_score = choice.score, move_score = output.score, "engine prefers a card");
                    return TurnDecision::PlayCard {
                        card: choice.card,
                        follow_up: choice.follow_up,
                    };
                }
            }
        }
        match output.best_move {
            Some(mv) => TurnDecision::PlayMove {
                mv,
                score: output.score,
            },
            None => TurnDecision::NoMove,
        }
    }

    fn note_decision(&mut self, decision: &TurnDecision) {
        match decision {
            TurnDecision::PlayMove { .. } => self.engine_moves += 1,
            TurnDecision::PlayCard { card, .. } => self.played.record(*card),
            TurnDecision::NoMove => {}
        }
    }

    fn think_delay(&mut self) -> Duration {
        let min = self.config.think_delay_min.as_millis() as u64;
        let max = self.config.think_delay_max.as_millis() as u64;
        if max <= min {
            return self.config.think_delay_min;
        }
        Duration::from_millis(self.rng.random_range(min..=max))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{TurnConfig, TurnController, TurnDecision};
    use crate::cards::card_kind::CardKind;
    use crate::cards::deck::Hand;
    use crate::engines::engine_minimax::{EngineConfig, MinimaxEngine};
    use crate::game_state::chess_types::Team;
    use crate::game_state::errors::ChessError;
    use crate::game_state::game::Game;
    use crate::utils::algebraic::algebraic_to_move;
    use crate::utils::fen_parser::parse_placement;

    fn controller(team: Team, use_book: bool) -> TurnController {
        let engine = MinimaxEngine::new(EngineConfig {
            depth: 1,
            use_book,
            seed: Some(5),
            ..EngineConfig::default()
        });
        let config = TurnConfig {
            seed: Some(5),
            ..TurnConfig::instant()
        };
        TurnController::new(team, Box::new(engine), config)
    }

    #[test]
    fn search_locks_interaction_until_decision() {
        let game = Game::new();
        let mut ctl = controller(Team::White, true);
        assert!(ctl.on_turn_started(&game).expect("turn should start"));
        assert!(ctl.interaction_locked());

        let decision = ctl
            .wait_for_decision(&game, None)
            .expect("search should finish")
            .expect("a decision should arrive");
        assert!(matches!(decision, TurnDecision::PlayMove { .. }));
        assert!(!ctl.interaction_locked());
        assert!(!ctl.is_busy());
        assert_eq!(ctl.engine_moves(), 1);
    }

    #[test]
    fn other_sides_turn_starts_nothing() {
        let game = Game::new();
        let mut ctl = controller(Team::Black, true);
        assert!(!ctl.on_turn_started(&game).expect("hook should succeed"));
        assert!(!ctl.interaction_locked());
    }

    #[test]
    fn pending_effect_refuses_to_search() {
        let mut game = Game::new();
        game.set_effect_pending(true);
        let mut ctl = controller(Team::White, true);
        assert!(matches!(ctl.on_turn_started(&game), Err(ChessError::EffectPending)));
        assert!(!ctl.interaction_locked());
    }

    #[test]
    fn card_is_preferred_when_far_behind() {
        let board = parse_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR")
            .expect("placement should parse");
        let game = Game::from_position(board, Team::White);
        let mut hand = Hand::new();
        hand.add(CardKind::MagicStorm);
        let mut ctl = controller(Team::White, false);

        ctl.on_turn_started(&game).expect("turn should start");
        let decision = ctl
            .wait_for_decision(&game, Some(&hand))
            .expect("search should finish")
            .expect("a decision should arrive");
        assert_eq!(
            decision,
            TurnDecision::PlayCard {
                card: CardKind::MagicStorm,
                follow_up: None
            }
        );

        // Magic storm counts once per turn; the next search plays a move.
        ctl.start_search(&game).expect("search should restart");
        let decision = ctl
            .wait_for_decision(&game, Some(&hand))
            .expect("search should finish")
            .expect("a decision should arrive");
        assert!(matches!(decision, TurnDecision::PlayMove { .. }));
    }

    #[test]
    fn no_cards_while_in_check() {
        let mut game = Game::new();
        for text in ["f2f3", "e7e5", "a2a3", "d8h4"] {
            game.play_move(algebraic_to_move(text).expect("move should parse"))
                .expect("opening move should be legal");
        }
        let mut hand = Hand::new();
        hand.add(CardKind::MagicStorm);
        let mut ctl = controller(Team::White, false);
        ctl.on_turn_started(&game).expect("turn should start");
        let decision = ctl
            .wait_for_decision(&game, Some(&hand))
            .expect("search should finish")
            .expect("a decision should arrive");
        let TurnDecision::PlayMove { mv, .. } = decision else {
            panic!("a move is required while in check");
        };
        assert_eq!(mv.to_string(), "g2g3");
    }

    #[test]
    fn cancel_recovers_the_engine() {
        let game = Game::new();
        let mut ctl = controller(Team::White, false);
        ctl.on_turn_started(&game).expect("turn should start");
        ctl.cancel().expect("cancel should recover the engine");
        assert!(!ctl.is_busy());
        assert!(!ctl.interaction_locked());
        assert!(ctl.start_search(&game).expect("engine should be back"));
        assert!(ctl
            .wait_for_decision(&game, None)
            .expect("search should finish")
            .is_some());
    }

    #[test]
    fn think_delay_stays_in_range() {
        let engine = MinimaxEngine::default();
        let mut ctl = TurnController::new(
            Team::White,
            Box::new(engine),
            TurnConfig {
                seed: Some(1),
                ..TurnConfig::default()
            },
        );
        for _ in 0..20 {
            let delay = ctl.think_delay();
            assert!(delay >= Duration::from_millis(400) && delay <= Duration::from_millis(800));
        }
    }
}
