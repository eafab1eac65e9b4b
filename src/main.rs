use std::env;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use card_chess::cards::card_effects::{play_card, CardOutcome};
use card_chess::cards::card_kind::CardKind;
use card_chess::cards::deck::{Deck, PlayerCards};
use card_chess::cards::pending_effect::{EffectProgress, PendingEffect};
use card_chess::engines::engine_minimax::MinimaxEngine;
use card_chess::engines::turn_controller::{TurnConfig, TurnController, TurnDecision};
use card_chess::game_state::chess_types::Team;
use card_chess::game_state::errors::{ChessError, ChessResult};
use card_chess::game_state::game::Game;
use card_chess::utils::algebraic::{algebraic_to_move, algebraic_to_square};
use card_chess::utils::game_record::write_game_record;
use card_chess::utils::render_board::render_board;

const TICK: Duration = Duration::from_millis(10);

const HELP: &str = "\
commands:
  board                 show the board
  moves <sq>            legal destinations of the piece on <sq>
  move <from><to>       play a move, e.g. move e2e4
  hand                  list your cards
  card <name>           play a card, e.g. card quick-step
  select <sq>           answer a card prompt
  cancel                abandon the pending card (refunded)
  setoption name <n> value <v>
  new                   start over
  record                print the game record
  quit";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let engine_team = match env::args().nth(1).as_deref() {
        Some("white") => Team::White,
        _ => Team::Black,
    };

    let (command_tx, command_rx) = channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if command_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut stdout = io::stdout();
    if let Err(err) = run(engine_team, &command_rx, &mut stdout) {
        eprintln!("driver stopped: {}", err);
    }
}

fn run(engine_team: Team, commands: &Receiver<String>, out: &mut impl Write) -> io::Result<()> {
    let mut table = Table::new(engine_team);
    writeln!(out, "card chess: you play {:?}. type 'help' for commands.", engine_team.opposite())?;
    writeln!(out, "{}", render_board(table.game.board()))?;

    loop {
        while let Ok(line) = commands.try_recv() {
            if table.handle_command(&line, out)? {
                return Ok(());
            }
        }
        table.tick(out)?;
        out.flush()?;
        // Sleep briefly to avoid busy-waiting
        thread::sleep(TICK);
    }
}

struct Table {
    game: Game,
    engine_team: Team,
    controller: TurnController,
    human_cards: PlayerCards,
    engine_cards: PlayerCards,
    pending: Option<PendingEffect>,
    last_turn: Option<u32>,
    rng: StdRng,
}

impl Table {
    fn new(engine_team: Team) -> Self {
        let mut rng = StdRng::from_rng(&mut rand::rng());
        let controller = TurnController::new(
            engine_team,
            Box::new(MinimaxEngine::default()),
            TurnConfig::default(),
        );
        Self {
            game: Game::new(),
            engine_team,
            controller,
            human_cards: PlayerCards::new(Deck::standard_deck(&mut rng)),
            engine_cards: PlayerCards::new(Deck::engine_deck(&mut rng)),
            pending: None,
            last_turn: None,
            rng,
        }
    }

    fn restart(&mut self) -> ChessResult<()> {
        self.controller.new_game()?;
        self.game.reset();
        self.human_cards = PlayerCards::new(Deck::standard_deck(&mut self.rng));
        self.engine_cards = PlayerCards::new(Deck::engine_deck(&mut self.rng));
        self.pending = None;
        self.last_turn = None;
        Ok(())
    }

    fn human_team(&self) -> Team {
        self.engine_team.opposite()
    }

    fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        let mut parts = trimmed.split_whitespace();
        let Some(cmd) = parts.next() else {
            return Ok(false);
        };
        let arg = parts.next().unwrap_or_default();

        let result = match cmd {
            "help" => {
                writeln!(out, "{}", HELP)?;
                Ok(())
            }
            "board" => {
                writeln!(out, "{}", render_board(self.game.board()))?;
                writeln!(out, "{:?} to move, turn {}", self.game.side_to_move(), self.game.turn_number())?;
                Ok(())
            }
            "moves" => self.show_moves(arg, out),
            "move" => self.human_move(arg, out),
            "hand" => {
                let names: Vec<&str> = self.human_cards.hand.cards().iter().map(|c| c.name()).collect();
                writeln!(out, "hand: {}", names.join(", "))?;
                Ok(())
            }
            "card" => self.human_card(arg, out),
            "select" => self.human_select(arg, out),
            "cancel" => self.human_cancel(out),
            "setoption" => self.set_option(trimmed),
            "new" => {
                let result = self.restart();
                writeln!(out, "{}", render_board(self.game.board()))?;
                result
            }
            "record" => {
                write!(out, "{}", write_game_record(&self.game))?;
                Ok(())
            }
            "quit" => {
                self.controller.cancel().ok();
                return Ok(true);
            }
            _ => {
                writeln!(out, "unknown command '{}', try 'help'", cmd)?;
                Ok(())
            }
        };

        if let Err(err) = result {
            writeln!(out, "error: {}", err)?;
        }
        Ok(false)
    }

    fn show_moves(&self, arg: &str, out: &mut impl Write) -> ChessResult<()> {
        let square = algebraic_to_square(arg)?;
        let targets: Vec<String> = self
            .game
            .legal_moves_for(square)
            .iter()
            .map(ToString::to_string)
            .collect();
        writeln!(out, "{}: {}", square, targets.join(" ")).ok();
        Ok(())
    }

    fn human_ready(&self) -> ChessResult<()> {
        if self.controller.interaction_locked() || self.game.side_to_move() != self.human_team() {
            return Err(ChessError::NotYourTurn {
                to_move: self.game.side_to_move(),
            });
        }
        Ok(())
    }

    fn human_move(&mut self, arg: &str, out: &mut impl Write) -> ChessResult<()> {
        self.human_ready()?;
        let mv = algebraic_to_move(arg)?;
        self.game.play_move(mv)?;
        writeln!(out, "{}", render_board(self.game.board())).ok();
        Ok(())
    }

    fn human_card(&mut self, arg: &str, out: &mut impl Write) -> ChessResult<()> {
        self.human_ready()?;
        let card: CardKind = arg.parse()?;
        match play_card(&mut self.game, &mut self.human_cards.hand, card, &mut self.rng)? {
            CardOutcome::TurnContinues => {
                writeln!(out, "{} played, make your move", card).ok();
            }
            CardOutcome::TurnEnded => {
                writeln!(out, "{}", render_board(self.game.board())).ok();
            }
            CardOutcome::AwaitingInput(effect) => {
                writeln!(out, "{}", effect.prompt()).ok();
                self.pending = Some(effect);
            }
        }
        Ok(())
    }

    fn human_select(&mut self, arg: &str, out: &mut impl Write) -> ChessResult<()> {
        let square = algebraic_to_square(arg)?;
        let effect = self.pending.as_mut().ok_or(ChessError::NoEffectPending)?;
        let progress = effect.select(&mut self.game, &mut self.human_cards.hand, square)?;
        self.report_effect(progress, out);
        Ok(())
    }

    fn human_cancel(&mut self, out: &mut impl Write) -> ChessResult<()> {
        let effect = self.pending.as_mut().ok_or(ChessError::NoEffectPending)?;
        let progress = effect.cancel(&mut self.game, &mut self.human_cards.hand)?;
        self.report_effect(progress, out);
        Ok(())
    }

    fn report_effect(&mut self, progress: EffectProgress, out: &mut impl Write) {
        match progress {
            EffectProgress::AwaitingInput => {
                if let Some(effect) = &self.pending {
                    writeln!(out, "{}", effect.prompt()).ok();
                }
            }
            EffectProgress::Resolved => {
                self.pending = None;
                writeln!(out, "{}", render_board(self.game.board())).ok();
            }
            EffectProgress::Cancelled { reason } => {
                self.pending = None;
                writeln!(out, "card cancelled and refunded: {}", reason).ok();
            }
        }
    }

    fn set_option(&mut self, line: &str) -> ChessResult<()> {
        let mut name_tokens = Vec::<&str>::new();
        let mut value_tokens = Vec::<&str>::new();
        let mut mode = "";
        for tok in line.split_whitespace().skip(1) {
            match tok {
                "name" => mode = "name",
                "value" => mode = "value",
                _ if mode == "name" => name_tokens.push(tok),
                _ if mode == "value" => value_tokens.push(tok),
                _ => {}
            }
        }
        self.controller
            .set_option(&name_tokens.join(" "), &value_tokens.join(" "))
    }

    /// One frame: detect turn changes, drive the engine, apply its decision.
    fn tick(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.game.status().is_over() {
            if self.last_turn != Some(self.game.turn_number()) {
                self.last_turn = Some(self.game.turn_number());
                writeln!(out, "game over: {:?}", self.game.status())?;
                write!(out, "{}", write_game_record(&self.game))?;
            }
            return Ok(());
        }

        if let Err(err) = self.step_engine(out) {
            warn!(error = %err, "engine turn failed");
            writeln!(out, "engine error: {}", err)?;
        }
        Ok(())
    }

    fn step_engine(&mut self, out: &mut impl Write) -> ChessResult<()> {
        let turn = self.game.turn_number();
        if self.last_turn != Some(turn) {
            self.last_turn = Some(turn);
            let cards = if self.game.side_to_move() == self.engine_team {
                &mut self.engine_cards
            } else {
                &mut self.human_cards
            };
            cards.on_turn_started();
            self.controller.on_turn_started(&self.game)?;
        } else if self.game.side_to_move() == self.engine_team
            && !self.controller.is_busy()
            && !self.game.effect_pending()
        {
            // Cancelled searches and turn-keeping cards both land here.
            self.controller.start_search(&self.game)?;
        }

        let Some(decision) = self.controller.poll(&self.game, Some(&self.engine_cards.hand))? else {
            return Ok(());
        };
        match decision {
            TurnDecision::PlayMove { mv, score } => {
                self.game.play_move(mv)?;
                writeln!(out, "engine plays {} ({:.2})", mv, score).ok();
                writeln!(out, "{}", render_board(self.game.board())).ok();
            }
            TurnDecision::PlayCard { card, follow_up } => {
                let outcome = play_card(&mut self.game, &mut self.engine_cards.hand, card, &mut self.rng)?;
                writeln!(out, "engine plays card {}", card).ok();
                match (outcome, follow_up) {
                    (CardOutcome::AwaitingInput(mut effect), _) => {
                        effect.cancel(&mut self.game, &mut self.engine_cards.hand)?;
                    }
                    (CardOutcome::TurnContinues, Some(mv)) => {
                        self.game.play_move(mv)?;
                        writeln!(out, "engine plays {}", mv).ok();
                        writeln!(out, "{}", render_board(self.game.board())).ok();
                    }
                    _ => {}
                }
            }
            TurnDecision::NoMove => {
                writeln!(out, "engine has no move").ok();
            }
        }
        Ok(())
    }
}
