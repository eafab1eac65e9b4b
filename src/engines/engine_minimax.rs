//! The opponent engine: opening book for the first few moves, then
//! iterative-deepening minimax over the full evaluator.

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

use crate::engines::engine_trait::{Engine, EngineOutput, EngineReply, SearchRequest};
use crate::game_state::chess_types::Move;
use crate::game_state::errors::{ChessError, ChessResult};
use crate::game_state::snapshot::BoardSnapshot;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::search::board_scoring::Evaluator;
use crate::search::cancellation::CancellationToken;
use crate::search::eval_constants::{EvalWeights, QUIESCENCE_DEPTH};
use crate::search::iterative_deepening::{iterative_deepening_search, SearchConfig, SearchOutcome};
use crate::tables::opening_book::OpeningBook;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub depth: u8,
    pub quiescence_depth: u8,
    pub weights: EvalWeights,
    pub use_book: bool,
    /// The book is consulted while the engine has played fewer moves than this.
    pub book_max_moves: u32,
    /// Fixed seed for the book choice; `None` draws one from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: 2,
            quiescence_depth: QUIESCENCE_DEPTH,
            weights: EvalWeights::default(),
            use_book: true,
            book_max_moves: 6,
            seed: None,
        }
    }
}

pub struct MinimaxEngine {
    config: EngineConfig,
    evaluator: Evaluator,
    book: OpeningBook,
    rng: StdRng,
}

impl Default for MinimaxEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl MinimaxEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_book(config, OpeningBook::load_default())
    }

    pub fn with_book(config: EngineConfig, book: OpeningBook) -> Self {
        Self {
            evaluator: Evaluator::new(config.weights),
            rng: seeded_rng(config.seed),
            config,
            book,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn book_move(&mut self, snapshot: &BoardSnapshot, engine_move: u32) -> Option<Move> {
        if !self.config.use_book || engine_move >= self.config.book_max_moves {
            return None;
        }
        let board = snapshot.board();
        let team = snapshot.side_to_move();
        if is_king_in_check(board, team) {
            return None;
        }
        self.book
            .choose_weighted_move(board, snapshot.rights(), team, engine_move, &mut self.rng)
    }

    fn set_weight(&mut self, name: &str, value: &str) -> ChessResult<bool> {
        let slot = match name.to_ascii_lowercase().as_str() {
            "materialweight" => &mut self.config.weights.material,
            "positionalweight" => &mut self.config.weights.positional,
            "kingsafetyweight" => &mut self.config.weights.king_safety,
            "mobilityweight" => &mut self.config.weights.mobility,
            "pawnstructureweight" => &mut self.config.weights.pawn_structure,
            "centercontrolweight" => &mut self.config.weights.center_control,
            "coordinationweight" => &mut self.config.weights.coordination,
            "endgameweight" => &mut self.config.weights.endgame,
            _ => return Ok(false),
        };
        *slot = parse_option(name, value)?;
        self.evaluator = Evaluator::new(self.config.weights);
        Ok(true)
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

fn parse_option<T: std::str::FromStr>(name: &str, value: &str) -> ChessResult<T> {
    value.trim().parse::<T>().map_err(|_| ChessError::InvalidOption {
        name: name.to_owned(),
        value: value.to_owned(),
    })
}

fn is_truthy(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    matches!(v.as_str(), "true" | "1" | "yes" | "on")
}

impl Engine for MinimaxEngine {
    fn new_game(&mut self) {
        self.rng = seeded_rng(self.config.seed);
    }

    fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        if name.eq_ignore_ascii_case("OwnBook") {
            self.config.use_book = is_truthy(value);
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Depth") {
            self.config.depth = parse_option(name, value)?;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("QuiescenceDepth") {
            self.config.quiescence_depth = parse_option(name, value)?;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("BookMoves") {
            self.config.book_max_moves = parse_option(name, value)?;
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Seed") {
            let seed: u64 = parse_option(name, value)?;
            self.config.seed = Some(seed);
            self.rng = StdRng::seed_from_u64(seed);
            return Ok(());
        }
        if self.set_weight(name, value)? {
            return Ok(());
        }
        Err(ChessError::UnknownOption(name.to_owned()))
    }

    fn choose_move(
        &mut self,
        snapshot: &BoardSnapshot,
        request: &SearchRequest,
        cancel: &CancellationToken,
    ) -> EngineReply {
        if cancel.is_cancelled() {
            return EngineReply::Cancelled;
        }

        if let Some(book_move) = self.book_move(snapshot, request.engine_move_number) {
            info!(mv = %book_move, engine_move = request.engine_move_number, "opening book hit");
            return EngineReply::Ready(EngineOutput {
                best_move: Some(book_move),
                from_book: true,
                info_lines: vec!["info string opening book move".to_owned()],
                ..EngineOutput::default()
            });
        }

        let config = SearchConfig {
            max_depth: request.depth.unwrap_or(self.config.depth),
            quiescence_depth: self.config.quiescence_depth,
            cancel: Some(cancel.clone()),
        };
        let result = match iterative_deepening_search(
            snapshot,
            &LegalMoveGenerator,
            &self.evaluator,
            &config,
        ) {
            SearchOutcome::Completed(result) => result,
            SearchOutcome::Cancelled => return EngineReply::Cancelled,
        };

        let pv = result
            .best_move
            .map_or_else(|| "(none)".to_owned(), |mv| mv.to_string());
        let mut out = EngineOutput {
            best_move: result.best_move,
            score: result.score,
            from_book: false,
            depth: result.reached_depth,
            nodes: result.nodes,
            info_lines: Vec::with_capacity(2),
        };
        out.info_lines.push(format!(
            "info depth {} score {:.2} nodes {} pv {}",
            result.reached_depth, result.score, result.nodes, pv
        ));
        out.info_lines.push(format!(
            "info string used_depth {} requested_depth {}",
            result.reached_depth,
            config.effective_depth()
        ));
        debug!(info = ?out.info_lines, "engine output ready");
        EngineReply::Ready(out)
    }
}
