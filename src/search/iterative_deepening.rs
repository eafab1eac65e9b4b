//! Iterative deepening search with minimax alpha-beta pruning.
//!
//! Each iteration searches the root moves to a fixed depth, reusing the
//! previous iteration's best move as the first candidate. Leaves hand over to
//! quiescence search. Scores are always from the root side's perspective:
//! that side maximises, its opponent minimises.

use tracing::{debug, info};

use crate::game_state::chess_types::{Move, Team};
use crate::game_state::snapshot::BoardSnapshot;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::move_generator::MoveGenerator;
use crate::search::board_scoring::BoardScorer;
use crate::search::cancellation::CancellationToken;
use crate::search::eval_constants::{
    MATE_SCORE, MAX_SEARCH_DEPTH, MIN_SEARCH_DEPTH, QUIESCENCE_DEPTH,
};
use crate::search::move_ordering::order_moves;
use crate::search::quiescence::quiescence;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub quiescence_depth: u8,
    pub cancel: Option<CancellationToken>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            quiescence_depth: QUIESCENCE_DEPTH,
            cancel: None,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(max_depth: u8) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// Depth actually searched: the configured depth limited to 1..=3.
    #[inline]
    pub fn effective_depth(&self) -> u8 {
        self.max_depth.clamp(MIN_SEARCH_DEPTH, MAX_SEARCH_DEPTH)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchResult {
    /// `None` when the root side has no legal move.
    pub best_move: Option<Move>,
    pub score: f32,
    pub reached_depth: u8,
    pub nodes: u64,
}

/// A cancelled search has no result at all, not even a partial one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchOutcome {
    Completed(SearchResult),
    Cancelled,
}

impl SearchOutcome {
    pub fn completed(self) -> Option<SearchResult> {
        match self {
            SearchOutcome::Completed(result) => Some(result),
            SearchOutcome::Cancelled => None,
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchOutcome::Cancelled)
    }
}

/// Per-search state threaded through the recursion.
pub struct SearchContext<'a, G: MoveGenerator, S: BoardScorer> {
    pub(crate) generator: &'a G,
    scorer: &'a S,
    perspective: Team,
    cancel: Option<&'a CancellationToken>,
    nodes: u64,
}

impl<'a, G: MoveGenerator, S: BoardScorer> SearchContext<'a, G, S> {
    pub fn new(
        generator: &'a G,
        scorer: &'a S,
        perspective: Team,
        cancel: Option<&'a CancellationToken>,
    ) -> Self {
        Self {
            generator,
            scorer,
            perspective,
            cancel,
            nodes: 0,
        }
    }

    /// Count a node, or `None` once the search has been cancelled.
    #[inline]
    pub(crate) fn checkpoint(&mut self) -> Option<()> {
        if self.cancel.is_some_and(CancellationToken::is_cancelled) {
            return None;
        }
        self.nodes += 1;
        Some(())
    }

    #[inline]
    pub(crate) fn evaluate(&self, snapshot: &BoardSnapshot) -> f32 {
        self.scorer.score(snapshot, self.perspective)
    }

    #[inline]
    pub(crate) fn is_maximizing(&self, snapshot: &BoardSnapshot) -> bool {
        snapshot.side_to_move() == self.perspective
    }

    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }
}

pub fn iterative_deepening_search<G: MoveGenerator, S: BoardScorer>(
    snapshot: &BoardSnapshot,
    generator: &G,
    scorer: &S,
    config: &SearchConfig,
) -> SearchOutcome {
    let perspective = snapshot.side_to_move();
    let mut ctx = SearchContext::new(generator, scorer, perspective, config.cancel.as_ref());
    let max_depth = config.effective_depth();
    let mut result = SearchResult::default();

    for depth in 1..=max_depth {
        let Some((best_move, score)) =
            search_root(&mut ctx, snapshot, depth, config.quiescence_depth, result.best_move)
        else {
            info!(depth, nodes = ctx.nodes(), "search cancelled");
            return SearchOutcome::Cancelled;
        };

        result = SearchResult {
            best_move,
            score,
            reached_depth: depth,
            nodes: ctx.nodes(),
        };
        debug!(
            depth,
            score,
            nodes = result.nodes,
            best_move = ?best_move.map(|mv| mv.to_string()),
            "search iteration complete"
        );

        if best_move.is_none() {
            break;
        }
    }

    info!(
        depth = result.reached_depth,
        score = result.score,
        nodes = result.nodes,
        best_move = ?result.best_move.map(|mv| mv.to_string()),
        "search finished"
    );
    SearchOutcome::Completed(result)
}

fn search_root<G: MoveGenerator, S: BoardScorer>(
    ctx: &mut SearchContext<'_, G, S>,
    snapshot: &BoardSnapshot,
    depth: u8,
    quiescence_depth: u8,
    previous_best: Option<Move>,
) -> Option<(Option<Move>, f32)> {
    ctx.checkpoint()?;

    let mut moves = ctx.generator.generate_legal_moves(snapshot);
    if moves.is_empty() {
        return Some((None, terminal_score(snapshot, true, depth)));
    }
    order_moves(snapshot, &mut moves, previous_best);

    // No cutoffs at the root: every move gets an exact score against alpha.
    let mut alpha = f32::NEG_INFINITY;
    let mut best: Option<Move> = None;
    for generated in &moves {
        let score = minimax(
            ctx,
            &generated.snapshot_after,
            depth - 1,
            alpha,
            f32::INFINITY,
            quiescence_depth,
        )?;
        if best.is_none() || score > alpha {
            alpha = score;
            best = Some(generated.mv);
        }
    }
    Some((best, alpha))
}

fn minimax<G: MoveGenerator, S: BoardScorer>(
    ctx: &mut SearchContext<'_, G, S>,
    snapshot: &BoardSnapshot,
    depth: u8,
    mut alpha: f32,
    mut beta: f32,
    quiescence_depth: u8,
) -> Option<f32> {
    ctx.checkpoint()?;

    if depth == 0 {
        return quiescence(ctx, snapshot, alpha, beta, quiescence_depth);
    }

    let maximizing = ctx.is_maximizing(snapshot);
    let mut moves = ctx.generator.generate_legal_moves(snapshot);
    if moves.is_empty() {
        return Some(terminal_score(snapshot, maximizing, depth));
    }
    order_moves(snapshot, &mut moves, None);

    if maximizing {
        let mut best = f32::NEG_INFINITY;
        for generated in &moves {
            let eval = minimax(
                ctx,
                &generated.snapshot_after,
                depth - 1,
                alpha,
                beta,
                quiescence_depth,
            )?;
            best = best.max(eval);
            alpha = alpha.max(eval);
            if beta <= alpha {
                break;
            }
        }
        Some(best)
    } else {
        let mut best = f32::INFINITY;
        for generated in &moves {
            let eval = minimax(
                ctx,
                &generated.snapshot_after,
                depth - 1,
                alpha,
                beta,
                quiescence_depth,
            )?;
            best = best.min(eval);
            beta = beta.min(eval);
            if beta <= alpha {
                break;
            }
        }
        Some(best)
    }
}

/// Score of a node without legal moves: zero for stalemate, otherwise
/// `MATE_SCORE - depth_remaining` signed against the mated side.
fn terminal_score(snapshot: &BoardSnapshot, maximizing: bool, depth_remaining: u8) -> f32 {
    if !is_king_in_check(snapshot.board(), snapshot.side_to_move()) {
        return 0.0;
    }
    let mate = MATE_SCORE - f32::from(depth_remaining);
    if maximizing {
        -mate
    } else {
        mate
    }
}
