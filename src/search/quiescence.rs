//! Capture-only extension below the main search horizon.

use crate::game_state::snapshot::BoardSnapshot;
use crate::move_generation::move_generator::MoveGenerator;
use crate::search::board_scoring::BoardScorer;
use crate::search::iterative_deepening::SearchContext;
use crate::search::move_ordering::order_captures_mvv_lva;

/// Fail-soft quiescence search. The side to move maximises when it is the
/// context's perspective team. Returns `None` once cancellation is seen.
pub fn quiescence<G: MoveGenerator, S: BoardScorer>(
    ctx: &mut SearchContext<'_, G, S>,
    snapshot: &BoardSnapshot,
    mut alpha: f32,
    mut beta: f32,
    depth: u8,
) -> Option<f32> {
    ctx.checkpoint()?;

    let stand_pat = ctx.evaluate(snapshot);
    if depth == 0 {
        return Some(stand_pat);
    }

    let maximizing = ctx.is_maximizing(snapshot);
    if maximizing {
        if stand_pat >= beta {
            return Some(stand_pat);
        }
        alpha = alpha.max(stand_pat);
    } else {
        if stand_pat <= alpha {
            return Some(stand_pat);
        }
        beta = beta.min(stand_pat);
    }

    let mut captures = ctx.generator.generate_captures(snapshot);
    order_captures_mvv_lva(&mut captures);

    let mut best = stand_pat;
    for capture in &captures {
        let score = quiescence(ctx, &capture.snapshot_after, alpha, beta, depth - 1)?;
        if maximizing {
            best = best.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        } else {
            best = best.min(score);
            beta = beta.min(score);
            if beta <= alpha {
                break;
            }
        }
    }
    Some(best)
}
