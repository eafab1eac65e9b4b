//! Evaluation weights and the fixed constants behind search heuristics.
//!
//! Scores are expressed in pawns.

use crate::game_state::chess_types::Square;

pub const MATE_SCORE: f32 = 10_000.0;
/// Returned when one king is gone from the board.
pub const KING_MISSING_SCORE: f32 = 999_999.0;

pub const QUIESCENCE_DEPTH: u8 = 6;
pub const MIN_SEARCH_DEPTH: u8 = 1;
pub const MAX_SEARCH_DEPTH: u8 = 3;

// Move ordering.
pub const PREVIOUS_BEST_BONUS: f32 = 10_000.0;
pub const KING_CAPTURE_SCORE: f32 = 50_000.0;
pub const CAPTURE_MULTIPLIER: f32 = 10.0;
pub const PROMOTION_BONUS: f32 = 8.0;
pub const CENTER_MULTIPLIER: f32 = 0.1;
pub const DEVELOPMENT_BONUS: f32 = 1.5;
pub const CHECK_BONUS: f32 = 3.0;
pub const CASTLE_BONUS: f32 = 2.0;
pub const ATTACKED_DESTINATION_FACTOR: f32 = 0.5;

// Positional terms.
pub const CENTER_SQUARE_BONUS: f32 = 4.0;
pub const PAWN_SHIELD_BONUS: f32 = 0.5;
pub const KING_EXPOSURE_PENALTY: f32 = 0.3;
pub const DOUBLED_PAWN_PENALTY: f32 = 0.5;
pub const UNSUPPORTED_PAWN_PENALTY: f32 = 0.5;
pub const PASSED_PAWN_BASE_VALUE: f32 = 1.0;
pub const MOBILITY_MULTIPLIER: f32 = 0.1;
pub const CENTER_PAWN_OCCUPANCY: f32 = 0.3;
pub const CENTER_PIECE_OCCUPANCY: f32 = 0.2;
pub const CENTER_CONTROL_BONUS: f32 = 0.1;
pub const COORDINATION_VALUE: f32 = 0.1;

// Endgame.
pub const ENDGAME_MATERIAL_THRESHOLD: i32 = 20;
pub const ENDGAME_ADVANTAGE_THRESHOLD: f32 = 3.0;
pub const KING_ACTIVITY_MULTIPLIER: f32 = 0.2;
pub const ENEMY_KING_EDGE_MULTIPLIER: f32 = 0.3;
pub const KING_DISTANCE_MULTIPLIER: f32 = 0.2;
pub const PASSED_PAWN_ENDGAME_VALUE: f32 = 2.0;
pub const PASSED_PAWN_ENDGAME_MULTIPLIER: f32 = 2.0;

pub const CENTER_SQUARES: [(u8, u8); 4] = [(3, 3), (3, 4), (4, 3), (4, 4)];

/// Centrality of a square: 3 on the central four, negative in the corners.
#[inline]
pub fn center_value(square: Square) -> f32 {
    CENTER_SQUARE_BONUS - square.center_distance()
}

/// Per-term multipliers of the evaluator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalWeights {
    pub material: f32,
    pub positional: f32,
    pub king_safety: f32,
    pub mobility: f32,
    pub pawn_structure: f32,
    pub center_control: f32,
    pub coordination: f32,
    pub endgame: f32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            material: 1.0,
            positional: 0.6,
            king_safety: 1.0,
            mobility: 0.4,
            pawn_structure: 0.5,
            center_control: 0.3,
            coordination: 0.4,
            endgame: 0.8,
        }
    }
}

impl EvalWeights {
    /// Everything but material switched off.
    pub const fn material_only() -> Self {
        Self {
            material: 1.0,
            positional: 0.0,
            king_safety: 0.0,
            mobility: 0.0,
            pawn_structure: 0.0,
            center_control: 0.0,
            coordination: 0.0,
            endgame: 0.0,
        }
    }
}
