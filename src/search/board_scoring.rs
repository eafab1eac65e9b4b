//! Pluggable board evaluation interfaces and the full positional evaluator.
//!
//! Search stays modular by delegating static position scoring to
//! [`BoardScorer`]. Every score is signed from a fixed perspective team:
//! positive favours that team, its opponent's contributions count negative.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceKind, Square, Team};
use crate::game_state::snapshot::BoardSnapshot;
use crate::moves::piece_moves::{defended_allies, pseudo_legal_moves};
use crate::search::eval_constants::{
    center_value, EvalWeights, CENTER_CONTROL_BONUS, CENTER_PAWN_OCCUPANCY,
    CENTER_PIECE_OCCUPANCY, CENTER_SQUARES, COORDINATION_VALUE, DOUBLED_PAWN_PENALTY,
    ENDGAME_ADVANTAGE_THRESHOLD, ENDGAME_MATERIAL_THRESHOLD, ENEMY_KING_EDGE_MULTIPLIER,
    KING_ACTIVITY_MULTIPLIER, KING_DISTANCE_MULTIPLIER, KING_EXPOSURE_PENALTY,
    KING_MISSING_SCORE, MOBILITY_MULTIPLIER, PASSED_PAWN_BASE_VALUE,
    PASSED_PAWN_ENDGAME_MULTIPLIER, PASSED_PAWN_ENDGAME_VALUE, PAWN_SHIELD_BONUS,
    UNSUPPORTED_PAWN_PENALTY,
};
use crate::search::piece_square_tables::positional_value;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of `perspective`.
    fn score(&self, snapshot: &BoardSnapshot, perspective: Team) -> f32;
}

#[inline]
fn signed(team: Team, perspective: Team, value: f32) -> f32 {
    if team == perspective {
        value
    } else {
        -value
    }
}

/// Piece values only. Cheap enough for benchmarks and search tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl BoardScorer for MaterialScorer {
    fn score(&self, snapshot: &BoardSnapshot, perspective: Team) -> f32 {
        material(snapshot.board(), perspective)
    }
}

/// Unweighted sub-scores of one position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvalBreakdown {
    pub material: f32,
    pub positional: f32,
    pub king_safety: f32,
    pub mobility: f32,
    pub pawn_structure: f32,
    pub center_control: f32,
    pub coordination: f32,
    pub endgame: f32,
}

impl EvalBreakdown {
    pub fn weighted_total(&self, weights: &EvalWeights) -> f32 {
        self.material * weights.material
            + self.positional * weights.positional
            + self.king_safety * weights.king_safety
            + self.mobility * weights.mobility
            + self.pawn_structure * weights.pawn_structure
            + self.center_control * weights.center_control
            + self.coordination * weights.coordination
            + self.endgame * weights.endgame
    }
}

/// Weighted sum of material, piece-square tables, king safety, mobility,
/// pawn structure, center control, coordination and endgame terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    pub weights: EvalWeights,
}

impl Evaluator {
    pub const fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }

    pub fn breakdown(&self, board: &Board, perspective: Team) -> EvalBreakdown {
        let reach = ReachSurvey::of(board);
        EvalBreakdown {
            material: material(board, perspective),
            positional: positional(board, perspective),
            king_safety: king_safety(board, perspective),
            mobility: reach.mobility(perspective),
            pawn_structure: pawn_structure(board, perspective),
            center_control: center_control(board, &reach, perspective),
            coordination: coordination(board, perspective),
            endgame: endgame(board, perspective),
        }
    }

    pub fn evaluate(&self, board: &Board, perspective: Team) -> f32 {
        if board.king_square(perspective).is_none() {
            return -KING_MISSING_SCORE;
        }
        if board.king_square(perspective.opposite()).is_none() {
            return KING_MISSING_SCORE;
        }
        self.breakdown(board, perspective)
            .weighted_total(&self.weights)
    }
}

impl BoardScorer for Evaluator {
    fn score(&self, snapshot: &BoardSnapshot, perspective: Team) -> f32 {
        self.evaluate(snapshot.board(), perspective)
    }
}

/// Per-team pseudo-legal move counts and reached squares, computed in one
/// pass so mobility and center control share the generation work.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReachSurvey {
    move_counts: [usize; 2],
    reach: [u64; 2],
}

impl ReachSurvey {
    pub fn of(board: &Board) -> Self {
        let mut survey = Self::default();
        let mut buffer = Vec::with_capacity(32);
        for piece in board.pieces() {
            buffer.clear();
            pseudo_legal_moves(board, piece, &mut buffer);
            // Teleport squares can repeat pattern destinations.
            let seen = buffer.iter().fold(0u64, |acc, square| acc | square.bit());
            let team = piece.team.index();
            survey.move_counts[team] += seen.count_ones() as usize;
            survey.reach[team] |= seen;
        }
        survey
    }

    #[inline]
    pub fn reaches(&self, team: Team, square: Square) -> bool {
        self.reach[team.index()] & square.bit() != 0
    }

    pub fn mobility(&self, perspective: Team) -> f32 {
        Team::ALL
            .iter()
            .map(|&team| {
                let moves = self.move_counts[team.index()] as f32;
                signed(team, perspective, moves * MOBILITY_MULTIPLIER)
            })
            .sum()
    }
}

pub fn material(board: &Board, perspective: Team) -> f32 {
    board
        .pieces()
        .map(|p| signed(p.team, perspective, p.kind.value()))
        .sum()
}

/// Sum of every piece's value regardless of team.
pub fn total_material(board: &Board) -> f32 {
    board.pieces().map(|p| p.kind.value()).sum()
}

pub fn positional(board: &Board, perspective: Team) -> f32 {
    board
        .pieces()
        .map(|p| signed(p.team, perspective, positional_value(p.kind, p.team, p.square)))
        .sum()
}

fn team_king_safety(board: &Board, king: Square, team: Team) -> f32 {
    let shield = (-1..=1)
        .filter_map(|dx| king.offset(dx, team.forward()))
        .filter(|sq| {
            board
                .piece_at(*sq)
                .is_some_and(|p| p.kind == PieceKind::Pawn && p.team == team)
        })
        .count() as f32
        * PAWN_SHIELD_BONUS;

    let exposure = if center_value(king) > 1.0 {
        KING_EXPOSURE_PENALTY
    } else {
        0.0
    };
    shield - exposure
}

/// Pawn shield in front of each king, minus a penalty for a king standing
/// near the middle of the board.
pub fn king_safety(board: &Board, perspective: Team) -> f32 {
    Team::ALL
        .iter()
        .filter_map(|&team| {
            let king = board.king_square(team)?;
            Some(signed(team, perspective, team_king_safety(board, king, team)))
        })
        .sum()
}

pub fn mobility(board: &Board, perspective: Team) -> f32 {
    ReachSurvey::of(board).mobility(perspective)
}

/// No enemy pawn stands ahead of the pawn on its file or an adjacent one.
pub fn is_passed_pawn(board: &Board, pawn: Square, team: Team) -> bool {
    let is_own_pawn = board
        .piece_at(pawn)
        .is_some_and(|p| p.kind == PieceKind::Pawn && p.team == team);
    if !is_own_pawn {
        return false;
    }

    let enemy = team.opposite();
    let mut step = 1i8;
    while let Some(ahead) = pawn.offset(0, team.forward() * step) {
        let blocked = (-1..=1).filter_map(|dx| ahead.offset(dx, 0)).any(|sq| {
            board
                .piece_at(sq)
                .is_some_and(|p| p.kind == PieceKind::Pawn && p.team == enemy)
        });
        if blocked {
            return false;
        }
        step += 1;
    }
    true
}

/// A friendly pawn on an adjacent file, one rank behind, level or ahead.
pub fn has_pawn_support(board: &Board, pawn: Square, team: Team) -> bool {
    [-1i8, 1].iter().any(|&dx| {
        (-1..=1).filter_map(|dy| pawn.offset(dx, dy)).any(|sq| {
            board
                .piece_at(sq)
                .is_some_and(|p| p.kind == PieceKind::Pawn && p.team == team)
        })
    })
}

#[inline]
pub fn distance_to_promotion(square: Square, team: Team) -> u8 {
    square.rank().abs_diff(team.promotion_rank())
}

fn team_pawn_structure(board: &Board, team: Team) -> f32 {
    let mut score = 0.0;
    for file in 0..8u8 {
        let pawns: Vec<Square> = (0..8u8)
            .map(|rank| Square::on_rank(file, rank))
            .filter(|sq| {
                board
                    .piece_at(*sq)
                    .is_some_and(|p| p.kind == PieceKind::Pawn && p.team == team)
            })
            .collect();

        if pawns.len() > 1 {
            score -= DOUBLED_PAWN_PENALTY * (pawns.len() - 1) as f32;
        }
        for &pawn in &pawns {
            if !has_pawn_support(board, pawn, team) {
                score -= UNSUPPORTED_PAWN_PENALTY;
            }
            if is_passed_pawn(board, pawn, team) {
                score += PASSED_PAWN_BASE_VALUE / (distance_to_promotion(pawn, team) as f32 + 1.0);
            }
        }
    }
    score
}

pub fn pawn_structure(board: &Board, perspective: Team) -> f32 {
    Team::ALL
        .iter()
        .map(|&team| signed(team, perspective, team_pawn_structure(board, team)))
        .sum()
}

/// Occupancy of the four central squares plus a bonus for squares only one
/// side reaches.
pub fn center_control(board: &Board, reach: &ReachSurvey, perspective: Team) -> f32 {
    let mut score = 0.0;
    for (file, rank) in CENTER_SQUARES {
        let square = Square::on_rank(file, rank);
        if let Some(piece) = board.piece_at(square) {
            let value = if piece.kind == PieceKind::Pawn {
                CENTER_PAWN_OCCUPANCY
            } else {
                CENTER_PIECE_OCCUPANCY
            };
            score += signed(piece.team, perspective, value);
        }

        let mine = reach.reaches(perspective, square);
        let theirs = reach.reaches(perspective.opposite(), square);
        if mine && !theirs {
            score += CENTER_CONTROL_BONUS;
        } else if theirs && !mine {
            score -= CENTER_CONTROL_BONUS;
        }
    }
    score
}

/// Friendly pieces each piece protects.
pub fn coordination(board: &Board, perspective: Team) -> f32 {
    board
        .pieces()
        .map(|p| {
            let defended = defended_allies(board, p) as f32;
            signed(p.team, perspective, defended * COORDINATION_VALUE)
        })
        .sum()
}

/// Non-king, non-pawn material on the board, counted in whole pawns.
pub fn officer_material(board: &Board) -> i32 {
    board
        .pieces()
        .filter(|p| !matches!(p.kind, PieceKind::King | PieceKind::Pawn))
        .map(|p| p.kind.value() as i32)
        .sum()
}

#[inline]
pub fn is_endgame(board: &Board) -> bool {
    officer_material(board) < ENDGAME_MATERIAL_THRESHOLD
}

pub fn endgame(board: &Board, perspective: Team) -> f32 {
    if !is_endgame(board) {
        return 0.0;
    }

    let mut score = 0.0;
    if let Some(my_king) = board.king_square(perspective) {
        score += (7.0 - my_king.center_distance()) * KING_ACTIVITY_MULTIPLIER;

        let enemy_king = board.king_square(perspective.opposite());
        if let Some(enemy_king) =
            enemy_king.filter(|_| material(board, perspective) > ENDGAME_ADVANTAGE_THRESHOLD)
        {
            score += enemy_king.center_distance() * ENEMY_KING_EDGE_MULTIPLIER;
            let distance = my_king.manhattan_distance(enemy_king) as f32;
            score += (14.0 - distance) * KING_DISTANCE_MULTIPLIER;
        }
    }

    let passed: f32 = board
        .pieces()
        .filter(|p| p.kind == PieceKind::Pawn && is_passed_pawn(board, p.square, p.team))
        .map(|p| {
            let value = PASSED_PAWN_ENDGAME_VALUE / (distance_to_promotion(p.square, p.team) as f32 + 1.0);
            signed(p.team, perspective, value)
        })
        .sum();
    score + passed * PASSED_PAWN_ENDGAME_MULTIPLIER
}
