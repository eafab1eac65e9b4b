//! Single dispatch over piece kind for pseudo-legal generation.
//!
//! The output respects every board modifier: jump grants inside the per-kind
//! generators, teleport squares appended afterwards, and finally the global
//! move cap trimming anything farther than the allowed distance.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Piece, PieceKind, Square};
use crate::moves::king_moves::{king_moves, KING_TARGETS};
use crate::moves::knight_moves::{knight_moves, squares_of, KNIGHT_TARGETS};
use crate::moves::pawn_moves::{pawn_capture_squares, pawn_moves};
use crate::moves::sliding_moves::{first_blockers, sliding_moves};
use crate::moves::teleport_moves::teleport_moves;

/// Append the pseudo-legal destinations of `piece` to `out`.
pub fn pseudo_legal_moves(board: &Board, piece: Piece, out: &mut Vec<Square>) {
    let start = out.len();
    pattern_moves(board, piece, out);
    if board.modifiers.can_teleport(piece.team) {
        teleport_moves(board, out);
    }
    apply_move_cap(board, piece.square, out, start);
}

/// Like [`pseudo_legal_moves`] but without teleport squares. Teleport only
/// ever adds empty squares, so this answers "does this piece reach an
/// occupied square" identically and faster.
pub fn occupied_reach(board: &Board, piece: Piece, out: &mut Vec<Square>) {
    let start = out.len();
    pattern_moves(board, piece, out);
    apply_move_cap(board, piece.square, out, start);
}

pub fn piece_moves(board: &Board, piece: Piece) -> Vec<Square> {
    let mut out = Vec::with_capacity(28);
    pseudo_legal_moves(board, piece, &mut out);
    out
}

#[inline]
fn pattern_moves(board: &Board, piece: Piece, out: &mut Vec<Square>) {
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, piece, out),
        PieceKind::Knight => knight_moves(board, piece, out),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => sliding_moves(board, piece, out),
        PieceKind::King => king_moves(board, piece, out),
    }
}

fn apply_move_cap(board: &Board, origin: Square, out: &mut Vec<Square>, start: usize) {
    let Some(cap) = board.modifiers.move_cap else {
        return;
    };
    let mut write = start;
    for read in start..out.len() {
        let target = out[read];
        if origin.chebyshev_distance(target) <= cap.max_squares {
            out[write] = target;
            write += 1;
        }
    }
    out.truncate(write);
}

/// Number of friendly pieces `piece` protects: friendly squares its capture
/// pattern would reach if they held an enemy.
pub fn defended_allies(board: &Board, piece: Piece) -> usize {
    let friendly = |sq: &Square| board.is_friendly(*sq, piece.team);
    match piece.kind {
        PieceKind::Pawn => pawn_capture_squares(piece).filter(friendly).count(),
        PieceKind::Knight => squares_of(KNIGHT_TARGETS[piece.square.index()])
            .filter(friendly)
            .count(),
        PieceKind::King => squares_of(KING_TARGETS[piece.square.index()])
            .filter(friendly)
            .count(),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            first_blockers(board, piece).filter(friendly).count()
        }
    }
}
