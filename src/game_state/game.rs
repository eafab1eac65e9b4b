//! Live game: the board, its move history and the turn flow around them.
//!
//! This is the mutable counterpart of [`BoardSnapshot`]. Moves arrive here
//! from players, the engine and card effects; searches only ever see
//! snapshots taken from it.

use tracing::{debug, info};

use crate::game_state::board::{Board, Modifiers};
use crate::game_state::chess_types::{Move, Square, Team};
use crate::game_state::errors::{ChessError, ChessResult};
use crate::game_state::move_record::MoveRecord;
use crate::game_state::snapshot::BoardSnapshot;
use crate::game_state::special_rights::SpecialRights;
use crate::move_generation::game_status::{classify, evaluate_board_state, BoardState, GameStatus};
use crate::move_generation::legal_move_apply::{apply_move, AppliedMove, MoveKind};
use crate::move_generation::legal_move_generator::{legal_destinations, legal_moves_for_team};
use crate::move_generation::special_moves::classify_move;

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    record: MoveRecord,
    side_to_move: Team,
    turn_number: u32,
    effect_pending: bool,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::from_position(Board::standard(), Team::White)
    }

    /// Start from an arbitrary position with an empty history.
    pub fn from_position(board: Board, side_to_move: Team) -> Self {
        board.debug_assert_consistent();
        Self {
            board,
            record: MoveRecord::new(),
            side_to_move,
            turn_number: 0,
            effect_pending: false,
        }
    }

    /// Rematch: standard setup, empty history, modifiers off.
    pub fn reset(&mut self) {
        *self = Self::new();
        info!("game reset");
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn record(&self) -> &MoveRecord {
        &self.record
    }

    #[inline]
    pub fn side_to_move(&self) -> Team {
        self.side_to_move
    }

    /// Completed turns since the game started.
    #[inline]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[inline]
    pub fn modifiers(&self) -> &Modifiers {
        &self.board.modifiers
    }

    pub fn modifiers_mut(&mut self) -> &mut Modifiers {
        &mut self.board.modifiers
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn rights(&self) -> SpecialRights {
        SpecialRights::from_history(&self.board, &self.record)
    }

    /// Independent copy for a search worker.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::new(self.board, self.side_to_move, self.rights())
    }

    pub fn legal_moves_for(&self, square: Square) -> Vec<Square> {
        legal_destinations(&self.board, &self.rights(), square)
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves_for_team(&self.board, &self.rights(), self.side_to_move)
    }

    pub fn board_state(&self, team: Team) -> BoardState {
        evaluate_board_state(&self.board, &self.rights(), team)
    }

    pub fn status(&self) -> GameStatus {
        classify(&self.board, &self.rights(), self.side_to_move)
    }

    #[inline]
    pub fn effect_pending(&self) -> bool {
        self.effect_pending
    }

    pub(crate) fn set_effect_pending(&mut self, pending: bool) {
        self.effect_pending = pending;
    }

    /// Validate `mv` against the mover's legal list, play it and end the turn.
    pub fn play_move(&mut self, mv: Move) -> ChessResult<AppliedMove> {
        if self.effect_pending {
            return Err(ChessError::EffectPending);
        }
        if self.status().is_over() {
            return Err(ChessError::GameOver);
        }
        let piece = self
            .board
            .piece_at(mv.from)
            .ok_or(ChessError::EmptySquare(mv.from))?;
        if piece.team != self.side_to_move {
            return Err(ChessError::WrongTeam {
                square: mv.from,
                owner: piece.team,
                to_move: self.side_to_move,
            });
        }
        if !self.legal_moves_for(mv.from).contains(&mv.to) {
            return Err(ChessError::IllegalMove {
                from: mv.from,
                to: mv.to,
            });
        }

        let applied = self.execute_move(mv)?;
        self.end_turn();
        Ok(applied)
    }

    /// Perform `mv` without the legality check and without ending the turn.
    /// Card effects drive pieces through here; allied captures are refused
    /// unless the board currently allows them.
    pub(crate) fn execute_move(&mut self, mv: Move) -> ChessResult<AppliedMove> {
        let kind = classify_move(&self.board, &self.rights(), mv);
        self.execute_as(mv, kind)
    }

    /// Like [`Game::execute_move`] but a plain relocation: no castling,
    /// en passant or promotion, whatever the piece and squares.
    pub(crate) fn relocate_piece(&mut self, mv: Move) -> ChessResult<AppliedMove> {
        self.execute_as(mv, MoveKind::Normal)
    }

    fn execute_as(&mut self, mv: Move, kind: MoveKind) -> ChessResult<AppliedMove> {
        let mover = self
            .board
            .piece_at(mv.from)
            .ok_or(ChessError::EmptySquare(mv.from))?;
        if self.board.is_friendly(mv.to, mover.team) && !self.board.modifiers.can_capture_allied {
            return Err(ChessError::AlliedCapture(mv.to));
        }

        let applied = apply_move(&mut self.board, mv, kind);
        self.record.push(mv);
        debug!(
            mv = %mv,
            kind = ?applied.kind,
            captured = ?applied.captured.map(|p| p.kind),
            mover_destroyed = applied.mover_destroyed,
            "move executed"
        );
        Ok(applied)
    }

    /// Hand the move to the other side, expiring this side's single-turn
    /// grants and counting down the move cap.
    pub fn end_turn(&mut self) {
        let finished = self.side_to_move;
        self.board.modifiers.expire_turn_grants(finished);
        self.board.modifiers.tick_move_cap();
        self.side_to_move = finished.opposite();
        self.turn_number += 1;

        let status = self.status();
        if status.is_over() {
            info!(?status, turn = self.turn_number, "game finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Game;
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{Move, PieceKind, Square, Team};
    use crate::game_state::errors::ChessError;
    use crate::move_generation::game_status::GameStatus;
    use crate::utils::algebraic::algebraic_to_move;
    use crate::utils::fen_parser::parse_placement;

    fn mv(text: &str) -> Move {
        algebraic_to_move(text).expect("test move should parse")
    }

    fn sq(file: i32, rank: i32) -> Square {
        Square::new(file, rank).expect("test square should be valid")
    }

    #[test]
    fn play_move_rejects_illegal_and_out_of_turn_moves() {
        let mut game = Game::new();
        assert!(matches!(
            game.play_move(mv("e2e5")),
            Err(ChessError::IllegalMove { .. })
        ));
        assert!(matches!(
            game.play_move(mv("e7e5")),
            Err(ChessError::WrongTeam { .. })
        ));
        assert!(matches!(
            game.play_move(mv("e3e4")),
            Err(ChessError::EmptySquare(_))
        ));
        game.play_move(mv("e2e4")).expect("e2e4 should be legal");
        assert_eq!(game.side_to_move(), Team::Black);
        assert_eq!(game.record().len(), 1);
    }

    #[test]
    fn pinned_piece_cannot_leave_the_file() {
        let board = parse_placement("4k3/4r3/8/8/8/8/4N3/4K3").expect("placement should parse");
        let mut game = Game::from_position(board, Team::White);
        assert!(matches!(
            game.play_move(mv("e2c3")),
            Err(ChessError::IllegalMove { .. })
        ));
        assert_eq!(*game.board(), board);
        assert!(game.record().is_empty());
        assert_eq!(game.side_to_move(), Team::White);
        game.play_move(mv("e1d1")).expect("king step should be legal");
    }

    #[test]
    fn en_passant_capture_removes_pawn_beside_destination() {
        let mut game = Game::new();
        for text in ["e2e4", "a7a6", "e4e5", "d7d5"] {
            game.play_move(mv(text)).expect("opening move should be legal");
        }
        assert!(game.legal_moves_for(sq(4, 4)).contains(&sq(3, 5)));

        let applied = game.play_move(mv("e5d6")).expect("en passant should be legal");
        assert_eq!(applied.captured.map(|p| p.kind), Some(PieceKind::Pawn));
        assert!(game.board().is_empty(sq(3, 4)));
        assert_eq!(
            game.board().piece_at(sq(3, 5)).map(|p| p.kind),
            Some(PieceKind::Pawn)
        );
    }

    #[test]
    fn en_passant_expires_after_one_move() {
        let mut game = Game::new();
        for text in ["e2e4", "a7a6", "e4e5", "d7d5", "h2h3", "h7h6"] {
            game.play_move(mv(text)).expect("opening move should be legal");
        }
        assert!(!game.legal_moves_for(sq(4, 4)).contains(&sq(3, 5)));
    }

    #[test]
    fn castling_relocates_rook_and_is_lost_after_king_moves() {
        let board = parse_placement("r3k2r/8/8/8/8/8/8/R3K2R").expect("placement should parse");
        let mut game = Game::from_position(board, Team::White);
        game.play_move(mv("e1g1")).expect("castling should be legal");
        assert_eq!(
            game.board().piece_at(sq(5, 0)).map(|p| p.kind),
            Some(PieceKind::Rook)
        );
        assert!(game.board().is_empty(sq(7, 0)));

        game.play_move(mv("e8e7")).expect("king step should be legal");
        game.play_move(mv("a1a2")).expect("rook move should be legal");
        game.play_move(mv("e7e8")).expect("king returns home");
        assert!(!game.legal_moves_for(sq(4, 7)).contains(&sq(6, 7)));
    }

    #[test]
    fn move_cap_counts_down_with_turns() {
        let mut game = Game::new();
        game.modifiers_mut().set_move_cap(2, 2);
        assert!(!game.legal_moves_for(sq(3, 1)).is_empty());
        game.play_move(mv("d2d4")).expect("two squares is inside the cap");
        assert!(game.modifiers().move_cap.is_some());
        game.play_move(mv("d7d5")).expect("two squares is inside the cap");
        assert!(game.modifiers().move_cap.is_none());
    }

    #[test]
    fn allied_capture_requires_permission() {
        let mut board = Board::empty();
        board.place(PieceKind::King, Team::White, sq(4, 0));
        board.place(PieceKind::King, Team::Black, sq(4, 7));
        board.place(PieceKind::Rook, Team::White, sq(0, 0));
        board.place(PieceKind::Knight, Team::White, sq(0, 3));
        let mut game = Game::from_position(board, Team::White);

        assert!(matches!(
            game.execute_move(mv("a1a4")),
            Err(ChessError::AlliedCapture(_))
        ));
        game.modifiers_mut().can_capture_allied = true;
        let applied = game.execute_move(mv("a1a4")).expect("allied capture allowed");
        assert_eq!(applied.captured.map(|p| p.team), Some(Team::White));
    }

    #[test]
    fn checkmate_stops_further_moves() {
        let mut game = Game::new();
        for text in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            game.play_move(mv(text)).expect("fool's mate move should be legal");
        }
        assert_eq!(
            game.status(),
            GameStatus::Checkmate {
                winner: Team::Black
            }
        );
        assert!(matches!(game.play_move(mv("a2a3")), Err(ChessError::GameOver)));
    }

    #[test]
    fn reset_restores_the_start() {
        let mut game = Game::new();
        game.play_move(mv("g1f3")).expect("knight move should be legal");
        game.modifiers_mut().can_jump = [true, true];
        game.reset();
        assert_eq!(*game.board(), Board::standard());
        assert!(game.record().is_empty());
        assert_eq!(game.side_to_move(), Team::White);
    }
}
