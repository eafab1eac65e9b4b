//! Engine abstraction used by the search worker and the turn controller.
//!
//! An engine receives an owned board snapshot and a cancellation token and
//! answers with either a chosen move or "cancelled". Engines run on a worker
//! thread, so the trait requires `Send`.

use crate::game_state::chess_types::Move;
use crate::game_state::errors::ChessResult;
use crate::game_state::snapshot::BoardSnapshot;
use crate::search::cancellation::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    /// Overrides the configured depth for this search only.
    pub depth: Option<u8>,
    /// How many moves the engine has already played this game; gates the
    /// opening book.
    pub engine_move_number: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineOutput {
    pub best_move: Option<Move>,
    /// From the engine's own point of view, in pawns.
    pub score: f32,
    pub from_book: bool,
    pub depth: u8,
    pub nodes: u64,
    pub info_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineReply {
    Ready(EngineOutput),
    /// Cancelled before finishing; carries no move.
    Cancelled,
}

pub trait Engine: Send {
    fn new_game(&mut self) {}

    fn set_option(&mut self, _name: &str, _value: &str) -> ChessResult<()> {
        Ok(())
    }

    fn choose_move(
        &mut self,
        snapshot: &BoardSnapshot,
        request: &SearchRequest,
        cancel: &CancellationToken,
    ) -> EngineReply;
}
