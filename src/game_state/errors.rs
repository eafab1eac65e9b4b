//! Crate-wide error type.
//!
//! Rules and search code are total over well-formed input; these errors cover
//! the boundaries where outside input arrives: parsing, move requests, cards,
//! engine options and the search worker.

use thiserror::Error;

use crate::cards::card_kind::CardKind;
use crate::game_state::chess_types::{Square, Team};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// Coordinates outside `0..=7` on either axis.
    #[error("square ({file}, {rank}) is off the board")]
    InvalidSquare { file: i32, rank: i32 },

    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("piece on {square} belongs to {owner:?} but {to_move:?} is to move")]
    WrongTeam {
        square: Square,
        owner: Team,
        to_move: Team,
    },

    /// Input arrived while the other side (or the engine) holds the turn.
    #[error("not your turn: {to_move:?} is to move")]
    NotYourTurn { to_move: Team },

    /// The requested move is not in the legal list of the piece on `from`.
    #[error("illegal move {from}{to}")]
    IllegalMove { from: Square, to: Square },

    #[error("cannot capture the allied piece on {0}")]
    AlliedCapture(Square),

    #[error("the game is over")]
    GameOver,

    #[error("invalid algebraic notation: {0}")]
    InvalidAlgebraic(String),

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("invalid opening book: {0}")]
    InvalidBook(String),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidOption { name: String, value: String },

    #[error("unknown card '{0}'")]
    UnknownCard(String),

    #[error("card {0:?} is not in hand")]
    CardNotInHand(CardKind),

    /// The card was played but its effect could not apply; the card is refunded.
    #[error("card {card:?} rejected: {reason}")]
    CardRejected { card: CardKind, reason: String },

    #[error("a card effect is still awaiting input")]
    EffectPending,

    #[error("no card effect is awaiting input")]
    NoEffectPending,

    #[error("search worker stopped without reporting a result")]
    WorkerDisconnected,
}

pub type ChessResult<T> = Result<T, ChessError>;
