//! Crate root module declarations for the card chess rules engine.
//!
//! Exposes the board model, move generation and legality, the minimax
//! search with its evaluator and opening book, the threaded engine driver,
//! the card system, and small text utilities.

pub mod game_state {
    pub mod board;
    pub mod chess_types;
    pub mod errors;
    pub mod game;
    pub mod move_record;
    pub mod snapshot;
    pub mod special_rights;
}

pub mod moves {
    pub mod king_moves;
    pub mod knight_moves;
    pub mod pawn_moves;
    pub mod piece_moves;
    pub mod sliding_moves;
    pub mod teleport_moves;
}

pub mod move_generation {
    pub mod game_status;
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod move_generator;
    pub mod perft;
    pub mod special_moves;
}

pub mod search {
    pub mod board_scoring;
    pub mod cancellation;
    pub mod eval_constants;
    pub mod iterative_deepening;
    pub mod move_ordering;
    pub mod piece_square_tables;
    pub mod quiescence;
}

pub mod tables {
    pub mod opening_book;
}

pub mod engines {
    pub mod engine_minimax;
    pub mod engine_trait;
    pub mod search_worker;
    pub mod turn_controller;
}

pub mod cards {
    pub mod card_effects;
    pub mod card_kind;
    pub mod card_scoring;
    pub mod deck;
    pub mod pending_effect;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_parser;
    pub mod game_record;
    pub mod render_board;
}
