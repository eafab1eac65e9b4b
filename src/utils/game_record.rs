//! Plain-text export of a finished (or abandoned) game.
//!
//! Bracketed headers followed by numbered coordinate move text. Card-driven
//! moves are recorded like any other move, so move numbers count record
//! entries rather than turns.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};

use crate::game_state::chess_types::Team;
use crate::game_state::game::Game;
use crate::move_generation::game_status::GameStatus;

/// Result token for the `Result` header and the end of the move text.
pub fn result_token(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Checkmate { winner: Team::White }
        | GameStatus::KingMissing { loser: Team::Black } => "1-0",
        GameStatus::Checkmate { winner: Team::Black }
        | GameStatus::KingMissing { loser: Team::White } => "0-1",
        GameStatus::Stalemate | GameStatus::InsufficientMaterial => "1/2-1/2",
        GameStatus::Ongoing { .. } => "*",
    }
}

/// Export `game` stamped with today's local date.
pub fn write_game_record(game: &Game) -> String {
    write_game_record_dated(game, Local::now().date_naive())
}

pub fn write_game_record_dated(game: &Game, date: NaiveDate) -> String {
    let result = result_token(game.status());
    let mut headers = BTreeMap::<&str, String>::new();
    headers.insert("Event", "Card Chess Game".to_owned());
    headers.insert("Date", date.format("%Y.%m.%d").to_string());
    headers.insert("White", "White".to_owned());
    headers.insert("Black", "Black".to_owned());
    headers.insert("Result", result.to_owned());

    let mut out = String::new();
    for (key, value) in &headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, value));
    }
    out.push('\n');

    let mut parts = Vec::<String>::with_capacity(game.record().len() + 1);
    for (ply, mv) in game.record().iter().enumerate() {
        if ply % 2 == 0 {
            parts.push(format!("{}. {}", ply / 2 + 1, mv));
        } else {
            parts.push(mv.to_string());
        }
    }
    parts.push(result.to_owned());
    out.push_str(&parts.join(" "));
    out.push('\n');
    out
}
