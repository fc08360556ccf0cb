use thiserror::Error;

use super::catalog::CityCatalog;
use super::session::{GameSession, MoveRecord};

/// Why a submitted move was rejected
///
/// `OutOfTurn` is never surfaced to the client: the transport drops it
/// silently, matching the behavior players expect when they mash the send
/// button during the opponent's turn. The other variants are sent back to
/// the submitter as a human-readable rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("Сейчас не ваш ход")]
    OutOfTurn,
    #[error("Город уже использовался")]
    DuplicateCity,
    #[error("Такого города не существует")]
    UnknownCity,
    #[error("Город должен начинаться на \"{}\"", .0.to_uppercase())]
    WrongLetter(char),
}

impl MoveError {
    /// Rejections that are dropped without notifying the sender
    pub fn is_silent(&self) -> bool {
        matches!(self, MoveError::OutOfTurn)
    }
}

/// An accepted move, ready to be broadcast to the room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedMove {
    /// City name as submitted, original casing
    pub city: String,
    /// Index of the player who moved
    pub player_index: usize,
    /// Player index that moves next
    pub next_turn: usize,
}

/// Normalize a city name for uniqueness and catalog lookups
pub fn normalize_city(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Derive the letter the next city must start with
///
/// Lowercases the name, strips a single trailing "ь", "ъ" or "ы" (at most
/// one character, never repeatedly) and returns the last remaining one.
/// These endings never start a Russian city name, so the chain continues
/// from the letter before them.
pub fn next_required_letter(city: &str) -> Option<char> {
    let lowered = city.trim().to_lowercase();
    let mut chars: Vec<char> = lowered.chars().collect();

    if matches!(chars.last(), Some('ь' | 'ъ' | 'ы')) {
        chars.pop();
    }

    chars.last().copied()
}

/// Validate a proposed move and, if accepted, apply it to the session
///
/// Checks run in order: turn ownership, uniqueness, catalog membership,
/// letter match. On success the session is updated atomically (the caller
/// holds the registry write lock): the normalized name joins `used_cities`,
/// the original-cased name joins `history`, `required_letter` is recomputed
/// and the turn passes to the other player. A rejection leaves the session
/// untouched.
pub fn submit_move(
    session: &mut GameSession,
    claimed_player_index: usize,
    raw_city: &str,
    catalog: &CityCatalog,
) -> Result<AcceptedMove, MoveError> {
    if session.turn != claimed_player_index {
        return Err(MoveError::OutOfTurn);
    }

    let normalized = normalize_city(raw_city);

    if session.used_cities.contains(&normalized) {
        return Err(MoveError::DuplicateCity);
    }

    if !catalog.contains(&normalized) {
        return Err(MoveError::UnknownCity);
    }

    if !session.history.is_empty() {
        if let Some(required) = session.required_letter {
            if normalized.chars().next() != Some(required) {
                return Err(MoveError::WrongLetter(required));
            }
        }
    }

    session.used_cities.insert(normalized);
    session.history.push(MoveRecord {
        player_index: claimed_player_index,
        city: raw_city.to_string(),
    });
    session.required_letter = next_required_letter(raw_city);
    session.turn = 1 - claimed_player_index;

    Ok(AcceptedMove {
        city: raw_city.to_string(),
        player_index: claimed_player_index,
        next_turn: session.turn,
    })
}
