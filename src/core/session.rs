use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use time::OffsetDateTime;
use tokio::sync::broadcast;

use super::{BROADCAST_CAPACITY, MAX_PLAYERS};
use crate::models::ServerMessage;

/// One accepted move in a session's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Index of the player who made the move (0 or 1)
    pub player_index: usize,
    /// City name as submitted, original casing preserved for display
    pub city: String,
}

/// A single two-player game session
///
/// Owned exclusively by the `RoomRegistry`; all mutation goes through the
/// registry's write lock, so one room never interleaves partial updates.
#[derive(Debug)]
pub struct GameSession {
    /// Room code identifying this session
    pub room_id: String,
    /// Connection ids of joined players; index is the player index
    pub players: Vec<String>,
    /// Append-only log of accepted moves
    pub history: Vec<MoveRecord>,
    /// Normalized names already played in this session
    pub used_cities: HashSet<String>,
    /// Letter the next city must start with; None before the first move
    pub required_letter: Option<char>,
    /// Player index allowed to move next
    pub turn: usize,
    /// When the room was created, for the stale-room sweep
    pub created_at: OffsetDateTime,
    /// Broadcast channel for room-wide WebSocket fan-out
    pub broadcast_tx: broadcast::Sender<String>,
}

impl GameSession {
    /// Create a new session with the creator registered as player 0
    pub fn new(room_id: String, creator_connection_id: String) -> Self {
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);

        Self {
            room_id,
            players: vec![creator_connection_id],
            history: Vec::new(),
            used_cities: HashSet::new(),
            required_letter: None,
            turn: 0,
            created_at: OffsetDateTime::now_utc(),
            broadcast_tx,
        }
    }

    /// Whether both seats are taken
    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    /// Whether the game has started (second player joined)
    pub fn is_active(&self) -> bool {
        self.players.len() == MAX_PLAYERS
    }

    /// Register the second player
    ///
    /// Returns the new player's index, or None if the room is full.
    pub fn add_player(&mut self, connection_id: String) -> Option<usize> {
        if self.is_full() {
            return None;
        }

        self.players.push(connection_id);
        Some(self.players.len() - 1)
    }

    /// Send a message to every connection subscribed to this room
    ///
    /// Errors are ignored: a send only fails when no receivers are
    /// subscribed, which is normal between creation and the first join.
    pub fn broadcast(&self, message: &ServerMessage) {
        tracing::debug!("Broadcasting to room {}: {:?}", self.room_id, message);

        if let Ok(text) = serde_json::to_string(message) {
            let _ = self.broadcast_tx.send(text);
        }
    }
}
