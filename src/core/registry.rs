use rand::Rng;
use std::collections::HashMap;
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use super::session::GameSession;
use super::{ROOM_CODE_LENGTH, ROOM_TTL_SECONDS};

/// Why joining a room failed
///
/// Returned in the join acknowledgment; the message text is what the
/// client displays.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("Комната не найдена")]
    RoomNotFound,
    #[error("Комната заполнена")]
    RoomFull,
}

/// Store of all active game sessions
///
/// The single owner of session state: routes and the turn engine reach
/// sessions only through this registry, behind the `AppState` lock.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    /// Map of room code to session
    rooms: HashMap<String, GameSession>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
        }
    }

    /// Create a new room with the given connection as player 0
    ///
    /// Returns the room code. Codes are 6 uppercase alphanumeric
    /// characters; collisions are vanishingly rare but re-rolled anyway.
    pub fn create_room(&mut self, connection_id: String) -> String {
        let mut room_id = Self::generate_room_code();
        while self.rooms.contains_key(&room_id) {
            room_id = Self::generate_room_code();
        }

        let session = GameSession::new(room_id.clone(), connection_id);
        self.rooms.insert(room_id.clone(), session);
        room_id
    }

    /// Generate a random room code over the [0-9A-Z] alphabet
    fn generate_room_code() -> String {
        const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

        let mut rng = rand::thread_rng();
        (0..ROOM_CODE_LENGTH)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }

    /// Register a second player in an existing room
    ///
    /// Returns the joiner's player index (always 1). The caller is
    /// responsible for broadcasting game-start on success.
    pub fn join_room(&mut self, room_id: &str, connection_id: String) -> Result<usize, JoinError> {
        let session = self.rooms.get_mut(room_id).ok_or(JoinError::RoomNotFound)?;

        session.add_player(connection_id).ok_or(JoinError::RoomFull)
    }

    pub fn get_room(&self, room_id: &str) -> Option<&GameSession> {
        self.rooms.get(room_id)
    }

    pub fn get_room_mut(&mut self, room_id: &str) -> Option<&mut GameSession> {
        self.rooms.get_mut(room_id)
    }

    pub fn remove_room(&mut self, room_id: &str) {
        self.rooms.remove(room_id);
    }

    /// Drop rooms older than the TTL
    ///
    /// Returns the number of rooms removed.
    pub fn cleanup_stale_rooms(&mut self) -> usize {
        let cutoff = OffsetDateTime::now_utc() - Duration::seconds(ROOM_TTL_SECONDS as i64);

        let stale_room_ids: Vec<String> = self
            .rooms
            .iter()
            .filter(|(_, session)| session.created_at < cutoff)
            .map(|(room_id, _)| room_id.clone())
            .collect();

        for room_id in &stale_room_ids {
            self.remove_room(room_id);
        }

        stale_room_ids.len()
    }

    /// Room and player counts for the health endpoint
    pub fn stats(&self) -> serde_json::Value {
        let total_players: usize = self.rooms.values().map(|s| s.players.len()).sum();
        let active_rooms = self.rooms.values().filter(|s| s.is_active()).count();

        serde_json::json!({
            "total_rooms": self.rooms.len(),
            "active_rooms": active_rooms,
            "total_players": total_players,
        })
    }
}
