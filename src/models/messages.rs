use serde::{Deserialize, Serialize};

/// Messages a client sends over the WebSocket
///
/// Tagged JSON objects: `{"type": "join-room", "room_id": "ABC123"}`.
/// Frames that fail to parse are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Open a new room; sender becomes player 0
    CreateRoom,
    /// Join an existing room by code; sender becomes player 1
    JoinRoom { room_id: String },
    /// Submit a city for the given room
    ///
    /// `player_id` is the client's claimed index; the engine authorizes
    /// solely by matching it against the room's current turn.
    MakeMove {
        room_id: String,
        city: String,
        player_id: usize,
    },
}

/// Messages the server sends to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Acknowledgment of create-room, sender only
    RoomCreated { room_id: String, player_id: usize },
    /// Successful join acknowledgment, sender only
    RoomJoined { player_id: usize },
    /// Failed join acknowledgment, sender only
    JoinFailed { error: String },
    /// Broadcast to the room once, when the second player joins
    GameStart,
    /// Broadcast to the room on every accepted move
    Move {
        city: String,
        player_id: usize,
        next_turn: usize,
    },
    /// Move rejection, offending sender only
    Error { message: String },
}
