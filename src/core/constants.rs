/// Length of generated room codes
pub const ROOM_CODE_LENGTH: usize = 6;

/// Maximum players per room
pub const MAX_PLAYERS: usize = 2;

/// Rooms older than this are swept by the cleanup task (seconds)
pub const ROOM_TTL_SECONDS: u64 = 3600;

/// How often the cleanup task runs (seconds)
pub const CLEANUP_INTERVAL_SECONDS: u64 = 300;

/// Capacity of each room's broadcast channel
pub const BROADCAST_CAPACITY: usize = 100;

/// Port used when PORT is not set
pub const DEFAULT_PORT: u16 = 4000;

/// Maximum accepted WebSocket text frame size in bytes
pub const MAX_MESSAGE_BYTES: usize = 1024;
